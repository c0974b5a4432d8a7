use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Global configuration loaded from `~/.config/dlbench/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchConfig {
    /// Number of simultaneous download attempts per run.
    pub fanout: usize,
    /// Bandwidth sampler tick interval in milliseconds.
    pub sample_interval_ms: u64,
    /// Packet-loss percentage configured on the external network shaper.
    /// Recorded on every sample; never measured.
    pub loss_percent: f64,
    /// Reference throughput the degradation ratio is scored against
    /// (625 KiB/s, a 5 Mbps reference link).
    pub baseline_bytes_per_sec: u64,
    /// Optional connect timeout for the curl transport, seconds (None = 30).
    #[serde(default)]
    pub connect_timeout_secs: Option<u64>,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            fanout: 20,
            sample_interval_ms: 200,
            loss_percent: 2.0,
            baseline_bytes_per_sec: 625 * 1024,
            connect_timeout_secs: None,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("dlbench")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<BenchConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = BenchConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: BenchConfig = toml::from_str(&data)?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = BenchConfig::default();
        assert_eq!(cfg.fanout, 20);
        assert_eq!(cfg.sample_interval_ms, 200);
        assert!((cfg.loss_percent - 2.0).abs() < 1e-9);
        assert_eq!(cfg.baseline_bytes_per_sec, 640_000);
        assert!(cfg.connect_timeout_secs.is_none());
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = BenchConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: BenchConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.fanout, cfg.fanout);
        assert_eq!(parsed.sample_interval_ms, cfg.sample_interval_ms);
        assert_eq!(parsed.baseline_bytes_per_sec, cfg.baseline_bytes_per_sec);
    }

    #[test]
    fn config_toml_custom_values() {
        let toml = r#"
            fanout = 8
            sample_interval_ms = 100
            loss_percent = 0.5
            baseline_bytes_per_sec = 1048576
            connect_timeout_secs = 10
        "#;
        let cfg: BenchConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.fanout, 8);
        assert_eq!(cfg.sample_interval_ms, 100);
        assert!((cfg.loss_percent - 0.5).abs() < 1e-9);
        assert_eq!(cfg.baseline_bytes_per_sec, 1_048_576);
        assert_eq!(cfg.connect_timeout_secs, Some(10));
    }

    #[test]
    fn load_or_init_creates_then_reloads_the_file() {
        let dir = tempfile::tempdir().unwrap();
        std::env::set_var("XDG_CONFIG_HOME", dir.path());

        // First call writes the default file.
        let created = load_or_init().unwrap();
        let path = dir.path().join("dlbench").join("config.toml");
        assert!(path.exists());
        assert_eq!(created.fanout, BenchConfig::default().fanout);

        // Second call parses what is on disk, not the built-in defaults.
        let custom = BenchConfig {
            fanout: 7,
            ..Default::default()
        };
        fs::write(&path, toml::to_string_pretty(&custom).unwrap()).unwrap();
        let reloaded = load_or_init().unwrap();
        assert_eq!(reloaded.fanout, 7);
        assert_eq!(
            reloaded.baseline_bytes_per_sec,
            custom.baseline_bytes_per_sec
        );

        std::env::remove_var("XDG_CONFIG_HOME");
    }
}
