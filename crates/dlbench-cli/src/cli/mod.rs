//! CLI for the dlbench download benchmark.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use dlbench_core::config;

use commands::{run_matrix, run_profiles, run_single};

/// Top-level CLI for the dlbench download benchmark.
#[derive(Debug, Parser)]
#[command(name = "dlbench")]
#[command(about = "dlbench: concurrent download benchmarking engine", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Run one benchmark: a fixed fan-out of concurrent downloads of URL.
    Run {
        /// Target URL to download.
        url: String,
        /// Benchmark profile id (see `dlbench profiles`).
        #[arg(long, default_value = "baseline")]
        profile: String,
        /// Number of concurrent attempts (default from config).
        #[arg(long, value_name = "N")]
        fanout: Option<usize>,
    },

    /// Run all four builtin profiles against URL, one after another.
    Matrix {
        /// Target URL to download.
        url: String,
        /// Number of concurrent attempts per profile (default from config).
        #[arg(long, value_name = "N")]
        fanout: Option<usize>,
    },

    /// List the builtin benchmark profiles.
    Profiles,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Run {
                url,
                profile,
                fanout,
            } => run_single(&cfg, &url, &profile, fanout).await?,
            CliCommand::Matrix { url, fanout } => run_matrix(&cfg, &url, fanout).await?,
            CliCommand::Profiles => run_profiles(),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
