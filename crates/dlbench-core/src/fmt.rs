//! Human-readable formatting for report output.

const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

/// Formats a byte count with a binary-scaled unit ("2.50 MB").
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }
    let exp = ((bytes as f64).ln() / 1024f64.ln()).floor() as usize;
    let exp = exp.min(UNITS.len() - 1);
    format!("{:.2} {}", bytes as f64 / 1024f64.powi(exp as i32), UNITS[exp])
}

/// Formats a rate in bytes per second ("312.50 KB/s").
pub fn format_speed(bytes_per_sec: f64) -> String {
    if bytes_per_sec <= 0.0 {
        return "0 B/s".to_string();
    }
    let exp = (bytes_per_sec.ln() / 1024f64.ln()).floor() as usize;
    let exp = exp.min(UNITS.len() - 1);
    format!(
        "{:.2} {}/s",
        bytes_per_sec / 1024f64.powi(exp as i32),
        UNITS[exp]
    )
}

/// Formats a duration in seconds ("2.41s", "1m 12.50s" over a minute).
pub fn format_duration_secs(seconds: f64) -> String {
    if seconds < 60.0 {
        return format!("{:.2}s", seconds);
    }
    let minutes = (seconds / 60.0).floor() as u64;
    format!("{}m {:.2}s", minutes, seconds % 60.0)
}
