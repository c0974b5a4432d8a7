//! Progress sample decoding (raw transfer events -> derived quantities).
//!
//! Consumers feed cumulative bytes-loaded/time pairs as the transport reports
//! them; the decoder turns each pair into instantaneous speed, a progress
//! percentage, and a first-byte flag. Speed is rate = delta_bytes /
//! delta_secs, defined as 0 when the interval is not positive so duplicate or
//! out-of-order events never divide by zero or go negative.

use std::time::Instant;

/// Previous cumulative observation for one attempt (decoder window).
#[derive(Debug, Clone, Copy)]
pub struct SampleWindow {
    /// Cumulative bytes loaded at the previous event.
    pub bytes_loaded: u64,
    /// Wall-clock time of the previous event.
    pub at: Instant,
}

/// Derived quantities for one progress event.
#[derive(Debug, Clone, Copy)]
pub struct DecodedSample {
    /// Instantaneous transfer speed in bytes per second.
    pub speed_bps: f64,
    /// Whole-number progress in [0, 100]; 0 when the total size is unknown.
    pub progress_percent: u8,
    /// True exactly once per attempt: the first event with nonzero bytes.
    pub first_byte: bool,
}

/// Decodes one cumulative progress event against the previous window.
/// `seen_first_byte` is whether a first byte was already observed for this
/// attempt; the returned `first_byte` flag is set at most once.
pub fn decode(
    prev: &SampleWindow,
    bytes_loaded: u64,
    bytes_total: u64,
    at: Instant,
    seen_first_byte: bool,
) -> DecodedSample {
    let elapsed = at.saturating_duration_since(prev.at).as_secs_f64();
    let delta = bytes_loaded.saturating_sub(prev.bytes_loaded);
    let speed_bps = if elapsed > 0.0 {
        delta as f64 / elapsed
    } else {
        0.0
    };

    let progress_percent = if bytes_total > 0 {
        let pct = (bytes_loaded as f64 / bytes_total as f64 * 100.0).round();
        pct.clamp(0.0, 100.0) as u8
    } else {
        0
    };

    DecodedSample {
        speed_bps,
        progress_percent,
        first_byte: !seen_first_byte && bytes_loaded > 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn speed_from_consecutive_samples() {
        let t0 = Instant::now();
        let prev = SampleWindow {
            bytes_loaded: 1000,
            at: t0,
        };
        let decoded = decode(&prev, 3000, 10_000, t0 + Duration::from_secs(2), true);
        assert!((decoded.speed_bps - 1000.0).abs() < 1e-9);
        assert_eq!(decoded.progress_percent, 30);
        assert!(!decoded.first_byte);
    }

    #[test]
    fn zero_interval_yields_zero_speed() {
        let t0 = Instant::now();
        let prev = SampleWindow {
            bytes_loaded: 1000,
            at: t0,
        };
        let decoded = decode(&prev, 5000, 10_000, t0, true);
        assert_eq!(decoded.speed_bps, 0.0);
    }

    #[test]
    fn out_of_order_event_never_goes_negative() {
        let t0 = Instant::now();
        let prev = SampleWindow {
            bytes_loaded: 5000,
            at: t0 + Duration::from_secs(1),
        };
        // Earlier timestamp and fewer bytes than the window.
        let decoded = decode(&prev, 4000, 10_000, t0, true);
        assert_eq!(decoded.speed_bps, 0.0);
    }

    #[test]
    fn percent_zero_when_total_unknown() {
        let t0 = Instant::now();
        let prev = SampleWindow {
            bytes_loaded: 0,
            at: t0,
        };
        let decoded = decode(&prev, 4096, 0, t0 + Duration::from_millis(100), false);
        assert_eq!(decoded.progress_percent, 0);
        assert!(decoded.first_byte);
    }

    #[test]
    fn first_byte_reported_once() {
        let t0 = Instant::now();
        let prev = SampleWindow {
            bytes_loaded: 0,
            at: t0,
        };
        let first = decode(&prev, 1, 100, t0 + Duration::from_millis(10), false);
        assert!(first.first_byte);
        let prev = SampleWindow {
            bytes_loaded: 1,
            at: t0 + Duration::from_millis(10),
        };
        let second = decode(&prev, 2, 100, t0 + Duration::from_millis(20), true);
        assert!(!second.first_byte);
    }

    #[test]
    fn no_first_byte_while_empty() {
        let t0 = Instant::now();
        let prev = SampleWindow {
            bytes_loaded: 0,
            at: t0,
        };
        let decoded = decode(&prev, 0, 100, t0 + Duration::from_millis(10), false);
        assert!(!decoded.first_byte);
    }

    #[test]
    fn percent_rounds_to_nearest() {
        let t0 = Instant::now();
        let prev = SampleWindow {
            bytes_loaded: 0,
            at: t0,
        };
        let decoded = decode(&prev, 666, 1000, t0 + Duration::from_secs(1), true);
        assert_eq!(decoded.progress_percent, 67);
    }
}
