//! Run-level statistics (pure aggregation over a run snapshot).
//!
//! Timing means are defined over completed attempts only; errored attempts
//! are excluded from the means but surfaced through the `failed` count.
//! Per-attempt throughput uses the transfer phase, never total elapsed, so
//! queue contention does not depress the speed figure. With zero completed
//! attempts every mean is 0, never NaN.

use crate::attempt::AttemptStatus;
use crate::run::BenchmarkRun;

/// Run-level means, recomputed on demand from a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RunStatistics {
    /// Mean transfer time (first byte to completion), seconds.
    pub mean_transfer_secs: f64,
    /// Mean queue wait: difference of the total and transfer means.
    pub mean_queue_wait_secs: f64,
    /// Mean total elapsed (initiation to completion), seconds.
    pub mean_total_secs: f64,
    /// Mean per-attempt throughput over the transfer phase, Mbps.
    pub mean_throughput_mbps: f64,
    /// Mean of the collected samples' loss parameter, percent.
    pub mean_loss_percent: f64,
    pub completed: usize,
    pub failed: usize,
}

/// Computes run statistics from a snapshot. Pure and idempotent: the same
/// snapshot always yields the same figures.
pub fn compute(run: &BenchmarkRun) -> RunStatistics {
    let completed: Vec<_> = run
        .attempts
        .iter()
        .filter(|a| a.status == AttemptStatus::Completed)
        .collect();
    let failed = run
        .attempts
        .iter()
        .filter(|a| a.status == AttemptStatus::Error)
        .count();

    let n = completed.len();
    let mean = |sum: f64| if n > 0 { sum / n as f64 } else { 0.0 };

    let mean_transfer_secs = mean(completed.iter().map(|a| a.transfer_elapsed_secs).sum());
    let mean_total_secs = mean(completed.iter().map(|a| a.total_elapsed_secs).sum());
    // Two independent means over the same attempt set, not a mean of
    // per-attempt differences.
    let mean_queue_wait_secs = mean_total_secs - mean_transfer_secs;

    let mean_throughput_mbps = mean(
        completed
            .iter()
            .map(|a| {
                if a.transfer_elapsed_secs > 0.0 {
                    a.bytes_total as f64 / a.transfer_elapsed_secs * 8.0 / 1_048_576.0
                } else {
                    0.0
                }
            })
            .sum(),
    );

    let mean_loss_percent = if run.samples.is_empty() {
        0.0
    } else {
        run.samples.iter().map(|s| s.loss_percent).sum::<f64>() / run.samples.len() as f64
    };

    RunStatistics {
        mean_transfer_secs,
        mean_queue_wait_secs,
        mean_total_secs,
        mean_throughput_mbps,
        mean_loss_percent,
        completed: n,
        failed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attempt::Attempt;
    use crate::sampler::NetworkSample;
    use std::time::{Duration, Instant};

    const MIB: u64 = 1024 * 1024;

    /// Builds a completed attempt with an exact synthetic timeline.
    fn completed_attempt(seq: u32, bytes: u64, queue_secs: f64, transfer_secs: f64) -> Attempt {
        let t0 = Instant::now();
        let mut a = Attempt::new(seq, 640_000.0);
        a.start(t0).unwrap();
        let first_byte = t0 + Duration::from_secs_f64(queue_secs);
        a.apply_sample(1, bytes, first_byte).unwrap();
        a.complete(
            bytes,
            "MISS",
            first_byte + Duration::from_secs_f64(transfer_secs),
        )
        .unwrap();
        a
    }

    fn failed_attempt(seq: u32) -> Attempt {
        let t0 = Instant::now();
        let mut a = Attempt::new(seq, 640_000.0);
        a.start(t0).unwrap();
        a.fail("boom", t0 + Duration::from_secs(1)).unwrap();
        a
    }

    #[test]
    fn zero_completed_yields_all_zero_means() {
        let run = BenchmarkRun::default();
        let stats = compute(&run);
        assert_eq!(stats, RunStatistics::default());

        // Same with only errored attempts present.
        let run = BenchmarkRun {
            attempts: vec![failed_attempt(1), failed_attempt(2)],
            ..Default::default()
        };
        let stats = compute(&run);
        assert_eq!(stats.mean_transfer_secs, 0.0);
        assert_eq!(stats.mean_total_secs, 0.0);
        assert_eq!(stats.mean_queue_wait_secs, 0.0);
        assert_eq!(stats.mean_throughput_mbps, 0.0);
        assert_eq!(stats.completed, 0);
        assert_eq!(stats.failed, 2);
    }

    #[test]
    fn ten_mib_in_two_seconds_is_forty_mbps() {
        let run = BenchmarkRun {
            attempts: (1..=20)
                .map(|seq| completed_attempt(seq, 10 * MIB, 0.5, 2.0))
                .collect(),
            ..Default::default()
        };
        let stats = compute(&run);
        assert_eq!(stats.completed, 20);
        assert!((stats.mean_transfer_secs - 2.0).abs() < 1e-9);
        assert!((stats.mean_total_secs - 2.5).abs() < 1e-9);
        assert!((stats.mean_queue_wait_secs - 0.5).abs() < 1e-9);
        assert!((stats.mean_throughput_mbps - 40.0).abs() < 1e-9);
    }

    #[test]
    fn errored_attempts_excluded_from_timing_means() {
        let run = BenchmarkRun {
            attempts: vec![
                completed_attempt(1, MIB, 0.0, 1.0),
                completed_attempt(2, MIB, 0.0, 3.0),
                failed_attempt(3),
            ],
            ..Default::default()
        };
        let stats = compute(&run);
        assert_eq!(stats.completed, 2);
        assert_eq!(stats.failed, 1);
        assert!((stats.mean_transfer_secs - 2.0).abs() < 1e-9);
    }

    #[test]
    fn loss_mean_over_samples() {
        let sample = |offset_secs, loss_percent| NetworkSample {
            offset_secs,
            bandwidth_mbps: 0.0,
            loss_percent,
        };
        let run = BenchmarkRun {
            samples: vec![sample(0.2, 1.0), sample(0.4, 2.0), sample(0.6, 3.0)],
            ..Default::default()
        };
        assert!((compute(&run).mean_loss_percent - 2.0).abs() < 1e-9);
    }

    #[test]
    fn recompute_on_same_snapshot_is_identical() {
        let run = BenchmarkRun {
            attempts: vec![
                completed_attempt(1, 3 * MIB, 0.25, 1.5),
                failed_attempt(2),
            ],
            samples: vec![NetworkSample {
                offset_secs: 0.2,
                bandwidth_mbps: 12.0,
                loss_percent: 2.0,
            }],
            ..Default::default()
        };
        assert_eq!(compute(&run), compute(&run));
    }
}
