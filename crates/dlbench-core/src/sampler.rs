//! Fixed-interval bandwidth sampler.
//!
//! While a run is active, a background task wakes every `interval_ms` and
//! appends one `NetworkSample`: the sum of instantaneous speeds over
//! attempts currently downloading, converted to Mbps, tagged with seconds
//! since run start and the configured loss parameter. The loss figure is an
//! externally-known constant for the run's network condition, not a
//! measurement.
//!
//! `stop` cancels the tick task and then takes exactly one synchronous final
//! sample, so even a run shorter than one interval yields a reading. Stopping
//! twice is a no-op; dropping a running sampler aborts the task without the
//! final sample (no leaked periodic work when a run is abandoned).

use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::attempt::AttemptStatus;
use crate::run::BenchmarkRun;

/// One sampler tick. Append-only; never mutated after creation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NetworkSample {
    /// Seconds since run start; strictly increasing within a run.
    pub offset_secs: f64,
    /// Aggregate bandwidth across downloading attempts, in Mbps.
    pub bandwidth_mbps: f64,
    /// Configured loss parameter for the run's network condition.
    pub loss_percent: f64,
}

pub struct Sampler {
    state: Arc<RwLock<BenchmarkRun>>,
    loss_percent: f64,
    task: Option<tokio::task::JoinHandle<()>>,
}

impl Sampler {
    /// Spawns the tick task. The first sample lands one full interval in,
    /// never at t=0.
    pub fn start(state: Arc<RwLock<BenchmarkRun>>, interval_ms: u64, loss_percent: f64) -> Self {
        let tick_state = Arc::clone(&state);
        let task = tokio::spawn(async move {
            let interval = Duration::from_millis(interval_ms.max(1));
            loop {
                tokio::time::sleep(interval).await;
                collect_sample(&tick_state, loss_percent);
            }
        });
        Self {
            state,
            loss_percent,
            task: Some(task),
        }
    }

    /// Cancels the tick task and takes one final sample. Idempotent.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            collect_sample(&self.state, self.loss_percent);
        }
    }
}

impl Drop for Sampler {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Appends one sample from a point-in-time view of the run. No-op when the
/// run is not active (the forced final sample runs before the controller
/// clears the flag).
fn collect_sample(state: &Arc<RwLock<BenchmarkRun>>, loss_percent: f64) {
    let mut run = state.write().unwrap();
    if !run.active {
        return;
    }
    let Some(started_at) = run.started_at else {
        return;
    };
    let offset_secs = started_at.elapsed().as_secs_f64();
    let aggregate_bps: f64 = run
        .attempts
        .iter()
        .filter(|a| a.status == AttemptStatus::Downloading)
        .map(|a| a.speed_bps)
        .sum();
    let bandwidth_mbps = aggregate_bps * 8.0 / 1_048_576.0;
    run.samples.push(NetworkSample {
        offset_secs,
        bandwidth_mbps,
        loss_percent,
    });
}
