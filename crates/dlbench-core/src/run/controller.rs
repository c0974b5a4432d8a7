//! Run controller: concurrent launch, event routing, join-all.

use std::sync::{Arc, RwLock};
use std::time::Instant;

use tokio::sync::mpsc;

use crate::attempt::Attempt;
use crate::config::BenchConfig;
use crate::error::EngineError;
use crate::profile::Profile;
use crate::sampler::Sampler;
use crate::stats::{self, RunStatistics};
use crate::transport::{Transport, TransferEvent};

use super::state::BenchmarkRun;

/// Owns one profile's run state and drives runs to completion.
///
/// `start_run` suspends until every attempt is terminal; one attempt's
/// failure never cancels the others. Readers pull snapshots at any time.
pub struct RunController {
    profile: Profile,
    state: Arc<RwLock<BenchmarkRun>>,
    baseline_bps: f64,
    sample_interval_ms: u64,
    loss_percent: f64,
}

impl RunController {
    pub fn new(profile: Profile, cfg: &BenchConfig) -> Self {
        Self {
            profile,
            state: Arc::new(RwLock::new(BenchmarkRun::default())),
            baseline_bps: cfg.baseline_bytes_per_sec as f64,
            sample_interval_ms: cfg.sample_interval_ms,
            loss_percent: cfg.loss_percent,
        }
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    /// Point-in-time copy of the run state (attempts, samples, active flag).
    pub fn snapshot(&self) -> BenchmarkRun {
        self.state.read().unwrap().clone()
    }

    /// Run-level means over the current snapshot.
    pub fn statistics(&self) -> RunStatistics {
        stats::compute(&self.snapshot())
    }

    /// Executes one full run: allocates `fanout` pending attempts, starts the
    /// sampler, launches all transfers concurrently, and returns once every
    /// attempt has reached a terminal state and the sampler has stopped.
    ///
    /// Rejects with `RunAlreadyActive` (no side effects) while a run is in
    /// flight. If the caller drops this future mid-run, the controller is
    /// released immediately (`active` cleared, sampler aborted) while the
    /// outstanding transfers finish or fail on their own; their late events
    /// carry the abandoned run's epoch and never touch a later run.
    pub async fn start_run<T: Transport>(
        &self,
        transport: &T,
        base_url: &str,
        fanout: usize,
    ) -> Result<(), EngineError> {
        let epoch;
        {
            let mut run = self.state.write().unwrap();
            if run.active {
                return Err(EngineError::RunAlreadyActive);
            }
            run.epoch += 1;
            epoch = run.epoch;
            run.attempts = (1..=fanout as u32)
                .map(|seq| Attempt::new(seq, self.baseline_bps))
                .collect();
            run.samples.clear();
            run.started_at = Some(Instant::now());
            run.active = true;
        }
        tracing::info!(
            profile = self.profile.id,
            fanout,
            url = base_url,
            "benchmark run started"
        );

        let mut sampler = Sampler::start(
            Arc::clone(&self.state),
            self.sample_interval_ms,
            self.loss_percent,
        );
        let mut guard = RunGuard {
            state: Arc::clone(&self.state),
            epoch,
            finished: false,
        };

        // Detached tasks: dropping the handles (run abandoned) leaves the
        // transfers running to their own terminal state.
        let mut transfers = Vec::with_capacity(fanout);
        for sequence in 1..=fanout as u32 {
            let target = self.profile.request_target(base_url, sequence);
            let events = transport.begin_transfer(&target);
            let state = Arc::clone(&self.state);
            transfers.push(tokio::spawn(drive_attempt(state, epoch, sequence, events)));
        }
        // Join-all: a failed attempt is a normal outcome of the join.
        for handle in transfers {
            if let Err(e) = handle.await {
                tracing::warn!("transfer task join: {}", e);
            }
        }

        sampler.stop();
        guard.finish();
        tracing::info!(profile = self.profile.id, "benchmark run finished");
        Ok(())
    }
}

/// Clears `active` exactly once: on the normal path after the sampler has
/// taken its final sample, or from `Drop` when the `start_run` future is
/// abandoned mid-run, so the controller accepts a fresh run afterwards.
struct RunGuard {
    state: Arc<RwLock<BenchmarkRun>>,
    epoch: u64,
    finished: bool,
}

impl RunGuard {
    fn finish(&mut self) {
        if self.finished {
            return;
        }
        self.finished = true;
        let mut run = self.state.write().unwrap();
        if run.epoch == self.epoch {
            run.active = false;
        }
    }
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        if !self.finished {
            tracing::warn!("benchmark run abandoned before completion");
            self.finish();
        }
    }
}

/// Feeds one attempt from its transport event stream until a terminal event.
///
/// Single writer for this attempt: only this task mutates it. Events for
/// other attempts arrive on their own channels, so interleaving across
/// attempts can never route a sample to the wrong one.
async fn drive_attempt(
    state: Arc<RwLock<BenchmarkRun>>,
    epoch: u64,
    sequence: u32,
    mut events: mpsc::UnboundedReceiver<TransferEvent>,
) {
    with_attempt(&state, epoch, sequence, |attempt| {
        attempt.start(Instant::now())
    });

    while let Some(event) = events.recv().await {
        let terminal = matches!(
            event,
            TransferEvent::Done { .. } | TransferEvent::Failed { .. }
        );
        with_attempt(&state, epoch, sequence, |attempt| match &event {
            TransferEvent::Progress {
                bytes_loaded,
                bytes_total,
                at,
            } => attempt.apply_sample(*bytes_loaded, *bytes_total, *at),
            TransferEvent::Done {
                final_bytes,
                cache_tag,
                at,
            } => attempt.complete(*final_bytes, cache_tag, *at),
            TransferEvent::Failed { detail, at } => attempt.fail(detail, *at),
        });
        if terminal {
            return;
        }
    }

    // Transport contract breach: the stream closed without a terminal event.
    with_attempt(&state, epoch, sequence, |attempt| {
        attempt.fail("transport closed without a terminal event", Instant::now())
    });
}

/// Applies `op` to the attempt with the given sequence, logging (not
/// propagating) invalid-transition errors so one bad event cannot corrupt
/// other attempts or abort the run. Events carrying a superseded epoch are
/// dropped: they belong to an abandoned run, and the sequence numbers of a
/// later run must not receive them.
fn with_attempt<F>(state: &Arc<RwLock<BenchmarkRun>>, epoch: u64, sequence: u32, op: F)
where
    F: FnOnce(&mut Attempt) -> Result<(), EngineError>,
{
    let mut run = state.write().unwrap();
    if run.epoch != epoch {
        tracing::debug!(sequence, "dropped event from a superseded run");
        return;
    }
    match run.attempt_mut(sequence) {
        Some(attempt) => {
            if let Err(e) = op(attempt) {
                tracing::warn!(sequence, "dropped event: {}", e);
            }
        }
        None => tracing::warn!(sequence, "event for unknown attempt"),
    }
}
