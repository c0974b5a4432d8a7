//! Attempt lifecycle state machine.
//!
//! One `Attempt` is a single download try: `Pending -> Downloading ->
//! {Completed, Error}`. Progress samples re-enter `Downloading` (repeated
//! self-transition updating derived fields); terminal states are final. Each
//! attempt is mutated only by its own transfer-handling task and read by the
//! sampler and the statistics aggregator, so no per-field locking is needed.

use std::time::Instant;

use crate::error::EngineError;
use crate::progress::{self, SampleWindow};

/// Stall detection starts with the Nth applied sample (early samples are noisy).
const STALL_MIN_SAMPLES: u32 = 4;
/// A stall requires the new speed to fall below this floor...
const STALL_LOW_BPS: f64 = 10.0 * 1024.0;
/// ...while the previous sample was above this ceiling: a sharp drop, not
/// "currently slow". The asymmetric pair avoids flagging slow-but-steady
/// links.
const STALL_HIGH_BPS: f64 = 50.0 * 1024.0;

/// Attempt lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptStatus {
    Pending,
    Downloading,
    Completed,
    Error,
}

/// One download try within a run. Cloned wholesale to hand out snapshots.
#[derive(Debug, Clone)]
pub struct Attempt {
    /// Position within the run, 1-based, assigned at creation.
    pub sequence: u32,
    pub status: AttemptStatus,
    /// Set on transition into `Downloading`.
    pub started_at: Option<Instant>,
    /// Time of the first progress event reporting nonzero bytes; set once.
    pub first_byte_at: Option<Instant>,
    pub bytes_loaded: u64,
    /// Total size as reported by the transport; 0 until known.
    pub bytes_total: u64,
    /// Whole-number progress; reaches 100 only on completion.
    pub progress_percent: u8,
    /// Instantaneous speed from the latest sample pair; 0 once terminal.
    pub speed_bps: f64,
    /// Running average over the transfer phase (bytes_loaded / transfer time).
    pub avg_speed_bps: f64,
    pub stall_count: u32,
    /// Wall time from start to the latest event (or terminal time).
    pub total_elapsed_secs: f64,
    /// Wall time from first byte to the latest event; 0 if no byte arrived.
    pub transfer_elapsed_secs: f64,
    /// Relative-to-baseline slowdown in [0, 100], computed on completion.
    pub degradation_percent: f64,
    /// Present only in `Error`.
    pub error_detail: Option<String>,
    /// Opaque intermediary cache tag; present only in `Completed`.
    pub cache_status: Option<String>,

    baseline_bps: f64,
    window: Option<SampleWindow>,
    samples_applied: u32,
    prev_speed_bps: f64,
}

impl Attempt {
    /// Creates a pending attempt. `baseline_bps` is the reference throughput
    /// the degradation ratio is scored against.
    pub fn new(sequence: u32, baseline_bps: f64) -> Self {
        Self {
            sequence,
            status: AttemptStatus::Pending,
            started_at: None,
            first_byte_at: None,
            bytes_loaded: 0,
            bytes_total: 0,
            progress_percent: 0,
            speed_bps: 0.0,
            avg_speed_bps: 0.0,
            stall_count: 0,
            total_elapsed_secs: 0.0,
            transfer_elapsed_secs: 0.0,
            degradation_percent: 0.0,
            error_detail: None,
            cache_status: None,
            baseline_bps,
            window: None,
            samples_applied: 0,
            prev_speed_bps: 0.0,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.status, AttemptStatus::Completed | AttemptStatus::Error)
    }

    fn invalid(&self, op: &'static str) -> EngineError {
        EngineError::InvalidTransition {
            sequence: self.sequence,
            op,
            state: self.status,
        }
    }

    /// `Pending -> Downloading`. Sets the start time and resets the per-run
    /// counters.
    pub fn start(&mut self, at: Instant) -> Result<(), EngineError> {
        if self.status != AttemptStatus::Pending {
            return Err(self.invalid("start"));
        }
        self.status = AttemptStatus::Downloading;
        self.started_at = Some(at);
        self.stall_count = 0;
        self.speed_bps = 0.0;
        self.avg_speed_bps = 0.0;
        self.window = Some(SampleWindow {
            bytes_loaded: 0,
            at,
        });
        Ok(())
    }

    /// Applies one cumulative progress event. Valid only while `Downloading`.
    pub fn apply_sample(
        &mut self,
        bytes_loaded: u64,
        bytes_total: u64,
        at: Instant,
    ) -> Result<(), EngineError> {
        if self.status != AttemptStatus::Downloading {
            return Err(self.invalid("apply_sample"));
        }
        let window = self.window.unwrap_or(SampleWindow {
            bytes_loaded: 0,
            at,
        });
        let decoded = progress::decode(
            &window,
            bytes_loaded,
            bytes_total,
            at,
            self.first_byte_at.is_some(),
        );
        self.samples_applied += 1;

        if decoded.first_byte {
            self.first_byte_at = Some(at);
            if let Some(started) = self.started_at {
                tracing::debug!(
                    sequence = self.sequence,
                    wait_secs = at.saturating_duration_since(started).as_secs_f64(),
                    "first byte received"
                );
            }
        }

        self.bytes_loaded = bytes_loaded;
        self.bytes_total = bytes_total;
        // Monotone while downloading; 100 is reserved for completion.
        self.progress_percent = self
            .progress_percent
            .max(decoded.progress_percent.min(99));
        self.speed_bps = decoded.speed_bps;

        if let Some(started) = self.started_at {
            self.total_elapsed_secs = at.saturating_duration_since(started).as_secs_f64();
        }
        self.transfer_elapsed_secs = self
            .first_byte_at
            .map(|fb| at.saturating_duration_since(fb).as_secs_f64())
            .unwrap_or(0.0);
        self.avg_speed_bps = if self.transfer_elapsed_secs > 0.0 {
            bytes_loaded as f64 / self.transfer_elapsed_secs
        } else {
            0.0
        };

        // Stall: sharp drop from healthy to near-zero throughput, mid-transfer.
        let not_complete = if bytes_total > 0 {
            bytes_loaded < bytes_total
        } else {
            true
        };
        if self.samples_applied >= STALL_MIN_SAMPLES
            && bytes_loaded > 0
            && not_complete
            && decoded.speed_bps < STALL_LOW_BPS
            && self.prev_speed_bps > STALL_HIGH_BPS
        {
            self.stall_count += 1;
            tracing::debug!(
                sequence = self.sequence,
                speed_bps = decoded.speed_bps,
                prev_speed_bps = self.prev_speed_bps,
                stalls = self.stall_count,
                "stall detected"
            );
        }
        self.prev_speed_bps = decoded.speed_bps;
        self.window = Some(SampleWindow { bytes_loaded, at });
        Ok(())
    }

    /// `Downloading -> Completed`. Finalizes timing and scores the transfer
    /// against the baseline throughput.
    pub fn complete(
        &mut self,
        final_bytes: u64,
        cache_tag: &str,
        at: Instant,
    ) -> Result<(), EngineError> {
        if self.status != AttemptStatus::Downloading {
            return Err(self.invalid("complete"));
        }
        let final_bytes = if final_bytes > 0 {
            final_bytes
        } else {
            self.bytes_loaded
        };
        self.status = AttemptStatus::Completed;
        self.bytes_loaded = final_bytes;
        self.bytes_total = final_bytes;
        self.progress_percent = 100;
        self.speed_bps = 0.0;
        self.cache_status = Some(cache_tag.to_string());

        if let Some(started) = self.started_at {
            self.total_elapsed_secs = at.saturating_duration_since(started).as_secs_f64();
        }
        self.transfer_elapsed_secs = self
            .first_byte_at
            .map(|fb| at.saturating_duration_since(fb).as_secs_f64())
            .unwrap_or(0.0);

        let actual_bps = if self.transfer_elapsed_secs > 0.0 {
            final_bytes as f64 / self.transfer_elapsed_secs
        } else {
            0.0
        };
        self.avg_speed_bps = actual_bps;
        self.degradation_percent = if self.baseline_bps > 0.0 {
            ((self.baseline_bps - actual_bps) / self.baseline_bps * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        };

        tracing::info!(
            sequence = self.sequence,
            bytes = final_bytes,
            total_secs = self.total_elapsed_secs,
            transfer_secs = self.transfer_elapsed_secs,
            queue_secs = self.total_elapsed_secs - self.transfer_elapsed_secs,
            speed_bps = actual_bps,
            degradation = self.degradation_percent,
            stalls = self.stall_count,
            cache = cache_tag,
            "attempt completed"
        );
        Ok(())
    }

    /// `Downloading -> Error`. Keeps whatever timing was captured so far.
    pub fn fail(&mut self, detail: &str, at: Instant) -> Result<(), EngineError> {
        if self.status != AttemptStatus::Downloading {
            return Err(self.invalid("fail"));
        }
        self.status = AttemptStatus::Error;
        self.speed_bps = 0.0;
        self.error_detail = Some(detail.to_string());
        if let Some(started) = self.started_at {
            self.total_elapsed_secs = at.saturating_duration_since(started).as_secs_f64();
        }
        self.transfer_elapsed_secs = self
            .first_byte_at
            .map(|fb| at.saturating_duration_since(fb).as_secs_f64())
            .unwrap_or(0.0);
        tracing::warn!(sequence = self.sequence, detail, "attempt failed");
        Ok(())
    }
}
