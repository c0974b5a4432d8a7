//! Transfer transport interface.
//!
//! The engine never issues bytes itself; it consumes a per-attempt event
//! stream from a transport collaborator. A transport emits zero or more
//! `Progress` events followed by exactly one `Done` or `Failed`, then closes
//! the channel. Timestamps ride on the events so the engine's sample math
//! is driven entirely by transport-observed time.

mod curl;

pub use curl::CurlTransport;

use std::time::Instant;

use tokio::sync::mpsc;

/// Request target for one attempt, shaped by the profile's cache policy.
#[derive(Debug, Clone)]
pub struct TransferTarget {
    pub url: String,
}

/// One event in an attempt's transfer stream.
#[derive(Debug, Clone)]
pub enum TransferEvent {
    /// Cumulative progress as reported by the transport.
    Progress {
        bytes_loaded: u64,
        bytes_total: u64,
        at: Instant,
    },
    /// Terminal success, with the final byte count and the intermediary's
    /// opaque cache tag (e.g. HIT/MISS/BYPASS/UNKNOWN).
    Done {
        final_bytes: u64,
        cache_tag: String,
        at: Instant,
    },
    /// Terminal failure with a human-readable detail.
    Failed { detail: String, at: Instant },
}

/// Fire-once transfer initiation. Implementations must uphold the
/// zero-or-more-progress-then-one-terminal contract per call.
pub trait Transport: Send + Sync {
    fn begin_transfer(&self, target: &TransferTarget) -> mpsc::UnboundedReceiver<TransferEvent>;
}
