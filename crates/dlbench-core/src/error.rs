//! Engine error taxonomy.
//!
//! `InvalidTransition` is a caller error (an operation applied in the wrong
//! attempt state); it fails that call only and must not affect other
//! attempts. `RunAlreadyActive` rejects a redundant start without side
//! effects. Transport-reported transfer failures are not errors at this
//! level: they mark the attempt `Error` and the run carries on.

use crate::attempt::AttemptStatus;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    /// Operation applied to an attempt outside the state that permits it.
    #[error("attempt {sequence}: {op} is not valid in state {state:?}")]
    InvalidTransition {
        sequence: u32,
        op: &'static str,
        state: AttemptStatus,
    },

    /// A run is already active for this controller.
    #[error("a benchmark run is already active")]
    RunAlreadyActive,
}
