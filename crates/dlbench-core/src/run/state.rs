//! Shared state for one benchmark run.

use std::time::Instant;

use crate::attempt::Attempt;
use crate::sampler::NetworkSample;

/// Aggregate state for one benchmarking session under one profile.
///
/// Mutated only by its own controller's tasks: each attempt by its transfer
/// task, the sample list by the sampler. Readers clone a snapshot.
#[derive(Debug, Clone, Default)]
pub struct BenchmarkRun {
    /// Ordered attempts, sequence numbers 1..=fanout; size fixed at run start.
    pub attempts: Vec<Attempt>,
    /// Append-only bandwidth series, cleared at the start of each run.
    pub samples: Vec<NetworkSample>,
    /// Run start time; `None` until the first run executes.
    pub started_at: Option<Instant>,
    /// True from run start until all attempts are terminal and the sampler
    /// has stopped.
    pub active: bool,
    /// Incremented at each run start; events from an abandoned run carry the
    /// old epoch and are ignored by later runs.
    pub(crate) epoch: u64,
}

impl BenchmarkRun {
    /// The attempt with the given sequence number, for event routing.
    pub fn attempt_mut(&mut self, sequence: u32) -> Option<&mut Attempt> {
        self.attempts.iter_mut().find(|a| a.sequence == sequence)
    }

    pub fn attempt(&self, sequence: u32) -> Option<&Attempt> {
        self.attempts.iter().find(|a| a.sequence == sequence)
    }
}
