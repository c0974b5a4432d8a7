//! Benchmark run state and controller.
//!
//! One `BenchmarkRun` is the aggregate for a single benchmarking session
//! under one profile: a fixed fan-out of attempts plus the sampler's
//! bandwidth series. The `RunController` launches the attempts concurrently,
//! routes transport events to the right attempt by sequence number, and
//! sequences sampler start/stop around the join-all.

mod controller;
mod state;

pub use controller::RunController;
pub use state::BenchmarkRun;
