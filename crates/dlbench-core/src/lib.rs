pub mod config;
pub mod logging;

// Engine modules.
pub mod attempt;
pub mod error;
pub mod fmt;
pub mod profile;
pub mod progress;
pub mod run;
pub mod sampler;
pub mod session;
pub mod stats;
pub mod transport;
