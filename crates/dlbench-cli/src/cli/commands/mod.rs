//! Subcommand implementations.

mod matrix;
mod profiles;
mod report;
mod run;

pub use matrix::run_matrix;
pub use profiles::run_profiles;
pub use run::run_single;
