//! localesync command implementations.
//!
//! Each subcommand lives in its own module and delegates to the
//! `localesync` library for the actual work.

pub mod pull;
pub mod push;

use thiserror::Error;

/// Failures a command reports after finishing its run.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0} file(s) failed to push")]
    PushFailed(usize),

    #[error("{0} file(s) failed to pull")]
    PullFailed(usize),
}
