//! Error taxonomy for the add-to-PATH workflow.
//!
//! Every failure of a run maps onto one of these variants; the CLI converts
//! them into a `(status, message)` pair for the notifier, so nothing here
//! escapes as a panic.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The process is not elevated and the configured policy is to refuse.
    #[error("Please run as administrator.")]
    InsufficientPrivilege,

    /// An explicitly supplied target does not name an existing directory.
    #[error("Directory '{}' does not exist.", .0.display())]
    TargetDoesNotExist(PathBuf),

    /// The elevated relaunch could not be started.
    #[error("Failed to relaunch elevated: {0}")]
    ElevationFailed(String),

    /// Writing the machine-scope PATH failed. The reason comes from the OS
    /// verbatim; there is no retry.
    #[error("Failed to update the system PATH: {0}")]
    EnvironmentWriteFailed(String),

    /// Residual failures (unreadable store, unresolvable executable path).
    #[error("{0}")]
    Unknown(String),
}

impl Error {
    /// Status label shown alongside the message when this error is reported.
    pub fn status(&self) -> &'static str {
        match self {
            Error::InsufficientPrivilege => "Access denied",
            Error::TargetDoesNotExist(_) => "Error",
            Error::ElevationFailed(_) => "Elevation failed",
            Error::EnvironmentWriteFailed(_) => "Write failed",
            Error::Unknown(_) => "Error",
        }
    }
}
