//! Assertion failures.

use std::path::PathBuf;

use thiserror::Error;

/// Observed signature does not start with the expected pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected flight \"{expected}\", got \"{actual}\"")]
pub struct FlightMismatch {
    /// Pattern after retry normalization
    pub expected: String,
    /// Observed signature
    pub actual: String,
}

/// A client run that fails an assertion.
#[derive(Debug, Error)]
pub enum RunError {
    /// The captured log could not be decoded
    #[error("decode failed: {0}")]
    Decode(#[from] flightcheck_core::Error),

    /// The client's log could not be read
    #[error("cannot read log {}: {source}", path.display())]
    ReadLog {
        /// Log file
        path: PathBuf,
        /// Underlying error
        source: flightcheck_core::Error,
    },

    /// The handshake has the wrong shape
    #[error(transparent)]
    Mismatch(#[from] FlightMismatch),

    /// The client process did not exit cleanly
    #[error("client exited with status {code}")]
    ExitStatus {
        /// Exit code reported for the run
        code: i32,
    },
}
