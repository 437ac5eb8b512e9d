//! CLI errors.

use std::path::PathBuf;

use thiserror::Error;

/// Failures that stop a command before it can report a result.
#[derive(Debug, Error)]
pub enum CliError {
    /// The log could not be read or decoded
    #[error(transparent)]
    Decode(#[from] flightcheck_core::Error),

    /// Reading an input file failed
    #[error("cannot read {}: {source}", path.display())]
    Read {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// Writing the report failed
    #[error("cannot write report: {0}")]
    Write(#[from] std::io::Error),
}
