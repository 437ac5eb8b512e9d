//! Error types for scanning and decoding captured logs.

use flightcheck_proto::ProtocolError;
use thiserror::Error;

/// A dump block that cannot be turned into a consistent byte sequence.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// A byte column is not two hex digits.
    #[error("line {line}: column {column} is not a hex byte: {token:?}")]
    InvalidByte {
        /// 1-based line number
        line: usize,
        /// 0-based byte column
        column: usize,
        /// Offending text
        token: String,
    },

    /// A row's offset does not match the bytes decoded before it.
    #[error("line {line}: row offset {found:#x} does not follow {expected:#x} decoded bytes")]
    OffsetMismatch {
        /// 1-based line number
        line: usize,
        /// Bytes decoded so far in the block
        expected: usize,
        /// Offset printed on the row
        found: usize,
    },

    /// A `*` repeat row without a row to repeat or an offset to stop at.
    #[error("line {line}: repeat marker cannot be resolved")]
    DanglingRepeat {
        /// 1-based line number of the `*`
        line: usize,
    },

    /// A block grew past [`DumpFormat::max_block_len`](crate::DumpFormat::max_block_len).
    #[error("line {line}: block exceeds {limit} bytes")]
    BlockTooLarge {
        /// 1-based line number of the row that crossed the limit
        line: usize,
        /// Configured limit
        limit: usize,
    },
}

/// Errors from a decode session.
#[derive(Debug, Error)]
pub enum Error {
    /// Dump text could not be decoded into bytes
    #[error("hex dump: {0}")]
    Format(#[from] FormatError),

    /// Bytes could not be framed as handshake messages
    #[error("handshake: {0}")]
    Protocol(#[from] ProtocolError),

    /// Reading the log failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for session operations.
pub type Result<T> = std::result::Result<T, Error>;
