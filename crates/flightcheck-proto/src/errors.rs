//! Protocol errors.

use std::fmt;

use thiserror::Error;

/// Result alias for decoding operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Where the input ran out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Truncation {
    /// Fewer than 5 bytes of a record header
    RecordHeader,
    /// Record header complete, payload short
    RecordPayload,
    /// Fewer than 4 bytes of a handshake message header
    MessageHeader,
    /// Handshake header complete, body short
    MessageBody,
}

impl fmt::Display for Truncation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match self {
            Self::RecordHeader => "record header",
            Self::RecordPayload => "record payload",
            Self::MessageHeader => "handshake header",
            Self::MessageBody => "handshake body",
        };
        f.write_str(what)
    }
}

/// Errors produced while decoding a handshake byte stream.
///
/// Any of these aborts the decode; no partial sequence is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// Input ended in the middle of a header or body.
    #[error("truncated {at}: need {needed} bytes, have {available}")]
    Truncated {
        /// Which structure was cut short
        at: Truncation,
        /// Bytes the structure requires
        needed: usize,
        /// Bytes that were actually delivered
        available: usize,
    },

    /// A record carried a content type the decoder was not allowed to skip.
    #[error("unexpected record content type {content_type} at offset {offset}")]
    UnexpectedRecordType {
        /// Raw content type byte
        content_type: u8,
        /// Offset of the record header in the record stream
        offset: usize,
    },
}
