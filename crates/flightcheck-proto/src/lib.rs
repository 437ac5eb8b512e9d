//! TLS handshake framing for captured byte streams.
//!
//! Turns the raw bytes a TLS or QUIC endpoint put on the wire (or handed to its
//! crypto layer) back into an ordered list of handshake messages. Two input
//! shapes are supported: TLS records (5-byte record header around each
//! payload) and bare handshake messages as carried by QUIC CRYPTO frames.
//!
//! Handshake messages routinely span record boundaries, and the captures this
//! crate is fed were chunked by whatever produced the trace, so the decoder is
//! streaming: it buffers partial headers and bodies until the rest arrives and
//! only reports truncation once the caller says the input is finished.
//!
//! # Security
//!
//! Nothing here verifies signatures, MACs or key schedules. The decoder only
//! recovers message framing and type, and every length is bounds-checked
//! against the bytes actually received.
#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod decoder;
pub mod errors;
pub mod handshake;
pub mod record;

pub use decoder::{DecoderConfig, Framing, HandshakeDecoder, MessageCursor, RecordPolicy, decode};
pub use errors::{ProtocolError, Result, Truncation};
pub use handshake::{
    HELLO_RETRY_REQUEST_RANDOM, HandshakeMessage, HandshakeSequence, HandshakeType, MessageKind,
};
pub use record::{ContentType, RecordHeader};
