//! Handshake decoding over captured trace logs.
//!
//! Processes under test (QUIC example clients, `openssl s_client -debug`, a
//! TLS-terminating proxy) print the bytes they exchange as hex dumps inside
//! their debug output. This crate recovers those bytes and hands them to
//! [`flightcheck_proto`] for handshake framing.
//!
//! # Pipeline
//!
//! ```text
//! lines ──> HexDumpScanner ──> [HexDumpBlock] ──> assemble(filter) ──> Bytes ──> decode ──> HandshakeSequence
//!             (marker, format)                        (direction/level)         (framing)
//! ```
//!
//! Everything here is synchronous and owns its data. A [`DecodeSession`] holds
//! one snapshot of lines and caches the scan and decode results on first
//! access; nothing is shared between sessions.
//!
//! # Components
//!
//! - [`dump`]: dump-line formats (`hexdump -C`, OpenSSL BIO dump)
//! - [`marker`]: leading-marker predicates that open a dump block
//! - [`block`]: decoded blocks and where they came from
//! - [`scanner`]: single-pass block iterator over a line snapshot
//! - [`assemble`]: block concatenation into one byte buffer
//! - [`session`]: memoized per-run decode session
//! - [`log_file`]: incremental log-file reader
//! - [`error`]: error types

pub mod assemble;
pub mod block;
pub mod dump;
pub mod error;
pub mod log_file;
pub mod marker;
pub mod scanner;
pub mod session;

pub use assemble::assemble;
pub use block::{BlockFilter, BlockOrigin, CryptoLevel, Direction, HexDumpBlock};
pub use dump::{DumpFormat, DumpRow, DumpStyle, InvalidCell, LineShape};
pub use error::{Error, FormatError, Result};
pub use log_file::LogFile;
pub use marker::{LeadingMarker, Marker};
pub use scanner::HexDumpScanner;
pub use session::{DecodeSession, SessionConfig};
