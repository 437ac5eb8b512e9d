//! Memoized decode session over one log snapshot.
//!
//! A session owns its lines and computes each stage at most once:
//!
//! ```text
//! lines ──scan──> blocks ──assemble──> buffer ──decode──> HandshakeSequence
//!                 (cached)             (cached)           (cached)
//! ```
//!
//! A failing stage is not cached. Every call repeats the work and returns the
//! same error, so callers never see a partial sequence.

use std::cell::OnceCell;

use bytes::Bytes;
use flightcheck_proto::{DecoderConfig, HandshakeSequence, RecordPolicy, decode};
use tracing::debug;

use crate::{
    assemble::assemble,
    block::{BlockFilter, Direction, HexDumpBlock},
    dump::DumpFormat,
    error::Result,
    marker::Marker,
    scanner::HexDumpScanner,
};

/// Line announcing that the server refused 0-RTT data.
const EARLY_DATA_REJECTED: &str = "Early data was rejected by server";

/// How a session finds, selects and frames the bytes in its log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Line that opens a dump block
    pub marker: Marker,
    /// Dump-line layout
    pub format: DumpFormat,
    /// Blocks that make up the handshake leg
    pub filter: BlockFilter,
    /// Framing of the assembled bytes
    pub decoder: DecoderConfig,
}

impl SessionConfig {
    /// QUIC example client: CRYPTO stream data in `hexdump -C` layout, no
    /// record framing.
    pub fn quic_crypto() -> Self {
        Self {
            marker: Marker::CryptoData,
            format: DumpFormat::CANONICAL,
            filter: BlockFilter::All,
            decoder: DecoderConfig::messages_only(),
        }
    }

    /// `openssl s_client -debug`: BIO traces of TLS records in one direction.
    pub fn tls_bio(direction: Direction) -> Self {
        Self {
            marker: Marker::BioTrace,
            format: DumpFormat::OPENSSL,
            filter: BlockFilter::Direction(direction),
            decoder: DecoderConfig::records(RecordPolicy::Strict),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::quic_crypto()
    }
}

/// Decode results for one captured run.
#[derive(Debug)]
pub struct DecodeSession {
    lines: Vec<String>,
    config: SessionConfig,
    blocks: OnceCell<Vec<HexDumpBlock>>,
    buffer: OnceCell<Bytes>,
    sequence: OnceCell<HandshakeSequence>,
}

impl DecodeSession {
    /// Session over a snapshot of lines.
    pub fn new(lines: Vec<String>, config: SessionConfig) -> Self {
        debug!(lines = lines.len(), "decode session");
        Self {
            lines,
            config,
            blocks: OnceCell::new(),
            buffer: OnceCell::new(),
            sequence: OnceCell::new(),
        }
    }

    /// Session over captured text, split into lines.
    pub fn from_text(text: &str, config: SessionConfig) -> Self {
        Self::new(text.lines().map(str::to_owned).collect(), config)
    }

    /// The line snapshot.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Every dump block in the log, before filtering.
    pub fn blocks(&self) -> Result<&[HexDumpBlock]> {
        if let Some(blocks) = self.blocks.get() {
            return Ok(blocks);
        }

        let blocks = HexDumpScanner::new(&self.lines, self.config.marker.clone(), self.config.format)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        debug!(blocks = blocks.len(), "hex dump blocks detected");
        Ok(self.blocks.get_or_init(|| blocks))
    }

    /// Bytes of the selected blocks, concatenated.
    pub fn buffer(&self) -> Result<&Bytes> {
        if let Some(buffer) = self.buffer.get() {
            return Ok(buffer);
        }

        let buffer = assemble(self.blocks()?, &self.config.filter);
        debug!(bytes = buffer.len(), filter = ?self.config.filter, "assembled handshake bytes");
        Ok(self.buffer.get_or_init(|| buffer))
    }

    /// Decoded handshake messages, in wire order.
    pub fn handshake(&self) -> Result<&HandshakeSequence> {
        if let Some(sequence) = self.sequence.get() {
            return Ok(sequence);
        }

        let sequence = decode(self.buffer()?, self.config.decoder)?;
        debug!(messages = sequence.len(), signature = %sequence.signature(), "handshake decoded");
        Ok(self.sequence.get_or_init(|| sequence))
    }

    /// Colon-joined message names.
    pub fn signature(&self) -> Result<String> {
        Ok(self.handshake()?.signature())
    }

    /// Whether the client logged that the server refused early data.
    pub fn early_data_rejected(&self) -> bool {
        self.lines.iter().any(|line| line.starts_with(EARLY_DATA_REJECTED))
    }
}

#[cfg(test)]
mod tests {
    use flightcheck_proto::{HandshakeMessage, ProtocolError, Truncation};

    use super::*;
    use crate::error::{Error, FormatError};

    fn crypto_log(bytes: &[u8]) -> String {
        let mut log = String::from("Ordered CRYPTO data in Handshake crypto level\n");
        for line in DumpFormat::CANONICAL.render(bytes) {
            log.push_str(&line);
            log.push('\n');
        }
        log
    }

    #[test]
    fn decodes_crypto_stream() {
        let mut bytes = HandshakeMessage::new(8, vec![0, 0]).to_bytes();
        bytes.extend(HandshakeMessage::new(20, vec![0xab; 32]).to_bytes());

        let session = DecodeSession::from_text(&crypto_log(&bytes), SessionConfig::quic_crypto());
        assert_eq!(session.signature().unwrap(), "EncryptedExtensions:Finished");
        assert_eq!(session.buffer().unwrap().as_ref(), bytes.as_slice());
        assert_eq!(session.blocks().unwrap().len(), 1);
    }

    #[test]
    fn results_are_cached() {
        let bytes = HandshakeMessage::new(20, vec![1; 32]).to_bytes();
        let session = DecodeSession::from_text(&crypto_log(&bytes), SessionConfig::default());

        let first = session.handshake().unwrap();
        let second = session.handshake().unwrap();
        assert!(std::ptr::eq(first, second));
        assert!(std::ptr::eq(session.blocks().unwrap(), session.blocks().unwrap()));
    }

    #[test]
    fn truncated_stream_fails_every_time() {
        let mut bytes = HandshakeMessage::new(11, vec![1; 40]).to_bytes();
        bytes.truncate(20);
        let session = DecodeSession::from_text(&crypto_log(&bytes), SessionConfig::default());

        for _ in 0..2 {
            let err = session.handshake().unwrap_err();
            assert!(matches!(
                err,
                Error::Protocol(ProtocolError::Truncated { at: Truncation::MessageBody, .. })
            ));
        }
    }

    #[test]
    fn format_errors_surface() {
        let log = "Ordered CRYPTO data in Initial crypto level\n00000000  0x 00\n";
        let session = DecodeSession::from_text(log, SessionConfig::default());
        assert!(matches!(
            session.handshake().unwrap_err(),
            Error::Format(FormatError::InvalidByte { line: 2, column: 0, .. })
        ));
    }

    #[test]
    fn early_data_rejection_line() {
        let session = DecodeSession::from_text(
            "connected\nEarly data was rejected by server\n",
            SessionConfig::default(),
        );
        assert!(session.early_data_rejected());
        assert!(!DecodeSession::from_text("connected", SessionConfig::default()).early_data_rejected());
    }

    #[test]
    fn empty_log_is_empty_handshake() {
        let session = DecodeSession::from_text("", SessionConfig::tls_bio(Direction::Received));
        assert!(session.handshake().unwrap().is_empty());
        assert_eq!(session.signature().unwrap(), "");
    }
}
