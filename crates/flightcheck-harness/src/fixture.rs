//! Synthetic captured logs.
//!
//! [`LogBuilder`] writes the lines a traced client would have printed around
//! a handshake, with the bytes rendered in the emitting tool's dump layout.
//! The free functions build handshake and record bytes to put in them.

use flightcheck_core::{DecodeSession, DumpFormat, SessionConfig};
use flightcheck_proto::{ContentType, HELLO_RETRY_REQUEST_RANDOM, HandshakeMessage, HandshakeType, RecordHeader};

/// Largest TLS plaintext fragment.
const MAX_FRAGMENT: usize = 16_384;

/// Builder for the text of one captured run.
#[derive(Debug, Clone, Default)]
pub struct LogBuilder {
    lines: Vec<String>,
}

impl LogBuilder {
    /// Empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a plain log line.
    pub fn line(mut self, text: impl Into<String>) -> Self {
        self.lines.push(text.into());
        self
    }

    /// Append one CRYPTO data block at `level`, as ngtcp2 example clients
    /// print it.
    pub fn crypto_data(mut self, level: &str, bytes: &[u8]) -> Self {
        self.lines.push(format!("I00000000 0x0000 frm Ordered CRYPTO data in {level} crypto level"));
        self.lines.extend(DumpFormat::CANONICAL.render(bytes));
        self
    }

    /// Append `bytes` as several CRYPTO data blocks of at most `chunk` bytes.
    pub fn crypto_chunks(self, level: &str, bytes: &[u8], chunk: usize) -> Self {
        bytes.chunks(chunk.max(1)).fold(self, |log, piece| log.crypto_data(level, piece))
    }

    /// Append a BIO `write to` trace.
    pub fn bio_write(self, bytes: &[u8]) -> Self {
        self.bio("write to", bytes)
    }

    /// Append a BIO `read from` trace.
    pub fn bio_read(self, bytes: &[u8]) -> Self {
        self.bio("read from", bytes)
    }

    fn bio(mut self, op: &str, bytes: &[u8]) -> Self {
        let n = bytes.len();
        self.lines.push(format!("{op} 0x55d0c1a2b3c0 [0x55d0c1a3d000] ({n} bytes => {n} (0x{n:X}))"));
        self.lines.extend(DumpFormat::OPENSSL.render(bytes));
        self
    }

    /// Append the client's early-data refusal notice.
    pub fn early_data_rejected(self) -> Self {
        self.line("Early data was rejected by server, 0 bytes will be retransmitted")
    }

    /// The lines written so far.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The log as one newline-terminated string.
    pub fn text(&self) -> String {
        self.lines.iter().map(|line| format!("{line}\n")).collect()
    }

    /// Decode session over the log.
    pub fn session(self, config: SessionConfig) -> DecodeSession {
        DecodeSession::new(self.lines, config)
    }
}

/// ServerHello body carrying `random`.
pub fn server_hello_body(random: &[u8; 32]) -> Vec<u8> {
    let mut body = vec![0x03, 0x03];
    body.extend_from_slice(random);
    // empty session id, TLS_AES_128_GCM_SHA256, null compression, no extensions
    body.extend_from_slice(&[0x00, 0x13, 0x01, 0x00, 0x00, 0x00]);
    body
}

/// Encoded HelloRetryRequest.
pub fn hello_retry_request() -> Vec<u8> {
    HandshakeMessage::new(HandshakeType::ServerHello.to_u8(), server_hello_body(&HELLO_RETRY_REQUEST_RANDOM))
        .to_bytes()
}

/// Encoded messages with the given type codes and plausible bodies.
pub fn server_flight(codes: &[u8]) -> Vec<u8> {
    codes
        .iter()
        .flat_map(|code| {
            let body = match HandshakeType::from_u8(*code) {
                Some(HandshakeType::ServerHello) => server_hello_body(&[0x5a; 32]),
                Some(HandshakeType::EncryptedExtensions) => vec![0x00, 0x00],
                Some(HandshakeType::Finished) => vec![0xf1; 32],
                _ => vec![*code; 40 + usize::from(*code)],
            };
            HandshakeMessage::new(*code, body).to_bytes()
        })
        .collect()
}

/// `payload` wrapped in records of `content_type`, split at the fragment
/// limit.
pub fn records(content_type: ContentType, payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(payload.len() + RecordHeader::SIZE);
    for fragment in payload.chunks(MAX_FRAGMENT) {
        out.extend_from_slice(&RecordHeader::new(content_type.to_u8(), 0x0303, fragment.len() as u16).to_bytes());
        out.extend_from_slice(fragment);
    }
    out
}
