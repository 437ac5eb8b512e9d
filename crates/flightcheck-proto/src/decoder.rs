//! Streaming handshake decoder.
//!
//! ```text
//!  chunk ─┬─ Framing::Records ──> record buffer ── handshake payloads ─┐
//!         │                                                            ▼
//!         └─ Framing::MessagesOnly ───────────────────────────> MessageCursor ──> HandshakeSequence
//! ```
//!
//! The [`MessageCursor`] holds whatever part of a handshake header or body has
//! arrived so far. Chunks can be split at any byte: inside a record header,
//! inside a handshake header, or in the middle of a body. Truncation is only an
//! error once [`HandshakeDecoder::finish`] says no more input will arrive.

use bytes::BytesMut;

use crate::{
    errors::{ProtocolError, Result, Truncation},
    handshake::{HEADER_LEN, HandshakeMessage, HandshakeSequence},
    record::{ContentType, RecordHeader},
};

/// Outer framing of the decoder input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Framing {
    /// Input is a stream of TLS records (TCP capture, BIO trace)
    #[default]
    Records,
    /// Input is bare handshake messages (QUIC CRYPTO stream)
    MessagesOnly,
}

/// What to do with records that are not handshake records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordPolicy {
    /// Any non-handshake record fails the decode
    #[default]
    Strict,
    /// ChangeCipherSpec, Alert, ApplicationData and Heartbeat records are
    /// skipped; unknown content types still fail
    SkipNonHandshake,
}

/// Decoder configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecoderConfig {
    /// Outer framing
    pub framing: Framing,
    /// Handling of non-handshake records (ignored for `MessagesOnly`)
    pub record_policy: RecordPolicy,
}

impl DecoderConfig {
    /// Bare handshake messages, as carried in QUIC CRYPTO frames.
    pub fn messages_only() -> Self {
        Self { framing: Framing::MessagesOnly, record_policy: RecordPolicy::Strict }
    }

    /// TLS records with the given policy for non-handshake content.
    pub fn records(record_policy: RecordPolicy) -> Self {
        Self { framing: Framing::Records, record_policy }
    }
}

/// Message-layer cursor.
///
/// Accepts handshake payload in arbitrary chunks and emits a message as soon
/// as its body is complete.
#[derive(Debug, Default)]
pub struct MessageCursor {
    pending: BytesMut,
    messages: Vec<HandshakeMessage>,
}

impl MessageCursor {
    /// Empty cursor at a message boundary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append handshake payload and emit every message it completes.
    pub fn push(&mut self, payload: &[u8]) {
        self.pending.extend_from_slice(payload);

        while let Some(total) = self.complete_message_len() {
            let mut frame = self.pending.split_to(total);
            let body = frame.split_off(HEADER_LEN);
            self.messages.push(HandshakeMessage::new(frame[0], body.freeze()));
        }
    }

    /// Bytes received but not yet part of a complete message.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Messages completed so far.
    pub fn messages(&self) -> &[HandshakeMessage] {
        &self.messages
    }

    /// Finish decoding; fails unless the cursor sits at a message boundary.
    pub fn finish(self) -> Result<HandshakeSequence> {
        match self.pending.len() {
            0 => Ok(HandshakeSequence::new(self.messages)),
            available if available < HEADER_LEN => Err(ProtocolError::Truncated {
                at: Truncation::MessageHeader,
                needed: HEADER_LEN,
                available,
            }),
            available => Err(ProtocolError::Truncated {
                at: Truncation::MessageBody,
                needed: HEADER_LEN + body_len(&self.pending),
                available,
            }),
        }
    }

    fn complete_message_len(&self) -> Option<usize> {
        if self.pending.len() < HEADER_LEN {
            return None;
        }
        let total = HEADER_LEN + body_len(&self.pending);
        (self.pending.len() >= total).then_some(total)
    }
}

/// Body length from a buffer that starts with a full handshake header.
fn body_len(header: &[u8]) -> usize {
    (usize::from(header[1]) << 16) | (usize::from(header[2]) << 8) | usize::from(header[3])
}

/// Streaming decoder for one handshake leg.
#[derive(Debug)]
pub struct HandshakeDecoder {
    config: DecoderConfig,
    records: BytesMut,
    record_offset: usize,
    cursor: MessageCursor,
}

impl HandshakeDecoder {
    /// New decoder with nothing buffered.
    pub fn new(config: DecoderConfig) -> Self {
        Self { config, records: BytesMut::new(), record_offset: 0, cursor: MessageCursor::new() }
    }

    /// Feed the next chunk of input.
    ///
    /// # Errors
    ///
    /// - `UnexpectedRecordType` as soon as a record header names a content
    ///   type the configured policy does not allow.
    pub fn push(&mut self, chunk: &[u8]) -> Result<()> {
        match self.config.framing {
            Framing::MessagesOnly => {
                self.cursor.push(chunk);
                Ok(())
            },
            Framing::Records => {
                self.records.extend_from_slice(chunk);
                self.drain_records()
            },
        }
    }

    /// Messages completed so far.
    pub fn messages(&self) -> &[HandshakeMessage] {
        self.cursor.messages()
    }

    /// Declare the input complete and return the decoded sequence.
    ///
    /// # Errors
    ///
    /// - `Truncated` if the input stops inside a record or a handshake message.
    pub fn finish(self) -> Result<HandshakeSequence> {
        let available = self.records.len();
        if available > 0 {
            return Err(match RecordHeader::parse(&self.records) {
                None => ProtocolError::Truncated {
                    at: Truncation::RecordHeader,
                    needed: RecordHeader::SIZE,
                    available,
                },
                Some(header) => ProtocolError::Truncated {
                    at: Truncation::RecordPayload,
                    needed: RecordHeader::SIZE + header.length(),
                    available,
                },
            });
        }
        self.cursor.finish()
    }

    fn drain_records(&mut self) -> Result<()> {
        while let Some(header) = RecordHeader::parse(&self.records) {
            let content_type = self.check_content_type(header.content_type())?;

            let total = RecordHeader::SIZE + header.length();
            if self.records.len() < total {
                break;
            }

            let mut record = self.records.split_to(total);
            let payload = record.split_off(RecordHeader::SIZE);
            self.record_offset += total;

            if content_type == ContentType::Handshake {
                self.cursor.push(&payload);
            }
        }
        Ok(())
    }

    fn check_content_type(&self, raw: u8) -> Result<ContentType> {
        let unexpected =
            || ProtocolError::UnexpectedRecordType { content_type: raw, offset: self.record_offset };

        match (ContentType::from_u8(raw), self.config.record_policy) {
            (Some(ContentType::Handshake), _) => Ok(ContentType::Handshake),
            (Some(other), RecordPolicy::SkipNonHandshake) => Ok(other),
            (Some(_), RecordPolicy::Strict) | (None, _) => Err(unexpected()),
        }
    }
}

/// Decode a complete buffer in one call.
pub fn decode(buffer: &[u8], config: DecoderConfig) -> Result<HandshakeSequence> {
    let mut decoder = HandshakeDecoder::new(config);
    decoder.push(buffer)?;
    decoder.finish()
}
