//! Handshake message types and classification (RFC 8446 §4).
//!
//! Every handshake message is framed as a 1-byte type code followed by a
//! 24-bit big-endian body length. Classification maps the type code to a
//! [`MessageKind`]; codes this crate does not know are kept as
//! [`MessageKind::Unknown`] so a decoded sequence is never missing a message.

use std::{borrow::Cow, fmt};

use bytes::Bytes;

/// Value of `ServerHello.random` that marks a HelloRetryRequest
/// (SHA-256 of "HelloRetryRequest", RFC 8446 §4.1.3).
pub const HELLO_RETRY_REQUEST_RANDOM: [u8; 32] = [
    0xcf, 0x21, 0xad, 0x74, 0xe5, 0x9a, 0x61, 0x11, 0xbe, 0x1d, 0x8c, 0x02, 0x1e, 0x65, 0xb8, 0x91,
    0xc2, 0xa2, 0x11, 0x16, 0x7a, 0xbb, 0x8c, 0x5e, 0x07, 0x9e, 0x09, 0xe2, 0xc8, 0xa8, 0x33, 0x9c,
];

/// Size of the handshake message header (type + u24 length).
pub const HEADER_LEN: usize = 4;

/// Largest body a u24 length can describe.
pub const MAX_BODY_LEN: usize = 0x00ff_ffff;

/// `legacy_version` precedes the random in a ServerHello body.
const RANDOM_OFFSET: usize = 2;

/// Handshake type codes this crate names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum HandshakeType {
    /// ClientHello
    ClientHello = 1,
    /// ServerHello (and HelloRetryRequest)
    ServerHello = 2,
    /// NewSessionTicket
    NewSessionTicket = 4,
    /// EncryptedExtensions
    EncryptedExtensions = 8,
    /// Certificate
    Certificate = 11,
    /// CertificateRequest
    CertificateRequest = 13,
    /// CertificateVerify
    CertificateVerify = 15,
    /// Finished
    Finished = 20,
    /// KeyUpdate
    KeyUpdate = 24,
}

impl HandshakeType {
    /// Map a type code to a known handshake type.
    pub fn from_u8(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::ClientHello),
            2 => Some(Self::ServerHello),
            4 => Some(Self::NewSessionTicket),
            8 => Some(Self::EncryptedExtensions),
            11 => Some(Self::Certificate),
            13 => Some(Self::CertificateRequest),
            15 => Some(Self::CertificateVerify),
            20 => Some(Self::Finished),
            24 => Some(Self::KeyUpdate),
            _ => None,
        }
    }

    /// Raw type code.
    pub fn to_u8(self) -> u8 {
        self as u8
    }
}

/// Classified handshake message.
///
/// One variant per name that can appear in a flight signature. The only kind
/// that depends on the body as well as the type code is
/// [`MessageKind::HelloRetryRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    /// ClientHello
    ClientHello,
    /// ServerHello carrying an ordinary random
    ServerHello,
    /// ServerHello whose random equals [`HELLO_RETRY_REQUEST_RANDOM`]
    HelloRetryRequest,
    /// NewSessionTicket
    NewSessionTicket,
    /// EncryptedExtensions
    EncryptedExtensions,
    /// Certificate
    Certificate,
    /// CertificateRequest
    CertificateRequest,
    /// CertificateVerify
    CertificateVerify,
    /// Finished
    Finished,
    /// KeyUpdate
    KeyUpdate,
    /// Any other type code
    Unknown(u8),
}

impl MessageKind {
    /// Classify a message from its type code and body.
    pub fn classify(code: u8, body: &[u8]) -> Self {
        let Some(handshake_type) = HandshakeType::from_u8(code) else {
            return Self::Unknown(code);
        };

        match handshake_type {
            HandshakeType::ClientHello => Self::ClientHello,
            HandshakeType::ServerHello if is_hello_retry(body) => Self::HelloRetryRequest,
            HandshakeType::ServerHello => Self::ServerHello,
            HandshakeType::NewSessionTicket => Self::NewSessionTicket,
            HandshakeType::EncryptedExtensions => Self::EncryptedExtensions,
            HandshakeType::Certificate => Self::Certificate,
            HandshakeType::CertificateRequest => Self::CertificateRequest,
            HandshakeType::CertificateVerify => Self::CertificateVerify,
            HandshakeType::Finished => Self::Finished,
            HandshakeType::KeyUpdate => Self::KeyUpdate,
        }
    }

    /// Type code this kind was decoded from.
    pub fn code(self) -> u8 {
        match self {
            Self::ClientHello => HandshakeType::ClientHello.to_u8(),
            Self::ServerHello | Self::HelloRetryRequest => HandshakeType::ServerHello.to_u8(),
            Self::NewSessionTicket => HandshakeType::NewSessionTicket.to_u8(),
            Self::EncryptedExtensions => HandshakeType::EncryptedExtensions.to_u8(),
            Self::Certificate => HandshakeType::Certificate.to_u8(),
            Self::CertificateRequest => HandshakeType::CertificateRequest.to_u8(),
            Self::CertificateVerify => HandshakeType::CertificateVerify.to_u8(),
            Self::Finished => HandshakeType::Finished.to_u8(),
            Self::KeyUpdate => HandshakeType::KeyUpdate.to_u8(),
            Self::Unknown(code) => code,
        }
    }

    /// Name used in flight signatures, e.g. `"Certificate"` or `"Unknown(99)"`.
    pub fn name(self) -> Cow<'static, str> {
        let name = match self {
            Self::ClientHello => "ClientHello",
            Self::ServerHello => "ServerHello",
            Self::HelloRetryRequest => "HelloRetryRequest",
            Self::NewSessionTicket => "NewSessionTicket",
            Self::EncryptedExtensions => "EncryptedExtensions",
            Self::Certificate => "Certificate",
            Self::CertificateRequest => "CertificateRequest",
            Self::CertificateVerify => "CertificateVerify",
            Self::Finished => "Finished",
            Self::KeyUpdate => "KeyUpdate",
            Self::Unknown(code) => return Cow::Owned(format!("Unknown({code})")),
        };
        Cow::Borrowed(name)
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

fn is_hello_retry(body: &[u8]) -> bool {
    body.get(RANDOM_OFFSET..RANDOM_OFFSET + HELLO_RETRY_REQUEST_RANDOM.len())
        .is_some_and(|random| random == HELLO_RETRY_REQUEST_RANDOM.as_slice())
}

/// One decoded handshake message.
///
/// The declared length is not stored separately; it is the body length, which
/// the decoder only accepts once the full body has arrived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandshakeMessage {
    kind: MessageKind,
    body: Bytes,
}

impl HandshakeMessage {
    /// Classify and wrap a complete message body.
    pub fn new(code: u8, body: impl Into<Bytes>) -> Self {
        let body = body.into();
        Self { kind: MessageKind::classify(code, &body), body }
    }

    /// Classified kind.
    pub fn kind(&self) -> MessageKind {
        self.kind
    }

    /// Raw type code.
    pub fn type_code(&self) -> u8 {
        self.kind.code()
    }

    /// Signature name of this message.
    pub fn type_name(&self) -> Cow<'static, str> {
        self.kind.name()
    }

    /// Body length as carried in the 24-bit length field.
    pub fn length(&self) -> u32 {
        self.body.len() as u32
    }

    /// Message body, without the 4-byte header.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Encode header and body as they appear on the wire.
    ///
    /// Bodies longer than [`MAX_BODY_LEN`] are cut to what a 24-bit length
    /// field can describe.
    pub fn to_bytes(&self) -> Vec<u8> {
        encode_message(self.type_code(), &self.body)
    }
}

/// Frame `body` as a handshake message with type `code`.
pub fn encode_message(code: u8, body: &[u8]) -> Vec<u8> {
    let len = body.len().min(MAX_BODY_LEN);
    let mut out = Vec::with_capacity(HEADER_LEN + len);
    out.push(code);
    out.push((len >> 16) as u8);
    out.push((len >> 8) as u8);
    out.push(len as u8);
    out.extend_from_slice(&body[..len]);
    out
}

/// Handshake messages in wire order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HandshakeSequence {
    messages: Vec<HandshakeMessage>,
}

impl HandshakeSequence {
    /// Wrap messages that are already in wire order.
    pub fn new(messages: Vec<HandshakeMessage>) -> Self {
        Self { messages }
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// True if no message was decoded.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Messages as a slice.
    pub fn as_slice(&self) -> &[HandshakeMessage] {
        &self.messages
    }

    /// Iterate in wire order.
    pub fn iter(&self) -> std::slice::Iter<'_, HandshakeMessage> {
        self.messages.iter()
    }

    /// Message names in wire order.
    pub fn names(&self) -> Vec<Cow<'static, str>> {
        self.messages.iter().map(HandshakeMessage::type_name).collect()
    }

    /// Colon-joined message names, e.g. `ServerHello:EncryptedExtensions:Finished`.
    pub fn signature(&self) -> String {
        self.names().join(":")
    }
}

impl FromIterator<HandshakeMessage> for HandshakeSequence {
    fn from_iter<T: IntoIterator<Item = HandshakeMessage>>(iter: T) -> Self {
        Self { messages: iter.into_iter().collect() }
    }
}

impl IntoIterator for HandshakeSequence {
    type Item = HandshakeMessage;
    type IntoIter = std::vec::IntoIter<HandshakeMessage>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.into_iter()
    }
}

impl<'a> IntoIterator for &'a HandshakeSequence {
    type Item = &'a HandshakeMessage;
    type IntoIter = std::slice::Iter<'a, HandshakeMessage>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}
