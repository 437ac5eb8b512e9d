//! TLS record layer header (RFC 8446 §5.1).
//!
//! Only the plaintext header is interpreted. Record payloads are handed to the
//! handshake cursor untouched or skipped, depending on content type.

use zerocopy::{
    FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned, byteorder::network_endian::U16,
};

/// Record content types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ContentType {
    /// Legacy compatibility record, one byte of 0x01
    ChangeCipherSpec = 20,
    /// Alert
    Alert = 21,
    /// Handshake messages
    Handshake = 22,
    /// Application data (and encrypted TLS 1.3 handshake)
    ApplicationData = 23,
    /// Heartbeat (RFC 6520)
    Heartbeat = 24,
}

impl ContentType {
    /// Map a raw content-type byte to a known type.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            20 => Some(Self::ChangeCipherSpec),
            21 => Some(Self::Alert),
            22 => Some(Self::Handshake),
            23 => Some(Self::ApplicationData),
            24 => Some(Self::Heartbeat),
            _ => None,
        }
    }

    /// Raw byte value.
    pub fn to_u8(self) -> u8 {
        self as u8
    }
}

/// 5-byte TLS record header.
///
/// ```text
/// +--------------+-----------------+----------------+
/// | content_type | legacy_version  |     length     |
/// |     u8       |   u16 (BE)      |    u16 (BE)    |
/// +--------------+-----------------+----------------+
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
#[repr(C)]
pub struct RecordHeader {
    content_type: u8,
    version: U16,
    length: U16,
}

impl RecordHeader {
    /// Encoded size in bytes.
    pub const SIZE: usize = 5;

    /// Build a header.
    pub fn new(content_type: u8, version: u16, length: u16) -> Self {
        Self { content_type, version: U16::new(version), length: U16::new(length) }
    }

    /// Read a header from the front of `bytes`.
    ///
    /// Returns `None` if fewer than [`Self::SIZE`] bytes are available.
    pub fn parse(bytes: &[u8]) -> Option<Self> {
        Self::read_from_prefix(bytes).ok().map(|(header, _)| header)
    }

    /// Raw content-type byte.
    pub fn content_type(&self) -> u8 {
        self.content_type
    }

    /// Legacy record version (0x0301 or 0x0303 in practice).
    pub fn version(&self) -> u16 {
        self.version.get()
    }

    /// Payload length in bytes.
    pub fn length(&self) -> usize {
        usize::from(self.length.get())
    }

    /// Header bytes as they appear on the wire.
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut out = [0u8; Self::SIZE];
        out.copy_from_slice(self.as_bytes());
        out
    }
}
