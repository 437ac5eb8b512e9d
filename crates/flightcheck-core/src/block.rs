//! Decoded dump blocks and where they came from.

use std::fmt;

use bytes::Bytes;

use crate::marker::Marker;

/// Bytes recovered from one run of dump lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HexDumpBlock {
    /// 1-based line number of the marker line
    pub line: usize,
    /// Marker line text
    pub header: String,
    /// What the marker line says about the bytes
    pub origin: BlockOrigin,
    /// Decoded bytes, in row order
    pub data: Bytes,
}

impl HexDumpBlock {
    /// Number of decoded bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the block decoded to no bytes.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Which way bytes travelled, from the point of view of the traced process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Written by the traced process
    Sent,
    /// Read by the traced process
    Received,
}

/// QUIC encryption level of a CRYPTO data block.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CryptoLevel {
    /// Initial packets
    Initial,
    /// Handshake packets
    Handshake,
    /// 1-RTT packets
    Application,
    /// 0-RTT packets
    EarlyData,
    /// Any other label, kept verbatim
    Other(String),
}

impl CryptoLevel {
    /// Parse the level label printed by the emitting client.
    pub fn parse(label: &str) -> Self {
        match label.to_ascii_lowercase().as_str() {
            "initial" => Self::Initial,
            "handshake" => Self::Handshake,
            "application" | "app" | "1rtt" => Self::Application,
            "early" | "0rtt" => Self::EarlyData,
            _ => Self::Other(label.to_owned()),
        }
    }
}

impl fmt::Display for CryptoLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Initial => f.write_str("Initial"),
            Self::Handshake => f.write_str("Handshake"),
            Self::Application => f.write_str("Application"),
            Self::EarlyData => f.write_str("EarlyData"),
            Self::Other(label) => f.write_str(label),
        }
    }
}

/// Origin of a block, classified from its marker line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockOrigin {
    /// QUIC CRYPTO stream data at an encryption level
    Crypto {
        /// Level named by the marker
        level: CryptoLevel,
    },
    /// BIO `write to` trace
    Write,
    /// BIO `read from` trace
    Read,
    /// Caller-defined marker
    Other,
}

impl BlockOrigin {
    /// Classify a marker line.
    pub fn from_header(header: &str) -> Self {
        if let Some(level) = Marker::crypto_level(header) {
            Self::Crypto { level: CryptoLevel::parse(level) }
        } else if header.starts_with("write to ") {
            Self::Write
        } else if header.starts_with("read from ") {
            Self::Read
        } else {
            Self::Other
        }
    }

    /// Direction of the bytes, when the marker says.
    ///
    /// Ordered CRYPTO data is the receive path of the traced client.
    pub fn direction(&self) -> Option<Direction> {
        match self {
            Self::Crypto { .. } | Self::Read => Some(Direction::Received),
            Self::Write => Some(Direction::Sent),
            Self::Other => None,
        }
    }
}

/// Selects the blocks that belong to one handshake leg.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BlockFilter {
    /// Every block
    #[default]
    All,
    /// Blocks travelling one way
    Direction(Direction),
    /// CRYPTO data blocks at one encryption level
    CryptoLevel(CryptoLevel),
}

impl BlockFilter {
    /// Whether `block` belongs to the selected leg.
    pub fn accepts(&self, block: &HexDumpBlock) -> bool {
        match self {
            Self::All => true,
            Self::Direction(direction) => block.origin.direction() == Some(*direction),
            Self::CryptoLevel(wanted) => {
                matches!(&block.origin, BlockOrigin::Crypto { level } if level == wanted)
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(header: &str) -> HexDumpBlock {
        HexDumpBlock {
            line: 1,
            header: header.to_owned(),
            origin: BlockOrigin::from_header(header),
            data: Bytes::from_static(&[1, 2, 3]),
        }
    }

    #[test]
    fn origin_from_marker_lines() {
        assert_eq!(
            BlockOrigin::from_header("Ordered CRYPTO data in Initial crypto level"),
            BlockOrigin::Crypto { level: CryptoLevel::Initial }
        );
        assert_eq!(
            BlockOrigin::from_header("write to 0x5581 [0x5582] (517 bytes => 517 (0x205))"),
            BlockOrigin::Write
        );
        assert_eq!(BlockOrigin::from_header("read from 0x5581 [0x5583] (5 bytes => 5 (0x5))"), BlockOrigin::Read);
        assert_eq!(BlockOrigin::from_header("TX:"), BlockOrigin::Other);
    }

    #[test]
    fn crypto_level_labels() {
        assert_eq!(CryptoLevel::parse("handshake"), CryptoLevel::Handshake);
        assert_eq!(CryptoLevel::parse("1RTT"), CryptoLevel::Application);
        assert_eq!(CryptoLevel::parse("0rtt"), CryptoLevel::EarlyData);
        assert_eq!(CryptoLevel::parse("Weird"), CryptoLevel::Other("Weird".into()));
        assert_eq!(CryptoLevel::Other("Weird".into()).to_string(), "Weird");
    }

    #[test]
    fn filters() {
        let initial = block("Ordered CRYPTO data in Initial crypto level");
        let handshake = block("Ordered CRYPTO data in Handshake crypto level");
        let write = block("write to 0x1 [0x2] (3 bytes => 3 (0x3))");
        let other = block("TX:");

        assert!(BlockFilter::All.accepts(&other));
        assert!(BlockFilter::CryptoLevel(CryptoLevel::Handshake).accepts(&handshake));
        assert!(!BlockFilter::CryptoLevel(CryptoLevel::Handshake).accepts(&initial));
        assert!(BlockFilter::Direction(Direction::Sent).accepts(&write));
        assert!(!BlockFilter::Direction(Direction::Received).accepts(&write));
        assert!(BlockFilter::Direction(Direction::Received).accepts(&initial));
        assert!(!BlockFilter::Direction(Direction::Sent).accepts(&other));
    }
}
