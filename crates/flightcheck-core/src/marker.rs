//! Leading markers.
//!
//! A marker is the log line printed immediately before a hex dump. The scanner
//! only opens a block after a line the marker accepts, so dump-shaped lines
//! elsewhere in the log (packet dumps, key material) are never decoded.

/// Predicate over one log line.
pub trait LeadingMarker {
    /// Whether `line` announces a hex dump.
    fn matches(&self, line: &str) -> bool;
}

impl<F> LeadingMarker for F
where
    F: Fn(&str) -> bool,
{
    fn matches(&self, line: &str) -> bool {
        self(line)
    }
}

/// Text that announces QUIC CRYPTO data in ngtcp2 example clients.
const CRYPTO_DATA: &str = "Ordered CRYPTO data in ";
const CRYPTO_LEVEL_SUFFIX: &str = " crypto level";

/// Built-in markers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Marker {
    /// `Ordered CRYPTO data in <level> crypto level`, anywhere in the line
    #[default]
    CryptoData,
    /// OpenSSL BIO callback trace: `write to ...` or `read from ...`
    BioTrace,
    /// Line starts with the given text
    Prefix(String),
    /// Line contains the given text
    Contains(String),
}

impl Marker {
    /// Encryption level named by a CRYPTO data marker line.
    pub fn crypto_level(line: &str) -> Option<&str> {
        let (_, rest) = line.split_once(CRYPTO_DATA)?;
        let (level, _) = rest.split_once(CRYPTO_LEVEL_SUFFIX)?;
        (!level.is_empty() && !level.contains(char::is_whitespace)).then_some(level)
    }
}

impl LeadingMarker for Marker {
    fn matches(&self, line: &str) -> bool {
        match self {
            Self::CryptoData => Self::crypto_level(line).is_some(),
            Self::BioTrace => line.starts_with("write to ") || line.starts_with("read from "),
            Self::Prefix(prefix) => line.starts_with(prefix.as_str()),
            Self::Contains(needle) => line.contains(needle.as_str()),
        }
    }
}
