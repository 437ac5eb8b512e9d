//! Flight signatures.
//!
//! A signature is the colon-joined list of message names in wire order, e.g.
//! `ServerHello:EncryptedExtensions:Finished`. Matching is by prefix, so a
//! pattern describes how a flight starts and ignores anything that follows
//! (post-handshake NewSessionTicket, KeyUpdate).

use std::fmt;

use flightcheck_proto::HandshakeSequence;

use crate::error::FlightMismatch;

/// Prefix a signature carries when the server asked for a second ClientHello.
pub const HELLO_RETRY_PREFIX: &str = "HelloRetryRequest:";

/// Whether an observed HelloRetryRequest is folded into the expected pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetryPolicy {
    /// Expected patterns match with or without a leading retry
    #[default]
    Allow,
    /// Expected patterns are compared as written
    Forbid,
}

/// Colon-joined handshake message names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct FlightSignature(String);

impl FlightSignature {
    /// Signature from an already-joined string.
    pub fn new(signature: impl Into<String>) -> Self {
        Self(signature.into())
    }

    /// Signature of a decoded sequence.
    pub fn from_sequence(sequence: &HandshakeSequence) -> Self {
        Self(sequence.signature())
    }

    /// The joined names.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the server sent a HelloRetryRequest first.
    pub fn starts_with_retry(&self) -> bool {
        self.0.starts_with(HELLO_RETRY_PREFIX)
    }

    /// Expected pattern adjusted for an observed retry.
    pub fn normalize(&self, expected: &str, policy: RetryPolicy) -> String {
        if policy == RetryPolicy::Allow && self.starts_with_retry() {
            format!("{HELLO_RETRY_PREFIX}{expected}")
        } else {
            expected.to_owned()
        }
    }

    /// Whether this signature starts with the (normalized) pattern.
    pub fn matches(&self, expected: &str, policy: RetryPolicy) -> bool {
        self.0.starts_with(&self.normalize(expected, policy))
    }

    /// Like [`matches`](Self::matches), with the mismatch as an error.
    pub fn expect(&self, expected: &str, policy: RetryPolicy) -> Result<(), FlightMismatch> {
        let expected = self.normalize(expected, policy);
        if self.0.starts_with(&expected) {
            Ok(())
        } else {
            Err(FlightMismatch { expected, actual: self.0.clone() })
        }
    }
}

impl fmt::Display for FlightSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&HandshakeSequence> for FlightSignature {
    fn from(sequence: &HandshakeSequence) -> Self {
        Self::from_sequence(sequence)
    }
}
