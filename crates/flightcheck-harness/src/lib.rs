//! Assertions over decoded handshakes.
//!
//! Tests drive a client, capture its trace output, and then ask what the
//! handshake looked like. This crate turns a decoded [`HandshakeSequence`]
//! into a [`FlightSignature`] and checks it against the expected flight for
//! the situation under test: full handshake, resumption, or client
//! authentication.
//!
//! # Retry normalization
//!
//! When client and server disagree on a key share, the server answers the
//! first ClientHello with a HelloRetryRequest. Expected flights are written
//! without it; [`RetryPolicy::Allow`] prepends the observed
//! `HelloRetryRequest:` to the expected pattern before the prefix match.
//!
//! # Components
//!
//! - [`signature`]: signature strings and prefix matching
//! - [`expect`]: catalogue of expected flights
//! - [`run`]: one captured client run and its assertions
//! - [`scenario`]: scenario builder with mandatory oracle
//! - [`sclient`]: `openssl s_client` summary parser
//! - [`fixture`]: synthetic captured logs for tests
//!
//! [`HandshakeSequence`]: flightcheck_proto::HandshakeSequence

pub mod error;
pub mod expect;
pub mod fixture;
pub mod run;
pub mod scenario;
pub mod sclient;
pub mod signature;

pub use error::{FlightMismatch, RunError};
pub use expect::ExpectedFlight;
pub use fixture::LogBuilder;
pub use run::ClientRun;
pub use sclient::{Alpn, SClientSummary, SessionSummary};
pub use signature::{FlightSignature, HELLO_RETRY_PREFIX, RetryPolicy};
