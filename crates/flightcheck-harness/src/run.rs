//! One captured client run.

use flightcheck_core::{DecodeSession, LogFile, SessionConfig};
use flightcheck_proto::HandshakeSequence;
use tracing::debug;

use crate::{
    error::RunError,
    expect::ExpectedFlight,
    signature::{FlightSignature, RetryPolicy},
};

/// Exit status and decode session of one client invocation.
#[derive(Debug)]
pub struct ClientRun {
    exit_code: i32,
    session: DecodeSession,
}

impl ClientRun {
    /// Run with an already-built session.
    pub fn new(exit_code: i32, session: DecodeSession) -> Self {
        Self { exit_code, session }
    }

    /// Run over the lines the client appended to `log` since the last read.
    pub fn from_log(exit_code: i32, log: &mut LogFile, config: SessionConfig) -> Result<Self, RunError> {
        let lines = log
            .read_recent()
            .map_err(|source| RunError::ReadLog { path: log.path().to_path_buf(), source })?;
        debug!(path = %log.path().display(), lines = lines.len(), exit_code, "client run captured");
        Ok(Self::new(exit_code, DecodeSession::new(lines, config)))
    }

    /// Process exit code.
    pub fn exit_code(&self) -> i32 {
        self.exit_code
    }

    /// Underlying decode session.
    pub fn session(&self) -> &DecodeSession {
        &self.session
    }

    /// Decoded handshake.
    pub fn handshake(&self) -> Result<&HandshakeSequence, RunError> {
        Ok(self.session.handshake()?)
    }

    /// Signature of the decoded handshake.
    pub fn signature(&self) -> Result<FlightSignature, RunError> {
        Ok(FlightSignature::from_sequence(self.handshake()?))
    }

    /// Whether the client reported that its early data was refused.
    pub fn early_data_rejected(&self) -> bool {
        self.session.early_data_rejected()
    }

    /// The client exited with status 0.
    pub fn assert_success(&self) -> Result<(), RunError> {
        if self.exit_code == 0 {
            Ok(())
        } else {
            Err(RunError::ExitStatus { code: self.exit_code })
        }
    }

    /// The handshake starts with `expected`.
    pub fn assert_flight(&self, expected: &ExpectedFlight, policy: RetryPolicy) -> Result<(), RunError> {
        let signature = self.signature()?;
        signature.expect(expected.pattern(), policy)?;
        debug!(%signature, %expected, "flight matched");
        Ok(())
    }

    /// Full certificate handshake, optionally after a HelloRetryRequest.
    pub fn assert_full_handshake(&self, policy: RetryPolicy) -> Result<(), RunError> {
        self.assert_flight(&ExpectedFlight::FullHandshake, policy)
    }

    /// Resumed session, no certificate exchange.
    pub fn assert_resumption(&self) -> Result<(), RunError> {
        self.assert_flight(&ExpectedFlight::Resumption, RetryPolicy::Allow)
    }

    /// Server asked for a client certificate.
    pub fn assert_client_auth(&self) -> Result<(), RunError> {
        self.assert_flight(&ExpectedFlight::ClientAuth, RetryPolicy::Allow)
    }
}
