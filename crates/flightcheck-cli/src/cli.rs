//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args as ClapArgs, CommandFactory, Parser, Subcommand, ValueEnum, error::ErrorKind};
use flightcheck_core::{BlockFilter, CryptoLevel, Direction, SessionConfig};
use flightcheck_proto::RecordPolicy;

/// Decode TLS handshakes from client trace logs.
#[derive(Parser, Debug)]
#[command(name = "flightcheck")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Log more (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Operation to perform
    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    /// Reject option combinations clap cannot express.
    pub fn validate(&self) -> Result<(), clap::Error> {
        let source = match &self.command {
            Command::Decode { source, .. } | Command::Check { source, .. } => source,
            Command::Sclient { .. } => return Ok(()),
        };
        if source.level.is_some() && source.mode != Mode::Quic {
            return Err(Self::command()
                .error(ErrorKind::ArgumentConflict, "--level selects CRYPTO data and only applies to --mode quic"));
        }
        Ok(())
    }
}

/// Subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the handshake messages found in a captured log
    Decode {
        /// Where the bytes come from
        #[command(flatten)]
        source: SourceArgs,

        /// Also print each message body as hex
        #[arg(long)]
        bodies: bool,
    },

    /// Check the handshake against an expected flight; exits 1 on mismatch
    Check {
        /// Where the bytes come from
        #[command(flatten)]
        source: SourceArgs,

        /// `full`, `resumption`, `client-auth`, or a literal signature prefix
        #[arg(long, value_name = "FLIGHT")]
        expect: String,

        /// Do not fold an observed HelloRetryRequest into the expectation
        #[arg(long)]
        no_hello_retry: bool,
    },

    /// Summarize `openssl s_client` output
    Sclient {
        /// Captured stdout of `s_client`
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

/// Kind of trace the log contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// QUIC example client: `Ordered CRYPTO data` blocks
    Quic,
    /// `s_client -debug`: bytes the client read
    TlsRead,
    /// `s_client -debug`: bytes the client wrote
    TlsWrite,
}

/// Log selection shared by `decode` and `check`.
#[derive(ClapArgs, Debug)]
pub struct SourceArgs {
    /// Captured log file
    #[arg(value_name = "LOG")]
    pub log: PathBuf,

    /// Trace format
    #[arg(long, value_enum, default_value_t = Mode::Quic)]
    pub mode: Mode,

    /// Only CRYPTO data at this encryption level (quic mode)
    #[arg(long, value_name = "LEVEL")]
    pub level: Option<String>,

    /// Skip ChangeCipherSpec, Alert and ApplicationData records instead of failing
    #[arg(long)]
    pub skip_non_handshake: bool,
}

impl SourceArgs {
    /// Session configuration for these options.
    pub fn session_config(&self) -> SessionConfig {
        let mut config = match self.mode {
            Mode::Quic => SessionConfig::quic_crypto(),
            Mode::TlsRead => SessionConfig::tls_bio(Direction::Received),
            Mode::TlsWrite => SessionConfig::tls_bio(Direction::Sent),
        };
        if let Some(level) = &self.level {
            config.filter = BlockFilter::CryptoLevel(CryptoLevel::parse(level));
        }
        if self.skip_non_handshake {
            config.decoder.record_policy = RecordPolicy::SkipNonHandshake;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use flightcheck_proto::Framing;

    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(args.iter().copied()).unwrap()
    }

    #[test]
    fn decode_defaults_to_quic() {
        let Command::Decode { source, bodies } = parse(&["flightcheck", "decode", "client.log"]).command else {
            panic!("expected decode");
        };
        assert!(!bodies);
        assert_eq!(source.session_config(), SessionConfig::quic_crypto());
    }

    #[test]
    fn tls_read_with_skipping() {
        let args = parse(&["flightcheck", "check", "--mode", "tls-read", "--skip-non-handshake", "--expect", "full", "s.log"]);
        let Command::Check { source, expect, no_hello_retry } = args.command else {
            panic!("expected check");
        };
        let config = source.session_config();
        assert_eq!(expect, "full");
        assert!(!no_hello_retry);
        assert_eq!(config.filter, BlockFilter::Direction(Direction::Received));
        assert_eq!(config.decoder.framing, Framing::Records);
        assert_eq!(config.decoder.record_policy, RecordPolicy::SkipNonHandshake);
    }

    #[test]
    fn level_filter() {
        let args = parse(&["flightcheck", "-v", "decode", "--level", "handshake", "client.log"]);
        assert_eq!(args.verbose, 1);
        let Command::Decode { source, .. } = args.command else {
            panic!("expected decode");
        };
        assert_eq!(source.session_config().filter, BlockFilter::CryptoLevel(CryptoLevel::Handshake));
    }

    #[test]
    fn level_needs_quic_mode() {
        let args = parse(&["flightcheck", "decode", "--mode", "tls-read", "--level", "handshake", "s.log"]);
        assert_eq!(args.validate().unwrap_err().kind(), ErrorKind::ArgumentConflict);

        let args = parse(&["flightcheck", "decode", "--mode", "quic", "--level", "handshake", "client.log"]);
        assert!(args.validate().is_ok());
        assert!(parse(&["flightcheck", "sclient", "out.txt"]).validate().is_ok());
    }

    #[test]
    fn check_requires_expectation() {
        assert!(Args::try_parse_from(["flightcheck", "check", "client.log"]).is_err());
    }
}
