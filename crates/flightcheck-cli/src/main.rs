//! flightcheck CLI entry point.
//!
//! Exit status: 0 on success, 1 when `check` finds a different flight, 2 when
//! the log cannot be read or decoded.

mod cli;
mod error;
mod report;

use std::{
    io::{self, Write},
    path::Path,
    process::ExitCode,
};

use clap::Parser;
use flightcheck_core::{DecodeSession, LogFile};
use flightcheck_harness::{ExpectedFlight, FlightSignature, RetryPolicy, SClientSummary};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use crate::{
    cli::{Args, Command, SourceArgs},
    error::CliError,
};

const EXIT_MISMATCH: u8 = 1;
const EXIT_ERROR: u8 = 2;

fn main() -> ExitCode {
    let args = Args::parse();
    if let Err(err) = args.validate() {
        err.exit();
    }

    let filter = match args.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    match run(args.command) {
        Ok(code) => code,
        Err(err) => {
            error!("{err}");
            ExitCode::from(EXIT_ERROR)
        },
    }
}

fn run(command: Command) -> Result<ExitCode, CliError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match command {
        Command::Decode { source, bodies } => {
            let session = open_session(&source)?;
            report::write_sequence(&mut out, session.handshake()?, bodies)?;
            Ok(ExitCode::SUCCESS)
        },
        Command::Check { source, expect, no_hello_retry } => {
            let Ok(expected) = expect.parse::<ExpectedFlight>();
            let policy = if no_hello_retry { RetryPolicy::Forbid } else { RetryPolicy::Allow };

            let session = open_session(&source)?;
            let signature = FlightSignature::from_sequence(session.handshake()?);
            match signature.expect(expected.pattern(), policy) {
                Ok(()) => {
                    writeln!(out, "ok: {signature}")?;
                    Ok(ExitCode::SUCCESS)
                },
                Err(mismatch) => {
                    writeln!(out, "mismatch: {mismatch}")?;
                    Ok(ExitCode::from(EXIT_MISMATCH))
                },
            }
        },
        Command::Sclient { file } => {
            let text = read_to_string(&file)?;
            report::write_summary(&mut out, &SClientSummary::parse(&text))?;
            Ok(ExitCode::SUCCESS)
        },
    }
}

fn open_session(source: &SourceArgs) -> Result<DecodeSession, CliError> {
    let config = source.session_config();
    debug!(log = %source.log.display(), ?config, "decoding log");
    let lines = LogFile::new(&source.log).read_all()?;
    Ok(DecodeSession::new(lines, config))
}

fn read_to_string(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Read { path: path.to_path_buf(), source })
}
