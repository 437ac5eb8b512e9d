//! Client runs read from a shared log file.
//!
//! Several invocations of one client append to the same log; each run must
//! decode only the lines its own invocation wrote.

use std::{fs::OpenOptions, io::Write, path::Path};

use flightcheck_core::{LogFile, SessionConfig};
use flightcheck_harness::{ClientRun, LogBuilder, RetryPolicy, RunError, fixture::server_flight};

fn append(path: &Path, log: &LogBuilder) {
    let mut file = OpenOptions::new().create(true).append(true).open(path).unwrap();
    file.write_all(log.text().as_bytes()).unwrap();
}

#[test]
fn each_run_sees_only_its_own_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("client.log");

    append(&path, &LogBuilder::new().line("client: proxy warming up"));
    let mut log = LogFile::new(&path);
    log.mark_end().unwrap();

    append(
        &path,
        &LogBuilder::new()
            .line("I00000000 run 1")
            .crypto_data("Initial", &server_flight(&[2]))
            .crypto_data("Handshake", &server_flight(&[8, 11, 15, 20])),
    );
    let fresh = ClientRun::from_log(0, &mut log, SessionConfig::quic_crypto()).unwrap();

    append(
        &path,
        &LogBuilder::new()
            .line("I00000000 run 2")
            .crypto_data("Initial", &server_flight(&[2]))
            .crypto_data("Handshake", &server_flight(&[8, 20]))
            .early_data_rejected(),
    );
    let resumed = ClientRun::from_log(0, &mut log, SessionConfig::quic_crypto()).unwrap();

    assert_eq!(fresh.session().lines()[0], "I00000000 run 1");
    assert_eq!(resumed.session().lines()[0], "I00000000 run 2");
    fresh.assert_full_handshake(RetryPolicy::Forbid).unwrap();
    resumed.assert_resumption().unwrap();
    assert!(!fresh.early_data_rejected());
    assert!(resumed.early_data_rejected());
    assert_eq!(log.position(), std::fs::metadata(&path).unwrap().len());
}

#[test]
fn unreadable_log_is_not_a_decode_failure() {
    let dir = tempfile::tempdir().unwrap();
    let mut log = LogFile::new(dir.path().join("missing.log"));

    let err = ClientRun::from_log(0, &mut log, SessionConfig::default()).unwrap_err();
    assert!(matches!(&err, RunError::ReadLog { path, .. } if path.ends_with("missing.log")));
    assert!(err.to_string().starts_with("cannot read log "), "{err}");
}
