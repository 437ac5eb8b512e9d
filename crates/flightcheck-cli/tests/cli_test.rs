//! Runs the `flightcheck` binary against captured logs on disk.

use std::{
    path::{Path, PathBuf},
    process::{Command, Output},
};

use flightcheck_harness::{
    LogBuilder,
    fixture::{hello_retry_request, records, server_flight},
};
use flightcheck_proto::ContentType;
use tempfile::TempDir;

fn write_log(dir: &TempDir, name: &str, log: &LogBuilder) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, log.text()).unwrap();
    path
}

fn flightcheck(args: &[&str], log: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_flightcheck"))
        .args(args)
        .arg(log)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn quic_full_handshake() -> LogBuilder {
    LogBuilder::new()
        .line("I00000000 client started")
        .crypto_data("Initial", &server_flight(&[2]))
        .crypto_chunks("Handshake", &server_flight(&[8, 11, 15, 20]), 64)
}

#[test]
fn decode_prints_messages_and_signature() {
    let dir = tempfile::tempdir().unwrap();
    let log = write_log(&dir, "client.log", &quic_full_handshake());

    let output = flightcheck(&["decode"], &log);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("ServerHello"));
    assert!(text.ends_with(
        "signature: ServerHello:EncryptedExtensions:Certificate:CertificateVerify:Finished\n"
    ));
}

#[test]
fn check_full_handshake() {
    let dir = tempfile::tempdir().unwrap();
    let log = write_log(&dir, "client.log", &quic_full_handshake());

    let output = flightcheck(&["check", "--expect", "full"], &log);
    assert_eq!(output.status.code(), Some(0));

    let output = flightcheck(&["check", "--expect", "resumption"], &log);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).starts_with("mismatch: "));
}

#[test]
fn check_hello_retry_normalization() {
    let dir = tempfile::tempdir().unwrap();
    let mut initial = hello_retry_request();
    initial.extend(server_flight(&[2]));
    let log = LogBuilder::new().crypto_data("Initial", &initial).crypto_data("Handshake", &server_flight(&[8, 20]));
    let log = write_log(&dir, "client.log", &log);

    let output = flightcheck(&["check", "--expect", "ServerHello:EncryptedExtensions:Finished"], &log);
    assert_eq!(output.status.code(), Some(0));

    let output =
        flightcheck(&["check", "--no-hello-retry", "--expect", "ServerHello:EncryptedExtensions:Finished"], &log);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn tls_read_mode() {
    let dir = tempfile::tempdir().unwrap();
    let mut server = records(ContentType::Handshake, &server_flight(&[2]));
    server.extend(records(ContentType::ChangeCipherSpec, &[1]));
    let log = write_log(&dir, "sclient.log", &LogBuilder::new().line("CONNECTED(00000003)").bio_read(&server));

    let output = flightcheck(&["decode", "--mode", "tls-read"], &log);
    assert_eq!(output.status.code(), Some(2));

    let output = flightcheck(&["decode", "--mode", "tls-read", "--skip-non-handshake"], &log);
    assert!(output.status.success());
    assert!(stdout(&output).ends_with("signature: ServerHello\n"));
}

#[test]
fn truncated_log_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut bytes = server_flight(&[2, 8]);
    bytes.truncate(bytes.len() - 1);
    let log = write_log(&dir, "client.log", &LogBuilder::new().crypto_data("Initial", &bytes));

    let output = flightcheck(&["check", "--expect", "full"], &log);
    assert_eq!(output.status.code(), Some(2));
    assert!(stdout(&output).is_empty());
}

#[test]
fn sclient_summary() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sclient.out");
    std::fs::write(&path, "New, TLSv1.3, Cipher is TLS_AES_256_GCM_SHA384\nNo ALPN negotiated\n").unwrap();

    let output = flightcheck(&["sclient"], &path);
    assert!(output.status.success());
    insta::assert_snapshot!(stdout(&output), @r"
    protocol              TLSv1.3
    cipher                TLS_AES_256_GCM_SHA384
    reused                false
    alpn                  none
    ");
}

#[test]
fn level_with_tls_mode_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let log = write_log(&dir, "sclient.log", &LogBuilder::new().bio_read(&records(ContentType::Handshake, &server_flight(&[2]))));

    let output = flightcheck(&["decode", "--mode", "tls-read", "--level", "handshake"], &log);
    assert_eq!(output.status.code(), Some(2));
    assert!(stdout(&output).is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("--level"));
}

#[test]
fn missing_log_is_an_error() {
    let output = flightcheck(&["decode"], Path::new("/nonexistent/client.log"));
    assert_eq!(output.status.code(), Some(2));
}
