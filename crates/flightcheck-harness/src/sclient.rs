//! `openssl s_client` connection summary.
//!
//! After the handshake `s_client` prints a human-readable summary on stdout:
//!
//! ```text
//! New, TLSv1.3, Cipher is TLS_AES_256_GCM_SHA384
//! Server public key is 2048 bit
//! Secure Renegotiation IS NOT supported
//! Compression: NONE
//! No ALPN negotiated
//! SSL-Session:
//!     Protocol  : TLSv1.3
//!     Cipher    : TLS_AES_256_GCM_SHA384
//!     TLS session ticket:
//!     0000 - 3f 2a 61 a4 de 8c 09 12-6b 4d 71 0c 2e 55 a0 f7   ?*a.....kMq..U..
//!     Max Early Data: 0
//! ```
//!
//! Each recognised line fills one typed field. Indented lines under
//! `SSL-Session:` are session attributes, except for ticket dump rows, which
//! are decoded into the ticket bytes.

use flightcheck_core::{DumpFormat, LineShape};
use tracing::warn;

/// ALPN outcome.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Alpn {
    /// The summary did not mention ALPN
    #[default]
    Unknown,
    /// `No ALPN negotiated`
    NotNegotiated,
    /// `ALPN protocol: <proto>`
    Negotiated(String),
}

/// The `SSL-Session:` section.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionSummary {
    /// `key: value` lines, in order
    pub attributes: Vec<(String, String)>,
    /// Session ticket bytes
    pub ticket: Vec<u8>,
}

impl SessionSummary {
    /// First value recorded for `key`.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }
}

/// Parsed `s_client` summary.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SClientSummary {
    /// Negotiated protocol version, e.g. `TLSv1.3`
    pub protocol: Option<String>,
    /// Negotiated cipher suite
    pub cipher: Option<String>,
    /// Whether the session was resumed (`Reused, ...`)
    pub reused: bool,
    /// Certificate verification result
    pub verification: Option<String>,
    /// Peer signing digest
    pub signing_digest: Option<String>,
    /// Peer signature type
    pub signature_type: Option<String>,
    /// Ephemeral key the server used
    pub server_temp_key: Option<String>,
    /// Secure renegotiation support, when reported
    pub secure_renegotiation: Option<bool>,
    /// Compression method
    pub compression: Option<String>,
    /// ALPN outcome
    pub alpn: Alpn,
    /// Early data limit advertised by the server
    pub max_early_data: Option<u32>,
    /// Session section, when printed
    pub session: Option<SessionSummary>,
}

impl SClientSummary {
    /// Parse `s_client` stdout.
    pub fn parse(output: &str) -> Self {
        let mut summary = Self::default();
        let mut in_session = false;

        for line in output.lines() {
            if in_session && line.starts_with(char::is_whitespace) {
                summary.session_line(line.trim());
                continue;
            }
            in_session = summary.summary_line(line);
        }
        summary
    }

    /// Returns whether the line opens the session section.
    fn summary_line(&mut self, line: &str) -> bool {
        let value = |prefix: &str| line.strip_prefix(prefix).map(str::to_owned);

        if line.starts_with("SSL-Session:") {
            self.session = Some(SessionSummary::default());
            return true;
        }

        if let Some(rest) = line.strip_prefix("New, ").or_else(|| line.strip_prefix("Reused, ")) {
            if let Some((protocol, cipher)) = rest.split_once(", Cipher is ") {
                self.protocol = Some(protocol.to_owned());
                self.cipher = Some(cipher.to_owned());
                self.reused = line.starts_with("Reused, ");
            }
        } else if let Some(digest) = value("Peer signing digest: ") {
            self.signing_digest = Some(digest);
        } else if let Some(kind) = value("Peer signature type: ") {
            self.signature_type = Some(kind);
        } else if let Some(key) = value("Server Temp Key: ") {
            self.server_temp_key = Some(key);
        } else if let Some(result) = value("Verification: ") {
            self.verification = Some(result);
        } else if let Some(support) =
            line.strip_prefix("Secure Renegotiation ").and_then(|rest| rest.strip_suffix(" supported"))
        {
            self.secure_renegotiation = Some(support != "IS NOT");
        } else if let Some(method) = value("Compression: ") {
            self.compression = Some(method);
        } else if line.starts_with("No ALPN negotiated") {
            self.alpn = Alpn::NotNegotiated;
        } else if let Some(protocol) = value("ALPN protocol: ") {
            self.alpn = Alpn::Negotiated(protocol);
        } else if let Some(limit) = line.trim_start().strip_prefix("Max Early Data: ") {
            self.max_early_data = limit.trim().parse().ok();
        }
        false
    }

    fn session_line(&mut self, line: &str) {
        let attribute = match DumpFormat::OPENSSL.parse_line(line) {
            Ok(LineShape::Row(row)) => {
                if let Some(session) = self.session.as_mut() {
                    session.ticket.extend_from_slice(&row.bytes);
                }
                return;
            },
            Err(cell) => {
                warn!(column = cell.column, token = %cell.token, "unreadable session ticket row");
                return;
            },
            Ok(_) => line.split_once(':'),
        };

        let Some((key, value)) = attribute else {
            return;
        };
        let (key, value) = (key.trim(), value.trim());
        if key == "Max Early Data" {
            self.max_early_data = value.parse().ok();
        }
        if let Some(session) = self.session.as_mut() {
            session.attributes.push((key.to_owned(), value.to_owned()));
        }
    }
}
