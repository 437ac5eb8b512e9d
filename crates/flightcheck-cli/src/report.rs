//! Plain-text reports.

use std::io::{self, Write};

use flightcheck_harness::{Alpn, SClientSummary};
use flightcheck_proto::HandshakeSequence;

/// One line per message, then the signature.
pub fn write_sequence(out: &mut impl Write, sequence: &HandshakeSequence, bodies: bool) -> io::Result<()> {
    for (index, message) in sequence.iter().enumerate() {
        writeln!(out, "{index:>3}  {:<20} {:>6}", message.type_name(), message.length())?;
        if bodies && !message.body().is_empty() {
            writeln!(out, "     {}", hex::encode(message.body()))?;
        }
    }
    writeln!(out, "signature: {}", sequence.signature())
}

/// Known fields of an `s_client` summary, one per line.
pub fn write_summary(out: &mut impl Write, summary: &SClientSummary) -> io::Result<()> {
    let fields = [
        ("protocol", summary.protocol.as_deref()),
        ("cipher", summary.cipher.as_deref()),
        ("verification", summary.verification.as_deref()),
        ("signing digest", summary.signing_digest.as_deref()),
        ("signature type", summary.signature_type.as_deref()),
        ("server temp key", summary.server_temp_key.as_deref()),
        ("compression", summary.compression.as_deref()),
    ];
    for (name, value) in fields {
        if let Some(value) = value {
            writeln!(out, "{name:<22}{value}")?;
        }
    }

    writeln!(out, "{:<22}{}", "reused", summary.reused)?;
    if let Some(secure) = summary.secure_renegotiation {
        writeln!(out, "{:<22}{secure}", "secure renegotiation")?;
    }
    match &summary.alpn {
        Alpn::Unknown => {},
        Alpn::NotNegotiated => writeln!(out, "{:<22}none", "alpn")?,
        Alpn::Negotiated(protocol) => writeln!(out, "{:<22}{protocol}", "alpn")?,
    }
    if let Some(limit) = summary.max_early_data {
        writeln!(out, "{:<22}{limit}", "max early data")?;
    }
    if let Some(session) = &summary.session {
        writeln!(out, "{:<22}{} attributes, {} ticket bytes", "session", session.attributes.len(), session.ticket.len())?;
    }
    Ok(())
}
