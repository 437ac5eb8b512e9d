//! Expected server flights.

use std::{convert::Infallible, fmt, str::FromStr};

/// What the server's first flight should look like.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpectedFlight {
    /// Certificate-authenticated handshake without a resumed session
    FullHandshake,
    /// PSK resumption: no certificate exchange
    Resumption,
    /// Server requests a client certificate
    ClientAuth,
    /// Caller-supplied signature prefix
    Pattern(String),
}

impl ExpectedFlight {
    /// Signature prefix the flight must start with.
    pub fn pattern(&self) -> &str {
        match self {
            Self::FullHandshake => {
                "ServerHello:EncryptedExtensions:Certificate:CertificateVerify:Finished"
            },
            Self::Resumption => "ServerHello:EncryptedExtensions:Finished",
            Self::ClientAuth => {
                "ServerHello:EncryptedExtensions:CertificateRequest:Certificate:CertificateVerify:Finished"
            },
            Self::Pattern(pattern) => pattern,
        }
    }
}

impl FromStr for ExpectedFlight {
    type Err = Infallible;

    /// `full`, `resumption` and `client-auth` name the catalogue entries;
    /// anything else is taken as a literal pattern.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "full" => Self::FullHandshake,
            "resumption" | "resume" => Self::Resumption,
            "client-auth" => Self::ClientAuth,
            pattern => Self::Pattern(pattern.to_owned()),
        })
    }
}

impl fmt::Display for ExpectedFlight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.pattern())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalogue_names() {
        assert_eq!("full".parse::<ExpectedFlight>(), Ok(ExpectedFlight::FullHandshake));
        assert_eq!("resume".parse::<ExpectedFlight>(), Ok(ExpectedFlight::Resumption));
        assert_eq!("client-auth".parse::<ExpectedFlight>(), Ok(ExpectedFlight::ClientAuth));
        assert_eq!(
            "ServerHello:Finished".parse::<ExpectedFlight>(),
            Ok(ExpectedFlight::Pattern("ServerHello:Finished".into()))
        );
    }

    #[test]
    fn full_handshake_does_not_match_resumption() {
        let full = ExpectedFlight::FullHandshake;
        assert!(!full.pattern().starts_with(ExpectedFlight::Resumption.pattern()));
        assert!(ExpectedFlight::ClientAuth.pattern().contains("CertificateRequest"));
    }
}
