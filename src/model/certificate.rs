//! A TLS certificate/key pair.

/// A certificate is always a PEM cert and a PEM key together; a secret carrying only
/// one half is dropped entirely rather than represented as a half-populated value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    pub cert: String,
    pub key: String,
}

impl Certificate {
    pub fn new(cert: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            cert: cert.into(),
            key: key.into(),
        }
    }
}
