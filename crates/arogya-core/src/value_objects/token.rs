//! Credential token - the opaque string a patient presents as a QR code
//!
//! Tokens carry 256 bits from the operating system CSPRNG and have no
//! derivable relationship with the subject they were issued for.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};
use std::fmt;
use subtle::ConstantTimeEq;

/// Opaque credential token
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CredentialToken(String);

impl CredentialToken {
    /// Prefix that makes scanned codes recognisable
    pub const PREFIX: &'static str = "AROGYA-";

    /// Number of random bytes per token
    pub const ENTROPY_BYTES: usize = 32;

    /// Generate a fresh random token
    pub fn generate() -> Self {
        let mut bytes = [0u8; Self::ENTROPY_BYTES];
        OsRng.fill_bytes(&mut bytes);
        Self(format!("{}{}", Self::PREFIX, URL_SAFE_NO_PAD.encode(bytes)))
    }

    /// Wrap a presented token string without validating its shape
    pub fn from_presented(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Borrow the token as a string slice
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Compare against a candidate in time independent of where they differ
    pub fn matches(&self, candidate: &str) -> bool {
        self.0.as_bytes().ct_eq(candidate.as_bytes()).into()
    }
}

// Tokens are bearer secrets; keep them out of logs.
impl fmt::Debug for CredentialToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CredentialToken(<redacted>)")
    }
}

impl fmt::Display for CredentialToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
