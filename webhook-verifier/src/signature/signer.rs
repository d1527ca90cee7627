//! HMAC-SHA256 signing and constant-time signature comparison.

use std::fmt;

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::error::SignatureError;

type HmacSha256 = Hmac<Sha256>;

/// Length of a hex-encoded HMAC-SHA256 digest.
pub const SIGNATURE_HEX_LEN: usize = 64;

/// Shared signing secret.
///
/// Used as the raw HMAC key. `Debug` never prints the bytes.
#[derive(Clone)]
pub struct Secret(Vec<u8>);

impl Secret {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for Secret {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<&str> for Secret {
    fn from(value: &str) -> Self {
        Self::new(value.as_bytes())
    }
}

impl From<String> for Secret {
    fn from(value: String) -> Self {
        Self::new(value.into_bytes())
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(<redacted>)")
    }
}

/// A lowercase hex HMAC-SHA256 signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature(String);

impl Signature {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Signature {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Compute `HMAC-SHA256(secret, message)` as lowercase hex.
///
/// An empty secret is refused instead of producing a signature anyone
/// could forge.
pub fn sign(message: &str, secret: &[u8]) -> Result<Signature, SignatureError> {
    if secret.is_empty() {
        return Err(SignatureError::MissingSecret);
    }

    let mut mac = HmacSha256::new_from_slice(secret).map_err(|_| SignatureError::InvalidKey)?;
    mac.update(message.as_bytes());

    Ok(Signature(hex::encode(mac.finalize().into_bytes())))
}

/// Parse a received signature: exactly 64 hex digits, any case.
///
/// Every byte is inspected regardless of where an invalid one appears.
pub fn parse_signature(received: &str) -> Result<Signature, SignatureError> {
    let bytes = received.as_bytes();
    if bytes.len() != SIGNATURE_HEX_LEN {
        return Err(SignatureError::InvalidSignatureFormat {
            length: bytes.len(),
        });
    }

    let invalid = bytes
        .iter()
        .fold(0u8, |acc, b| acc | u8::from(!b.is_ascii_hexdigit()));
    if invalid != 0 {
        return Err(SignatureError::InvalidSignatureFormat {
            length: bytes.len(),
        });
    }

    Ok(Signature(received.to_ascii_lowercase()))
}

/// Constant-time byte comparison; `false` when lengths differ.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    a.ct_eq(b).into()
}
