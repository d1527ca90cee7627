//! Errors raised while canonicalizing, signing or verifying a payload.

use thiserror::Error;

/// Errors that can occur while computing or checking a webhook signature.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Invalid signature format: expected 64 hex characters, got {length} bytes")]
    InvalidSignatureFormat { length: usize },

    #[error("No signing secret provided")]
    MissingSecret,

    #[error("Payload has no non-empty values to sign")]
    EmptyPayload,

    #[error("Signing secret rejected by HMAC")]
    InvalidKey,
}
