//! Webhook payload signing and verification.
//!
//! A JSON payload is reduced to a canonical string and signed with
//! HMAC-SHA256:
//!
//! ```text
//! payload → flatten → clean → sort → serialize → HMAC-SHA256 → hex
//! ```
//!
//! Example: `{"a": {"b": "x", "c": null}, "d": true}` canonicalizes to
//! `a.b=x&d=true`.
//!
//! Every function here is pure; nothing is cached between calls.

pub mod canonical;
pub mod clean;
pub mod error;
pub mod flatten;
pub mod signer;

use serde_json::Value;
use tracing::{debug, warn};

pub use canonical::{serialize_entries, sort_entries};
pub use clean::{clean_entries, is_scalar_not_empty, is_value_not_empty};
pub use error::SignatureError;
pub use flatten::{flatten_payload, FlatEntry, Scalar, MAX_DEPTH};
pub use signer::{
    constant_time_eq, parse_signature, Secret, Signature, SIGNATURE_HEX_LEN,
};

/// Build the canonical string that gets signed.
///
/// Fails with [`SignatureError::EmptyPayload`] if nothing survives
/// cleaning, so an all-empty payload is never signed as `""`.
pub fn signature_text(payload: &Value) -> Result<String, SignatureError> {
    let flattened = flatten_payload(payload)?;
    let flattened_count = flattened.len();

    let cleaned = clean_entries(flattened);
    if cleaned.is_empty() {
        warn!(flattened_count = flattened_count, "signature_payload_empty");
        return Err(SignatureError::EmptyPayload);
    }

    let sorted = sort_entries(cleaned);
    debug!(
        flattened_count = flattened_count,
        signed_count = sorted.len(),
        "signature_text_built"
    );

    Ok(serialize_entries(&sorted))
}

/// Compute the signature a trusted sender would attach to `payload`.
pub fn compute_signature(
    payload: &Value,
    secret: impl AsRef<[u8]>,
) -> Result<Signature, SignatureError> {
    let secret = secret.as_ref();
    if secret.is_empty() {
        return Err(SignatureError::MissingSecret);
    }

    let text = signature_text(payload)?;
    signer::sign(&text, secret)
}

/// Verify a received signature against `payload`.
///
/// Returns `Ok(false)` for a mismatch and for a malformed signature.
/// Payload and secret problems are errors, never a silent `false`.
pub fn verify_signature(
    payload: &Value,
    received_signature: &str,
    secret: impl AsRef<[u8]>,
) -> Result<bool, SignatureError> {
    let computed = compute_signature(payload, secret)?;

    let received = match parse_signature(received_signature) {
        Ok(sig) => sig,
        Err(e) => {
            warn!(error = %e, "signature_invalid_format");
            return Ok(false);
        }
    };

    let valid = constant_time_eq(computed.as_str().as_bytes(), received.as_str().as_bytes());

    if !valid {
        warn!("signature_mismatch");
    }

    Ok(valid)
}
