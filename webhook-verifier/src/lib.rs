//! Webhook Verifier - HMAC signatures for JSON webhook payloads.
//!
//! This library provides the signing protocol and two thin surfaces over it:
//! - `webhook-verifier-web`: web server that rejects unsigned or tampered webhooks
//! - `webhook-verify`: command-line tool that prints the canonical text and signature
//!
//! ## Architecture
//!
//! ```text
//! Payload → flatten → clean → sort → serialize → HMAC-SHA256 → constant-time compare
//! ```

pub mod config;
pub mod signature;
pub mod web;

// Re-export commonly used types
pub use config::Config;
pub use signature::{
    compute_signature, signature_text, verify_signature, Secret, Signature, SignatureError,
};
pub use web::AppState;
