//! Web server module for receiving signed webhooks.
//!
//! This module provides a thin web server that:
//! - Receives JSON webhooks
//! - Verifies the HMAC signature carried in a request header
//! - Answers 200 for authentic payloads and 400/401 otherwise

pub mod handlers;

pub use handlers::{health, signed_webhook, AppState, HealthResponse, WebhookResponse};
