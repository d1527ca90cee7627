//! Webhook endpoint handlers.
//!
//! The webhook handler only:
//! 1. Reads the signature header
//! 2. Decodes the JSON body
//! 3. Verifies the signature against the configured secret
//!
//! What happens to a verified event is up to whoever sits behind this
//! service; nothing is stored here.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::signature::{verify_signature, Secret, SignatureError};
use crate::Config;

/// Shared application state.
///
/// The secret is moved out of the config on construction, so it lives in
/// exactly one place.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub secret: Secret,
}

impl AppState {
    /// Take the signing secret out of `config`.
    ///
    /// Fails with [`SignatureError::MissingSecret`] when none is configured.
    pub fn new(mut config: Config) -> Result<Self, SignatureError> {
        let secret = config
            .webhook_secret
            .take()
            .filter(|s| !s.is_empty())
            .ok_or(SignatureError::MissingSecret)?;

        Ok(Self {
            config: Arc::new(config),
            secret,
        })
    }
}

// =============================================================================
// Health Check
// =============================================================================

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// =============================================================================
// Signed Webhook
// =============================================================================

/// Webhook response.
#[derive(Serialize)]
pub struct WebhookResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
}

fn respond(status: StatusCode, label: &'static str) -> (StatusCode, Json<WebhookResponse>) {
    (
        status,
        Json(WebhookResponse {
            status: label,
            event_type: None,
        }),
    )
}

/// Signed webhook endpoint.
///
/// Responds with:
/// - 401 when the signature header is missing or does not verify
/// - 400 when the body is not JSON or has nothing to sign
/// - 200 once the signature matches
pub async fn signed_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let header_name = state.config.signature_header.as_str();

    info!(
        body_length = body.len(),
        has_signature = headers.contains_key(header_name),
        "webhook_received"
    );

    let received = match headers.get(header_name).and_then(|v| v.to_str().ok()) {
        Some(sig) => sig.trim().to_string(),
        None => {
            warn!(header = %header_name, "webhook_signature_missing");
            return respond(StatusCode::UNAUTHORIZED, "missing_signature");
        }
    };

    let payload: Value = match serde_json::from_slice(&body) {
        Ok(v) => v,
        Err(e) => {
            warn!(error = %e, "webhook_invalid_json");
            return respond(StatusCode::BAD_REQUEST, "invalid_json");
        }
    };

    let event_type = payload
        .pointer("/webhook_event/type")
        .and_then(Value::as_str)
        .map(str::to_string);

    match verify_signature(&payload, &received, &state.secret) {
        Ok(true) => {}
        Ok(false) => {
            warn!(event_type = ?event_type, "webhook_signature_invalid");
            return respond(StatusCode::UNAUTHORIZED, "unauthorized");
        }
        Err(e @ (SignatureError::InvalidPayload(_) | SignatureError::EmptyPayload)) => {
            warn!(error = %e, "webhook_invalid_payload");
            return respond(StatusCode::BAD_REQUEST, "invalid_payload");
        }
        Err(e) => {
            error!(error = %e, "webhook_verification_failed");
            return respond(StatusCode::INTERNAL_SERVER_ERROR, "error");
        }
    }

    info!(event_type = ?event_type, "webhook_verified");

    (
        StatusCode::OK,
        Json(WebhookResponse {
            status: "verified",
            event_type,
        }),
    )
}
