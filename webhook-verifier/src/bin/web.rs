//! Webhook Verifier Web Server - rejects webhooks whose signature does not match.
//!
//! This binary provides a thin web server that:
//! - Receives JSON webhooks on `POST /webhooks`
//! - Verifies the HMAC-SHA256 signature from the configured header
//! - Exposes `GET /health`

use std::net::SocketAddr;

use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Router,
};
use tokio::{net::TcpListener, signal};
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use webhook_verifier::web::{health, signed_webhook, AppState};
use webhook_verifier::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize structured JSON logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();

    info!("web_server_starting");

    // Load configuration
    let config = Config::from_env();
    info!(
        port = config.port,
        signing_configured = config.is_signature_verification_enabled(),
        signature_header = %config.signature_header,
        "config_loaded"
    );

    let port = config.port;

    // Without a secret every request would be rejected; refuse to start instead
    let state = AppState::new(config).context("WEBHOOK_SECRET must be set")?;

    // Build the router
    let app = Router::new()
        .route("/health", get(health))
        .route("/webhooks", post(signed_webhook))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Bind to address
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!(address = %addr, "web_server_listening");

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("web_server_shutdown_complete");

    Ok(())
}

/// Wait for SIGINT or SIGTERM.
///
/// A signal source that cannot be installed is logged and never fires; the
/// other one still stops the server.
async fn shutdown_signal() {
    let interrupt = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, signal = "SIGINT", "signal_handler_failed");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, signal = "SIGTERM", "signal_handler_failed");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let received = tokio::select! {
        _ = interrupt => "SIGINT",
        _ = terminate => "SIGTERM",
    };

    info!(signal = received, "web_server_shutting_down");
}
