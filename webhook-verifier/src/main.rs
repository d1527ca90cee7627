//! Webhook Verify - prints the canonical text and signature of a payload.
//!
//! Reads a JSON payload from a file (or `-` for stdin) and the secret from
//! `WEBHOOK_SECRET`. When a signature is passed as second argument it is
//! verified too, and the process exits with status 1 if it does not match.
//!
//! ```text
//! WEBHOOK_SECRET=... webhook-verify event.json 7159d656...
//! ```

use std::io::{self, Read};
use std::{env, fs, process};

use anyhow::{bail, Context, Result};
use serde::Serialize;
use serde_json::Value;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use webhook_verifier::{
    compute_signature, signature_text, verify_signature, Config, Secret, SignatureError,
};

const USAGE: &str = "usage: webhook-verify <payload.json | -> [signature]";

/// Output printed to stdout.
#[derive(Debug, Serialize)]
struct Report {
    signature_text: String,
    computed_signature: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    verified: Option<bool>,
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays machine-readable
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true).with_writer(io::stderr))
        .init();

    let mut args = env::args().skip(1);
    let source = match args.next() {
        Some(s) => s,
        None => bail!(USAGE),
    };
    let received = args.next();

    let secret = Config::from_env()
        .webhook_secret
        .context("WEBHOOK_SECRET must be set")?;

    let raw = read_payload(&source)?;
    let payload: Value = serde_json::from_str(&raw).context("Payload is not valid JSON")?;

    let report = build_report(&payload, received.as_deref(), &secret)?;

    println!("{}", serde_json::to_string_pretty(&report)?);

    let code = exit_code(&report);
    if code != 0 {
        process::exit(code);
    }

    Ok(())
}

/// Canonical text and signature, plus the verdict when a signature was given.
fn build_report(
    payload: &Value,
    received: Option<&str>,
    secret: &Secret,
) -> Result<Report, SignatureError> {
    Ok(Report {
        signature_text: signature_text(payload)?,
        computed_signature: compute_signature(payload, secret)?.into_string(),
        verified: received
            .map(|sig| verify_signature(payload, sig.trim(), secret))
            .transpose()?,
    })
}

/// 1 only when a supplied signature failed to verify.
fn exit_code(report: &Report) -> i32 {
    match report.verified {
        Some(false) => 1,
        _ => 0,
    }
}

fn read_payload(source: &str) -> Result<String> {
    if source == "-" {
        let mut raw = String::new();
        io::stdin()
            .read_to_string(&mut raw)
            .context("Failed to read payload from stdin")?;
        return Ok(raw);
    }

    fs::read_to_string(source).with_context(|| format!("Failed to read payload from {}", source))
}
