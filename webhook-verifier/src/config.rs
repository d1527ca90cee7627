//! Configuration module for environment variable parsing.
//!
//! Reads all configuration from environment variables.

use std::env;

use crate::signature::Secret;

/// Default header carrying the sender's signature.
pub const DEFAULT_SIGNATURE_HEADER: &str = "X-Signature";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the web server to listen on
    pub port: u16,

    /// Shared HMAC secret used to sign webhook payloads
    pub webhook_secret: Option<Secret>,

    /// Request header holding the received signature
    pub signature_header: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Config {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),

            webhook_secret: parse_secret("WEBHOOK_SECRET"),

            signature_header: env::var("SIGNATURE_HEADER")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_SIGNATURE_HEADER.to_string()),
        }
    }

    /// Whether a usable signing secret is configured.
    pub fn is_signature_verification_enabled(&self) -> bool {
        self.webhook_secret
            .as_ref()
            .map(|s| !s.is_empty())
            .unwrap_or(false)
    }
}

/// Read a secret, treating blank values as unset.
///
/// The value is used byte-for-byte; only an all-whitespace value is
/// rejected.
fn parse_secret(name: &str) -> Option<Secret> {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(Secret::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_secret() {
        env::set_var("TEST_WEBHOOK_SECRET", "OWlPF9plag9KEtYvw3EM+7UDrgXb84xjZPR2TvzJM1I=");
        let secret = parse_secret("TEST_WEBHOOK_SECRET").unwrap();
        assert_eq!(
            secret.as_ref(),
            "OWlPF9plag9KEtYvw3EM+7UDrgXb84xjZPR2TvzJM1I=".as_bytes()
        );
        env::remove_var("TEST_WEBHOOK_SECRET");
    }

    #[test]
    fn test_parse_secret_blank() {
        env::set_var("TEST_BLANK_SECRET", "   ");
        assert!(parse_secret("TEST_BLANK_SECRET").is_none());
        env::remove_var("TEST_BLANK_SECRET");

        assert!(parse_secret("NONEXISTENT_SECRET_VAR").is_none());
    }

    #[test]
    fn test_is_signature_verification_enabled() {
        let mut config = Config {
            port: 8080,
            webhook_secret: None,
            signature_header: DEFAULT_SIGNATURE_HEADER.to_string(),
        };
        assert!(!config.is_signature_verification_enabled());

        config.webhook_secret = Some(Secret::from(""));
        assert!(!config.is_signature_verification_enabled());

        config.webhook_secret = Some(Secret::from("key123"));
        assert!(config.is_signature_verification_enabled());
    }
}
