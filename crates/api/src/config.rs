//! API server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `DATABASE_URL` - `PostgreSQL` connection string; without it the server
//!   runs on the in-memory store with seed data
//! - `HOST` - Bind address (default: 0.0.0.0)
//! - `PORT` - Listen port (default: 5000)
//! - `SESSION_SECRET` - Session signing secret
//! - `OPENAI_API_KEY` - Language-model provider API key
//! - `OPENAI_MODEL` - Model name (default: gpt-4o)
//! - `STRIPE_SECRET_KEY` - Payment gateway secret key
//! - `SENTRY_DSN` - Sentry error tracking DSN
//!
//! Missing secrets fall back to development placeholders with a logged
//! warning instead of refusing to start; the advisory and payment endpoints
//! then fail per-request while the rest of the API stays usable.

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// API server configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// `PostgreSQL` connection URL (contains password); `None` selects the
    /// in-memory backend
    pub database_url: Option<SecretString>,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Session signing secret
    pub session_secret: SecretString,
    /// Language-model provider configuration
    pub openai: OpenAiConfig,
    /// Payment gateway configuration
    pub stripe: StripeConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Language-model provider configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct OpenAiConfig {
    /// API key for the Chat Completions endpoint
    pub api_key: SecretString,
    /// Model name (e.g. gpt-4o)
    pub model: String,
}

impl std::fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .finish()
    }
}

/// Payment gateway configuration.
///
/// Implements `Debug` manually to redact the secret key.
#[derive(Clone)]
pub struct StripeConfig {
    /// Secret key for server-side gateway calls
    pub secret_key: SecretString,
}

impl std::fmt::Debug for StripeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeConfig")
            .field("secret_key", &"[REDACTED]")
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `HOST` or `PORT` cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_optional_env("DATABASE_URL").map(SecretString::from);
        if database_url.is_none() {
            tracing::warn!("DATABASE_URL not set, using in-memory storage with seed data");
        }

        let host = get_env_or_default("HOST", "0.0.0.0")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("PORT", "5000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("PORT".to_string(), e.to_string()))?;

        let session_secret = get_secret_or_placeholder("SESSION_SECRET", "dev-session-secret");
        let openai = OpenAiConfig {
            api_key: get_secret_or_placeholder("OPENAI_API_KEY", "sk-placeholder"),
            model: get_env_or_default("OPENAI_MODEL", "gpt-4o"),
        };
        let stripe = StripeConfig {
            secret_key: get_secret_or_placeholder("STRIPE_SECRET_KEY", "sk_test_placeholder"),
        };
        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            database_url,
            host,
            port,
            session_secret,
            openai,
            stripe,
            sentry_dsn,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get a secret from the environment, falling back to a development
/// placeholder with a logged warning.
fn get_secret_or_placeholder(key: &str, placeholder: &str) -> SecretString {
    std::env::var(key).map_or_else(
        |_| {
            tracing::warn!("{key} not set, using a development placeholder");
            SecretString::from(placeholder)
        },
        SecretString::from,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_secrets() {
        let openai = OpenAiConfig {
            api_key: SecretString::from("sk-real-key"),
            model: "gpt-4o".to_owned(),
        };
        let debug = format!("{openai:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("sk-real-key"));

        let stripe = StripeConfig {
            secret_key: SecretString::from("sk_live_abc"),
        };
        let debug = format!("{stripe:?}");
        assert!(!debug.contains("sk_live_abc"));
    }
}
