//! Store connection configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ATTAR_STORE_URL` - Base URL of the hosted table store
//! - `ATTAR_STORE_SERVICE_KEY` - Service key sent with every request
//!
//! ## Optional
//! - `ATTAR_STORE_SCHEMA_PATH` - REST path prefix (default: `rest/v1`)

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Connection settings for the hosted table store.
///
/// Implements `Debug` manually to redact the service key.
#[derive(Clone)]
pub struct StoreConfig {
    /// Base URL of the store (e.g. `https://project.example.co`).
    pub url: String,
    /// REST path prefix under the base URL.
    pub schema_path: String,
    /// Service key; grants full table access, server-side only.
    pub service_key: SecretString,
}

impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreConfig")
            .field("url", &self.url)
            .field("schema_path", &self.schema_path)
            .field("service_key", &"[REDACTED]")
            .finish()
    }
}

impl StoreConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a required variable is missing or the URL
    /// does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let url = require_env("ATTAR_STORE_URL")?;
        Url::parse(&url)
            .map_err(|e| ConfigError::InvalidEnvVar("ATTAR_STORE_URL".to_string(), e.to_string()))?;

        let service_key = require_env("ATTAR_STORE_SERVICE_KEY")?;

        let schema_path = std::env::var("ATTAR_STORE_SCHEMA_PATH")
            .unwrap_or_else(|_| "rest/v1".to_string())
            .trim_matches('/')
            .to_string();

        Ok(Self {
            url: url.trim_end_matches('/').to_string(),
            schema_path,
            service_key: SecretString::from(service_key),
        })
    }
}

fn require_env(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_service_key() {
        let config = StoreConfig {
            url: "https://project.example.co".to_string(),
            schema_path: "rest/v1".to_string(),
            service_key: SecretString::from("super-secret"),
        };
        let debug = format!("{config:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("super-secret"));
    }
}
