//! Cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SHOEBOX_CATALOG_URL` - Base URL of the catalog/stock service
//!
//! ## Optional
//! - `SHOEBOX_SNAPSHOT_PATH` - Cart snapshot file (default: shoebox-cart.json)
//! - `SHOEBOX_HTTP_TIMEOUT_SECS` - Catalog request timeout (default: 10)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_SNAPSHOT_PATH: &str = "shoebox-cart.json";
const DEFAULT_HTTP_TIMEOUT_SECS: &str = "10";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Cart application configuration.
#[derive(Debug, Clone)]
pub struct CartConfig {
    /// Base URL of the catalog/stock service.
    pub catalog_url: Url,
    /// Path of the persisted cart snapshot.
    pub snapshot_path: PathBuf,
    /// Timeout applied to catalog requests.
    pub http_timeout: Duration,
}

impl CartConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let catalog_url =
            parse_catalog_url("SHOEBOX_CATALOG_URL", &get_required_env("SHOEBOX_CATALOG_URL")?)?;
        let snapshot_path =
            PathBuf::from(get_env_or_default("SHOEBOX_SNAPSHOT_PATH", DEFAULT_SNAPSHOT_PATH));
        let http_timeout = parse_timeout_secs(
            "SHOEBOX_HTTP_TIMEOUT_SECS",
            &get_env_or_default("SHOEBOX_HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS),
        )?;

        Ok(Self {
            catalog_url,
            snapshot_path,
            http_timeout,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse and validate the catalog base URL.
fn parse_catalog_url(var_name: &str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value).map_err(|e| ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string()))
}

/// Parse a timeout given in whole seconds.
fn parse_timeout_secs(var_name: &str, value: &str) -> Result<Duration, ConfigError> {
    value
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|e| ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string()))
}
