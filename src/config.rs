//! Configuration module
//!
//! Loads configuration from environment variables.

use std::env;

/// Default inactivity window before rest mode logs the session out.
const DEFAULT_REST_TIMEOUT_SECS: u64 = 300;

/// SHA-256 digests of the two accepted access codes.
const DEFAULT_AUTH_DIGESTS: [&str; 2] = [
    "9af15b336e6a9619928537df30b2e6a2376569fcf9d7e773eccede65606529a0",
    "8c6976e5b5410415bde908bd4dee15dfb167a9c873fc4bb8a81f6f2ab448a918",
];

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the keyed JSON snapshots
    pub data_dir: String,

    /// Environment (development, production)
    pub environment: String,

    /// Inactivity window, in seconds, before rest mode ends the session
    pub rest_timeout_secs: u64,

    /// SHA-256 hex digests of the accepted access codes
    pub auth_digests: Vec<String>,

    /// API key for the assistant backend, if configured
    pub assistant_api_key: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let data_dir = env::var("JURISFINANCE_DATA_DIR").unwrap_or_else(|_| "./data".to_string());

        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let rest_timeout_secs = match env::var("REST_TIMEOUT_SECS") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| ConfigError::InvalidValue("REST_TIMEOUT_SECS"))?,
            Err(_) => DEFAULT_REST_TIMEOUT_SECS,
        };

        // Comma-separated hex digests; overrides the built-in access codes
        let auth_digests = match env::var("AUTH_DIGESTS") {
            Ok(raw) => {
                let digests: Vec<String> = raw
                    .split(',')
                    .map(|d| d.trim().to_lowercase())
                    .filter(|d| !d.is_empty())
                    .collect();
                if digests.is_empty() || digests.iter().any(|d| d.len() != 64) {
                    return Err(ConfigError::InvalidValue("AUTH_DIGESTS"));
                }
                digests
            }
            Err(_) => DEFAULT_AUTH_DIGESTS.iter().map(|d| d.to_string()).collect(),
        };

        let assistant_api_key = env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty());

        Ok(Self {
            data_dir,
            environment,
            rest_timeout_secs,
            auth_digests,
            assistant_api_key,
        })
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: "./data".to_string(),
            environment: "development".to_string(),
            rest_timeout_secs: DEFAULT_REST_TIMEOUT_SECS,
            auth_digests: DEFAULT_AUTH_DIGESTS.iter().map(|d| d.to_string()).collect(),
            assistant_api_key: None,
        }
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(&'static str),
}
