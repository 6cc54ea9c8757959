//! Client configuration.
//!
//! Strongly-typed configuration for the backend HTTP client, loaded via
//! the `config` crate from environment variables.

use serde::Deserialize;

/// Configuration for the backend HTTP client.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the platform API (e.g. `http://localhost:8080/api`).
    pub base_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_timeout_seconds() -> u64 {
    30
}

impl ClientConfig {
    /// Creates a configuration with defaults for everything but the URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_seconds: default_timeout_seconds(),
        }
    }

    /// Loads configuration from `AGENTDECK`-prefixed environment
    /// variables (e.g. `AGENTDECK_BASE_URL`).
    ///
    /// # Errors
    ///
    /// Returns an error if required configuration is missing or invalid.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(
                config::Environment::with_prefix("agentdeck")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
