//! Configuration loading from TOML.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs.
//! The two endpoint URLs and the artifact URL are read once at startup
//! and are immutable for the process lifetime.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::time::Duration;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub backends: BackendsConfig,
    pub model: ModelConfig,
    #[serde(default)]
    pub client: ClientConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendsConfig {
    /// Full POST URL of the hard-code deployment.
    pub hard_code_url: String,
    /// Full POST URL of the TF Serving deployment.
    pub tf_serving_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ModelConfig {
    /// GET URL of the graph-model artifact used by tf-js mode.
    pub artifact_url: String,
}

/// Transport settings for the shared HTTP client. Timeouts live here,
/// not in the dispatch core.
#[derive(Debug, Deserialize, Clone)]
pub struct ClientConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            timeout_secs: 30,
            user_agent: format!("housecast/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        let config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {path}"))?;
        Ok(config)
    }
}
