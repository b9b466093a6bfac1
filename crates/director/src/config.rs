//! Server configuration

use anyhow::Result;
use serde::Deserialize;

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DirectorConfig {
    /// Port for the control API, health checks and metrics
    #[serde(default = "default_api_port")]
    pub api_port: u16,
}

fn default_api_port() -> u16 {
    8080
}

impl DirectorConfig {
    /// Load configuration from the environment
    pub fn load() -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("DIRECTOR"))
            .build()?;

        Ok(config.try_deserialize().unwrap_or_else(|_| DirectorConfig {
            api_port: default_api_port(),
        }))
    }
}
