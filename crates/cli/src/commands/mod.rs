//! CLI command implementations

pub mod deploy;
pub mod pods;

use anyhow::{Context, Result};

use crate::client::PodSpec;

/// Read a pod spec from a JSON file
pub fn read_spec(path: &str) -> Result<PodSpec> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read spec file {}", path))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse spec file {}", path))
}
