use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::qstate::DEFAULT_PARALLEL_THRESHOLD;

/// Settings read from an optional TOML file.
///
/// ```toml
/// [device]
/// shots = 1000
/// seed = 42
/// parallel_threshold = 16384
/// ```
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub device: DeviceConfig,
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DeviceConfig {
    /// Number of samples per expectation value; exact when absent.
    pub shots: Option<usize>,
    pub seed: Option<u64>,
    /// State dimension from which single-qubit gates run in parallel.
    pub parallel_threshold: usize,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            shots: None,
            seed: None,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl Config {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).context("Failed to parse config")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("Invalid config {}", path.display()))
    }

    /// Loads `path` when given, defaults otherwise.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}
