pub mod observability_config;
pub mod storage_config;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{AnnotrackError, AnnotrackResult};

pub use observability_config::ObservabilityConfig;
pub use storage_config::StorageConfig;

/// Top-level configuration aggregating all subsystem configs.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AnnotrackConfig {
    pub storage: StorageConfig,
    pub observability: ObservabilityConfig,
}

impl AnnotrackConfig {
    /// Load config from a TOML string, falling back to defaults for missing fields.
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Read and parse a TOML config file.
    pub fn from_file(path: &Path) -> AnnotrackResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AnnotrackError::ConfigError(format!("read {}: {e}", path.display()))
        })?;
        Self::from_toml(&raw)
            .map_err(|e| AnnotrackError::ConfigError(format!("parse {}: {e}", path.display())))
    }
}
