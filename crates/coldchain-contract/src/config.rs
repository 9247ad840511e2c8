//! # Contract Configuration
//!
//! Deployment-time parameters of the registry. Configuration is part of the
//! deployed contract definition: every replica must run with the same values,
//! otherwise replays of `CheckTemperature` or status writes diverge.
//!
//! ```yaml
//! temperature_window:
//!   min: 60.0
//!   max: 70.0
//! status_policy: permissive
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default lower bound of the acceptable temperature window.
pub const DEFAULT_MIN_TEMPERATURE: f64 = 60.0;
/// Default upper bound of the acceptable temperature window.
pub const DEFAULT_MAX_TEMPERATURE: f64 = 70.0;

/// Closed interval of acceptable readings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TemperatureWindow {
    pub min: f64,
    pub max: f64,
}

impl Default for TemperatureWindow {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_TEMPERATURE,
            max: DEFAULT_MAX_TEMPERATURE,
        }
    }
}

impl TemperatureWindow {
    fn validate(&self) -> Result<(), ConfigError> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min > self.max {
            return Err(ConfigError::InvalidWindow {
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

/// Whether write paths enforce the closed status set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusPolicy {
    /// Any status string is stored as supplied.
    #[default]
    Permissive,
    /// `CreateAsset` and `UpdateAssetStatus` reject statuses outside the set.
    Strict,
}

/// Registry configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContractConfig {
    pub temperature_window: TemperatureWindow,
    pub status_policy: StatusPolicy,
}

impl ContractConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a YAML file.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.temperature_window.validate()
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("temperature window [{min}, {max}] must be finite with min <= max")]
    InvalidWindow { min: f64, max: f64 },
}
