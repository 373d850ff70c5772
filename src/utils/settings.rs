//! Analysis configuration loaded from TOML.
//!
//! Every field is optional; command-line flags take precedence over
//! values from the file.
//!
//! ```toml
//! bins = 200
//! mode = "rate"
//! zero_width = "error"
//! begin = 0
//! end = 1000000
//! metrics = ["PAPI_TOT_INS"]
//! ```

use crate::utilization::{BinMode, ZeroWidthPolicy};
use crate::utils::config::MAX_BINS;
use crate::utils::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Complete analysis configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Histogram bin count
    #[serde(default)]
    pub bins: Option<usize>,

    /// Histogram mode
    #[serde(default)]
    pub mode: Option<BinMode>,

    /// Zero-width sample gap handling
    #[serde(default)]
    pub zero_width: Option<ZeroWidthPolicy>,

    /// Window start; trace domain start when unset
    #[serde(default)]
    pub begin: Option<i64>,

    /// Window end; trace domain end when unset
    #[serde(default)]
    pub end: Option<i64>,

    /// Metrics to track; all when unset
    #[serde(default)]
    pub metrics: Option<Vec<String>>,
}

impl AnalysisConfig {
    /// Reject values no analysis could use
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(bins) = self.bins {
            if bins == 0 || bins > MAX_BINS {
                return Err(ConfigError::InvalidValue(format!(
                    "bins must be between 1 and {}, got {}",
                    MAX_BINS, bins
                )));
            }
        }

        if let (Some(begin), Some(end)) = (self.begin, self.end) {
            if end <= begin {
                return Err(ConfigError::InvalidValue(format!(
                    "end ({}) must be greater than begin ({})",
                    end, begin
                )));
            }
        }

        Ok(())
    }
}

/// Load an analysis config from a TOML file
///
/// # Arguments
/// * `path` - Path to the TOML configuration file
///
/// # Errors
/// * `ConfigError::IoError` - If file cannot be read
/// * `ConfigError::ParseFailed` - If TOML is invalid
/// * `ConfigError::InvalidValue` - If a value is out of range
pub fn load_analysis_config(path: impl AsRef<Path>) -> Result<AnalysisConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: AnalysisConfig = toml::from_str(&contents)?;
    config.validate()?;
    Ok(config)
}
