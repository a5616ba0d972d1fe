//! Engine configuration.
//!
//! Defaults reproduce the documented presentation contract (4 decimals,
//! `N/A` for missing cells, every view enabled). A JSON file may override
//! any subset of fields.

use std::path::Path;

const DEFAULT_FALLBACK_MODEL: &str = "Unknown";
const DEFAULT_PRECISION: usize = 4;
const DEFAULT_MISSING_TOKEN: &str = "N/A";
const MAX_PRECISION: usize = 12;

/// Errors raised while loading or validating a [`CompareConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Table cell formatting.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TableConfig {
    /// Decimal places for present values.
    pub precision: usize,
    /// Literal rendered for an absent value.
    pub missing_token: String,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
            missing_token: DEFAULT_MISSING_TOKEN.to_string(),
        }
    }
}

/// Which chart payloads are assembled on every recompute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewSelection {
    /// One bar chart per available metric.
    pub bars: bool,
    /// Normalized radar charts for the lower-is-better families.
    pub radars: bool,
    /// Raw PSNR/SSIM area chart.
    pub fidelity_area: bool,
}

impl Default for ViewSelection {
    fn default() -> Self {
        Self {
            bars: true,
            radars: true,
            fidelity_area: true,
        }
    }
}

/// Top-level configuration for a [`crate::Comparison`].
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompareConfig {
    /// Model name given to records that carry neither `model` nor `method`.
    pub fallback_model: String,
    pub table: TableConfig,
    pub views: ViewSelection,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            fallback_model: DEFAULT_FALLBACK_MODEL.to_string(),
            table: TableConfig::default(),
            views: ViewSelection::default(),
        }
    }
}

impl CompareConfig {
    /// Load and validate a configuration from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json_str(&data)
    }

    pub fn from_json_str(data: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fallback_model.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "fallback_model must not be empty".to_string(),
            ));
        }
        if self.table.precision > MAX_PRECISION {
            return Err(ConfigError::Invalid(format!(
                "table.precision must be <= {MAX_PRECISION}, got {}",
                self.table.precision
            )));
        }
        if self.table.missing_token.is_empty() {
            return Err(ConfigError::Invalid(
                "table.missing_token must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
