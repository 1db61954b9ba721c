//! TOML-based processing configuration.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Processing configuration parsed from TOML.
///
/// All fields have defaults matching the vendor's quarter-hour power feed.
/// Load from TOML with [`ProcessingConfig::from_toml_file`] or use
/// [`ProcessingConfig::default`] for the built-in values.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// `timeUnit` every power-details source unit must declare.
    pub time_unit: String,
    /// Power unit every power-details source unit must declare.
    pub unit: String,
    /// Elapsed time assumed for the first sample when integrating power
    /// into energy (minutes). Matches the vendor's battery telemetry
    /// cadence; change it only if that cadence changes.
    pub integrator_lead_in_minutes: f64,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            time_unit: "QUARTER_OF_AN_HOUR".to_string(),
            unit: "W".to_string(),
            integrator_lead_in_minutes: 5.0,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Error)]
#[error("config error: {field} — {message}")]
pub struct ConfigError {
    /// Field path (e.g., `"integrator_lead_in_minutes"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ProcessingConfig {
    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is
    /// invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "config".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown
    /// fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if the configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.time_unit.is_empty() {
            errors.push(ConfigError {
                field: "time_unit".into(),
                message: "must not be empty".into(),
            });
        }
        if self.unit.is_empty() {
            errors.push(ConfigError {
                field: "unit".into(),
                message: "must not be empty".into(),
            });
        }
        if !(self.integrator_lead_in_minutes > 0.0) {
            errors.push(ConfigError {
                field: "integrator_lead_in_minutes".into(),
                message: "must be > 0".into(),
            });
        }

        errors
    }
}
