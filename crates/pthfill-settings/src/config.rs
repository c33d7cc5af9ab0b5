//! Configuration for pthfill
//!
//! Provides configuration file handling, defaults and validation.
//! Supports JSON and TOML file formats. Every section and field has a
//! default, so a config file only needs the values it changes.
//!
//! Configuration is organized into logical sections:
//! - Fill motion (temperatures, extrusion, heights, feed rate, dwell)
//! - Drill tool selection
//! - Splice anchors (purge section, pause commands, tool change count)
//! - Alignment rounding

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, SettingsResult};

/// Hole fill motion settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FillSettings {
    /// Hotend setpoint while filling (C)
    pub fill_temperature: f64,
    /// Setpoint restored afterwards when the program sets none before the
    /// insertion point (C)
    pub restore_temperature: f64,
    /// Filament pushed into each hole (mm)
    pub extrusion_amount: f64,
    /// Retraction undone before and redone after each hole (mm)
    pub retraction_amount: f64,
    /// Feed rate for every generated move (mm/min)
    pub feed_rate: f64,
    /// Travel height above the starting Z (mm)
    pub lift_height: f64,
    /// How far below the starting Z the nozzle presses into a hole (mm)
    pub contact_depth: f64,
    /// Dwell after depositing and after retracting (ms)
    pub dwell_ms: u32,
    /// Sideways X move that breaks the filament string (mm)
    pub string_break_offset: f64,
}

impl Default for FillSettings {
    fn default() -> Self {
        Self {
            fill_temperature: 240.0,
            restore_temperature: 220.0,
            extrusion_amount: 0.48,
            retraction_amount: 7.5,
            feed_rate: 4200.0,
            lift_height: 5.0,
            contact_depth: 0.05,
            dwell_ms: 1000,
            string_break_offset: 1.0,
        }
    }
}

/// Drill program settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrillSettings {
    /// Tool whose holes are filled (`T1` or `1`)
    pub tool: String,
}

impl Default for DrillSettings {
    fn default() -> Self {
        Self {
            tool: "T1".to_string(),
        }
    }
}

/// Splice anchor settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpliceSettings {
    /// Section name of the purge pass after which holes are filled
    pub purge_section: String,
    /// Commands inserted right after the conductive tool change
    pub pause_commands: Vec<String>,
    /// Number of tool changes the program must contain
    pub required_tool_changes: usize,
}

impl Default for SpliceSettings {
    fn default() -> Self {
        Self {
            purge_section: "Wipe tower".to_string(),
            pause_commands: vec!["M600".to_string(), "M400".to_string()],
            required_tool_changes: 2,
        }
    }
}

/// Coordinate alignment settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignmentSettings {
    /// Decimal places hole coordinates are rounded to after translation
    pub decimals: u32,
}

impl Default for AlignmentSettings {
    fn default() -> Self {
        Self { decimals: 2 }
    }
}

/// Complete run configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Fill motion settings
    pub fill: FillSettings,
    /// Drill settings
    pub drill: DrillSettings,
    /// Splice settings
    pub splice: SpliceSettings,
    /// Alignment settings
    pub alignment: AlignmentSettings,
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Platform config file location (`<config dir>/pthfill/config.toml`)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("pthfill").join("config.toml"))
    }

    /// Resolve the config for a run
    ///
    /// Uses `explicit` when given, else the platform config file if it
    /// exists, else defaults.
    pub fn resolve(explicit: Option<&Path>) -> SettingsResult<Self> {
        if let Some(path) = explicit {
            return Self::load_from_file(path);
        }
        match Self::default_path() {
            Some(path) if path.is_file() => {
                tracing::info!("Using config file {}", path.display());
                Self::load_from_file(&path)
            }
            _ => Ok(Self::default()),
        }
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path)?;

        let config: Self = match extension(path).as_deref() {
            Some("json") => serde_json::from_str(&content)?,
            Some("toml") => toml::from_str(&content)?,
            other => {
                return Err(ConfigError::UnsupportedFormat(other.unwrap_or("").to_string()).into())
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match extension(path).as_deref() {
            Some("json") => serde_json::to_string_pretty(self)?,
            Some("toml") => toml::to_string_pretty(self)?,
            other => {
                return Err(ConfigError::UnsupportedFormat(other.unwrap_or("").to_string()).into())
            }
        };

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fill = &self.fill;
        for (key, value) in [
            ("fill.fill_temperature", fill.fill_temperature),
            ("fill.restore_temperature", fill.restore_temperature),
            ("fill.extrusion_amount", fill.extrusion_amount),
            ("fill.feed_rate", fill.feed_rate),
            ("fill.lift_height", fill.lift_height),
        ] {
            if !(value > 0.0) {
                return Err(ConfigError::NotPositive {
                    key: key.to_string(),
                    value,
                });
            }
        }

        for (key, value) in [
            ("fill.retraction_amount", fill.retraction_amount),
            ("fill.contact_depth", fill.contact_depth),
            ("fill.string_break_offset", fill.string_break_offset),
        ] {
            if !(value >= 0.0) {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    reason: format!("must be >= 0, got {}", value),
                });
            }
        }

        if self.drill.tool.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "drill.tool".to_string(),
                reason: "must not be empty".to_string(),
            });
        }

        if self.splice.purge_section.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "splice.purge_section".to_string(),
                reason: "must not be empty".to_string(),
            });
        }

        // Only the non-conductive -> conductive layout is supported.
        if self.splice.required_tool_changes != 2 {
            return Err(ConfigError::InvalidValue {
                key: "splice.required_tool_changes".to_string(),
                reason: format!(
                    "only 2 tool changes are supported, got {}",
                    self.splice.required_tool_changes
                ),
            });
        }

        if self.alignment.decimals > 6 {
            return Err(ConfigError::InvalidValue {
                key: "alignment.decimals".to_string(),
                reason: format!("must be <= 6, got {}", self.alignment.decimals),
            });
        }

        Ok(())
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.fill.fill_temperature, 240.0);
        assert_eq!(config.fill.extrusion_amount, 0.48);
        assert_eq!(config.fill.retraction_amount, 7.5);
        assert_eq!(config.drill.tool, "T1");
        assert_eq!(config.splice.purge_section, "Wipe tower");
        assert_eq!(config.splice.pause_commands, vec!["M600", "M400"]);
    }

    #[test]
    fn test_validate_rejects_zero_feed_rate() {
        let mut config = Config::default();
        config.fill.feed_rate = 0.0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::NotPositive {
                key: "fill.feed_rate".to_string(),
                value: 0.0
            })
        );
    }

    #[test]
    fn test_validate_rejects_nan() {
        let mut config = Config::default();
        config.fill.extrusion_amount = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_other_tool_change_counts() {
        let mut config = Config::default();
        config.splice.required_tool_changes = 3;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str("[fill]\nextrusion_amount = 0.6\n").unwrap();
        assert_eq!(config.fill.extrusion_amount, 0.6);
        assert_eq!(config.fill.retraction_amount, 7.5);
        assert_eq!(config.drill.tool, "T1");
    }
}
