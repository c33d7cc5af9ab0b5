//! pthfill Settings Crate
//!
//! Handles the run configuration: fill motion parameters, drill tool
//! selection, splice anchors and alignment rounding.

pub mod config;
pub mod error;

pub use config::{AlignmentSettings, Config, DrillSettings, FillSettings, SpliceSettings};
pub use error::{ConfigError, SettingsError, SettingsResult};
