//! Configuration module.
//!
//! Handles loading, validating, and merging `passport-photo.toml`. Stock
//! defaults are overridden by whatever keys the user file sets; CLI flags
//! override both.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [photo]
//! width_mm = 51.0           # Printed photo width
//! height_mm = 51.0          # Printed photo height
//! min_dpi = 300             # Minimum resolution the document requires
//!
//! [export]
//! format = "single-digital" # "single-digital" or "print-sheet"
//! size_limit = "unlimited"  # "unlimited", "50kb", "100kb", or "200kb"
//!
//! [decode]
//! timeout_ms = 5000         # Give up on an image that takes longer to decode
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse. Override just the values you want:
//!
//! ```toml
//! [export]
//! size_limit = "50kb"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::PhotoSpec;
use crate::types::{DocType, FileSizeLimit, OutputFormat};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// File looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "passport-photo.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Application configuration loaded from `passport-photo.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Physical photo size.
    pub photo: PhotoConfig,
    /// Default output choices.
    pub export: ExportConfig,
    /// Decode limits.
    pub decode: DecodeConfig,
}

impl AppConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(reason) = self.photo_spec().invalid_reason() {
            return Err(ConfigError::Validation(format!("photo: {reason}")));
        }
        if self.decode.timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "decode.timeout_ms must be positive".into(),
            ));
        }
        Ok(())
    }

    pub fn photo_spec(&self) -> PhotoSpec {
        PhotoSpec::new(
            self.photo.width_mm,
            self.photo.height_mm,
            self.photo.min_dpi,
        )
    }

    pub fn decode_timeout(&self) -> Duration {
        Duration::from_millis(self.decode.timeout_ms)
    }
}

/// Printed photo dimensions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PhotoConfig {
    pub width_mm: f64,
    pub height_mm: f64,
    pub min_dpi: u32,
}

impl Default for PhotoConfig {
    fn default() -> Self {
        let spec = DocType::Passport.photo_spec();
        Self {
            width_mm: spec.width_mm,
            height_mm: spec.height_mm,
            min_dpi: spec.min_dpi,
        }
    }
}

/// Default output format and size ceiling for `export`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    pub format: OutputFormat,
    pub size_limit: FileSizeLimit,
}

/// Decode limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DecodeConfig {
    /// Milliseconds an image may take to decode before the operation fails.
    pub timeout_ms: u64,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self { timeout_ms: 5000 }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(AppConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Err` if the file is missing or contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<toml::Value, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<AppConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: AppConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load configuration.
///
/// An explicit path must exist. Without one, [`DEFAULT_CONFIG_FILE`] in
/// `dir` is used when present and stock defaults otherwise.
pub fn load_config(explicit: Option<&Path>, dir: &Path) -> Result<AppConfig, ConfigError> {
    let overlay = match explicit {
        Some(path) => Some(load_raw_config(path)?),
        None => {
            let fallback = dir.join(DEFAULT_CONFIG_FILE);
            if fallback.exists() {
                Some(load_raw_config(&fallback)?)
            } else {
                None
            }
        }
    };
    resolve_config(overlay)
}

/// Returns a fully-commented stock config file with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# passport-photo configuration
# ============================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# The file is read from ./passport-photo.toml, or from --config <path>.
# Command-line flags override anything set here.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Photo size
# ---------------------------------------------------------------------------
[photo]
# Printed size of one photo in millimetres. The default is the 51 x 51 mm
# passport format. Print sheets always tile these 3 across and 2 down on
# 6x4 inch paper; sizes too large for the sheet are centred and clipped.
width_mm = 51.0
height_mm = 51.0

# Minimum resolution the issuing authority requires.
min_dpi = 300

# ---------------------------------------------------------------------------
# Export defaults
# ---------------------------------------------------------------------------
[export]
# "single-digital" for one upload-ready file,
# "print-sheet" for six copies on a 4x6 inch sheet.
format = "single-digital"

# File-size ceiling for single digital files: "unlimited", "50kb", "100kb",
# or "200kb". Print sheets are never compressed.
size_limit = "unlimited"

# ---------------------------------------------------------------------------
# Decoding
# ---------------------------------------------------------------------------
[decode]
# Milliseconds an image may take to decode before the operation fails.
timeout_ms = 5000
"##
}
