//! CLI configuration module.
//!
//! Handles loading, validating, and merging `image-compress.toml`. Stock
//! defaults are overridden by the user's file, and command-line flags
//! override both.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [transform]
//! max_width = 1920              # Upper bound on output width
//! max_height = 1080             # Upper bound on output height
//! quality = 95                  # 0-100; advisory only for PNG
//! rotate = 0                    # Clockwise degrees
//! format = "jpeg"               # jpeg | png | webp
//! subsample = 1                 # Decode-time downscale (power of two)
//! auto_correction_angle = true  # Reserved, currently ignored
//! keep_exif = false             # Reserved, currently ignored
//!
//! [logging]
//! enabled = false               # Log failed operations at error level
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{OutputFormat, Quality, SubsampleFactor, TransformRequest};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILENAME: &str = "image-compress.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Top-level configuration loaded from `image-compress.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompressConfig {
    /// Default transform applied to every input.
    pub transform: TransformConfig,
    /// Failure logging.
    pub logging: LoggingConfig,
}

/// Default transform parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TransformConfig {
    /// Upper bound on output width (pixels).
    pub max_width: u32,
    /// Upper bound on output height (pixels).
    pub max_height: u32,
    /// Encoding quality (0 = worst, 100 = best).
    pub quality: u32,
    /// Clockwise rotation in degrees.
    pub rotate: i32,
    /// Output container.
    pub format: OutputFormat,
    /// Decode-time downscale factor.
    pub subsample: u32,
    /// Reserved.
    pub auto_correction_angle: bool,
    /// Reserved.
    pub keep_exif: bool,
}

impl Default for TransformConfig {
    fn default() -> Self {
        let request = TransformRequest::default();
        Self {
            max_width: request.min_width,
            max_height: request.min_height,
            quality: request.quality.value(),
            rotate: request.rotate_degrees,
            format: request.format,
            subsample: request.subsample.value(),
            auto_correction_angle: request.auto_correction_angle,
            keep_exif: request.keep_exif,
        }
    }
}

impl TransformConfig {
    pub fn to_request(&self) -> TransformRequest {
        TransformRequest {
            min_width: self.max_width,
            min_height: self.max_height,
            quality: Quality::new(i64::from(self.quality)),
            rotate_degrees: self.rotate,
            auto_correction_angle: self.auto_correction_angle,
            format: self.format,
            keep_exif: self.keep_exif,
            subsample: SubsampleFactor::new(i64::from(self.subsample)),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log failed operations through the `log` facade.
    pub enabled: bool,
}

impl CompressConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.transform.quality > 100 {
            return Err(ConfigError::Validation(
                "transform.quality must be 0-100".into(),
            ));
        }
        if self.transform.subsample == 0 {
            return Err(ConfigError::Validation(
                "transform.subsample must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(CompressConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
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

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<CompressConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: CompressConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load a config file.
///
/// A missing file is an error here; use [`load_config_or_default`] for the
/// optional working-directory lookup.
pub fn load_config(path: &Path) -> Result<CompressConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    resolve_config(Some(value))
}

/// Load `path` if it exists, else the stock defaults.
pub fn load_config_or_default(path: &Path) -> Result<CompressConfig, ConfigError> {
    if path.exists() {
        load_config(path)
    } else {
        resolve_config(None)
    }
}

/// Returns a fully-commented stock config with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# image-compress configuration
# ============================
# Place this file as image-compress.toml in the working directory, or pass
# --config <FILE>. Every key is optional; command-line flags win over it.

[transform]
# Upper bounds on output size. Images are shrunk to fit inside them with
# their aspect ratio preserved and are never enlarged.
max_width = 1920
max_height = 1080

# Encoding quality, 0 (smallest) to 100 (best). For PNG it only selects
# compression effort; PNG output is always lossless.
quality = 95

# Clockwise rotation in degrees. Multiples of 90 are exact; other angles
# rotate inside the original canvas and clip the corners.
rotate = 0

# Output format: "jpeg", "png" or "webp". WebP falls back to lossless WebP
# and then JPEG when the lossy encoder is not available.
format = "jpeg"

# Decode-time downscale. Rounded down to a power of two.
subsample = 1

# Reserved for EXIF handling. Accepted but currently ignored.
auto_correction_angle = true
keep_exif = false

[logging]
# Log failed operations at error level (RUST_LOG controls the sink).
enabled = false
"##
}
