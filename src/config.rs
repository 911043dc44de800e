//! Composer configuration module.
//!
//! Handles loading, validating, and merging `composer.toml`. Stock defaults
//! are overridden by whatever keys the user file sets.
//!
//! ## Config File Location
//!
//! `--config <path>` names the file explicitly. Without it, `composer.toml` in
//! the working directory is used when present; otherwise the stock defaults
//! apply unchanged.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [compose]
//! quality = 100             # JPEG quality for addOverlayToImage (1-100)
//!
//! [gallery]
//! directory = "gallery"     # Where saveImage stores photos
//! title = "2T2000s"         # Title recorded with every insert
//! description = "Taken from the 2T200s app"
//! quality = 90              # JPEG quality for gallery copies (1-100)
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse. Override just the values you want:
//!
//! ```toml
//! [gallery]
//! directory = "/sdcard/Pictures"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{ComposeConfig, Quality, SaveConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "composer.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Composer configuration loaded from `composer.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ComposerConfig {
    /// Overlay composition settings.
    pub compose: ComposeSection,
    /// Gallery insertion settings.
    pub gallery: GallerySection,
}

impl ComposerConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=100).contains(&self.compose.quality) {
            return Err(ConfigError::Validation(
                "compose.quality must be 1-100".into(),
            ));
        }
        if !(1..=100).contains(&self.gallery.quality) {
            return Err(ConfigError::Validation(
                "gallery.quality must be 1-100".into(),
            ));
        }
        if self.gallery.directory.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "gallery.directory must not be empty".into(),
            ));
        }
        Ok(())
    }

    pub fn compose_config(&self) -> ComposeConfig {
        ComposeConfig {
            quality: Quality::new(self.compose.quality),
        }
    }

    pub fn save_config(&self) -> SaveConfig {
        SaveConfig {
            title: self.gallery.title.clone(),
            description: self.gallery.description.clone(),
        }
    }
}

/// Overlay composition settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ComposeSection {
    /// JPEG encoding quality (1 = worst, 100 = best).
    pub quality: u32,
}

impl Default for ComposeSection {
    fn default() -> Self {
        Self { quality: 100 }
    }
}

/// Gallery insertion settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GallerySection {
    /// Directory holding gallery JPEGs and `index.json`.
    pub directory: PathBuf,
    /// Title recorded with every insert; also the file name stem.
    pub title: String,
    /// Description recorded with every insert.
    pub description: String,
    /// JPEG encoding quality for gallery copies.
    pub quality: u32,
}

impl Default for GallerySection {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("gallery"),
            title: "2T2000s".to_string(),
            description: "Taken from the 2T200s app".to_string(),
            quality: 90,
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(ComposerConfig::default()).expect("default config must serialize")
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
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<ComposerConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ComposerConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the composer config.
///
/// An explicit path must exist. Without one, [`DEFAULT_CONFIG_FILE`] in the
/// working directory is optional.
pub fn load_config(explicit: Option<&Path>) -> Result<ComposerConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = match explicit {
        Some(path) => Some(
            load_raw_config(path)?.ok_or_else(|| {
                ConfigError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("config file not found: {}", path.display()),
                ))
            })?,
        ),
        None => load_raw_config(Path::new(DEFAULT_CONFIG_FILE))?,
    };
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `composer.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Overlay Composer Configuration
# ==============================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# addOverlayToImage
# ---------------------------------------------------------------------------
[compose]
# JPEG quality used when the composited photo replaces the original (1-100).
quality = 100

# ---------------------------------------------------------------------------
# saveImage
# ---------------------------------------------------------------------------
[gallery]
# Directory holding gallery photos and index.json. Created on first save.
directory = "gallery"

# Title and description recorded with every saved photo.
# The title also becomes the file name stem.
title = "2T2000s"
description = "Taken from the 2T200s app"

# JPEG quality for gallery copies (1-100).
quality = 90
"##
}
