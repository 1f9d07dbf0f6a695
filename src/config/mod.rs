// SPDX-License-Identifier: MPL-2.0
//! This module handles the gallery's configuration, including loading and saving
//! user preferences to a `settings.toml` file.
//!
//! # Configuration Sections
//!
//! - `[gallery]` - Initial sort key and kind filter of the view
//! - `[viewport]` - Lazy loading margin and video playback threshold
//! - `[scan]` - Folder discovery settings
//!
//! Out-of-range numbers are clamped when read through the accessors, so a
//! hand-edited file can never put the gallery in an invalid state.
//!
//! # Path Resolution
//!
//! The config file location can be customized for testing or portable deployments:
//! 1. Use `load_from_path()`/`save_to_path()` with explicit path
//! 2. Set `LENS_GALLERY_CONFIG_DIR` environment variable
//! 3. Falls back to platform-specific config directory
//!
//! # Examples
//!
//! ```no_run
//! use lens_gallery::config;
//! use lens_gallery::domain::media::SortKey;
//!
//! let (mut config, _warning) = config::load();
//! config.gallery.sort = SortKey::DateNewest;
//! config::save(&config).expect("Failed to save config");
//! ```

pub mod defaults;

pub use defaults::*;

use crate::application::viewport::ViewportConfig;
use crate::domain::media::{KindFilter, SortKey};
use crate::error::{Error, Result};
use crate::paths::AppDir;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "settings.toml";

/// Warning key returned by [`load`] when the settings file is unreadable.
pub const LOAD_ERROR_WARNING: &str = "config-load-error";

// =============================================================================
// Section Structs
// =============================================================================

/// Initial presentation of the gallery view.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct GalleryConfig {
    #[serde(default)]
    pub sort: SortKey,

    #[serde(default)]
    pub filter: KindFilter,
}

/// Viewport-driven loading and playback.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ViewportSection {
    /// Margin around the viewport in pixels inside which content is loaded.
    #[serde(default = "default_proximity_margin_px")]
    pub proximity_margin_px: f32,

    /// Visible fraction at which videos start playing (0.0 to 1.0).
    #[serde(default = "default_playback_threshold")]
    pub playback_threshold: f32,
}

impl Default for ViewportSection {
    fn default() -> Self {
        Self {
            proximity_margin_px: DEFAULT_PROXIMITY_MARGIN_PX,
            playback_threshold: DEFAULT_PLAYBACK_THRESHOLD,
        }
    }
}

impl ViewportSection {
    /// Returns the loader thresholds, clamped to their valid ranges.
    #[must_use]
    pub fn to_viewport_config(&self) -> ViewportConfig {
        ViewportConfig {
            proximity_margin_px: clamp_or_default(
                self.proximity_margin_px,
                MIN_PROXIMITY_MARGIN_PX,
                MAX_PROXIMITY_MARGIN_PX,
                DEFAULT_PROXIMITY_MARGIN_PX,
            ),
            playback_threshold: clamp_or_default(
                self.playback_threshold,
                MIN_PLAYBACK_THRESHOLD,
                MAX_PLAYBACK_THRESHOLD,
                DEFAULT_PLAYBACK_THRESHOLD,
            ),
        }
    }
}

/// Folder discovery settings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScanConfig {
    /// Descriptors per batch handed to the catalog.
    #[serde(default = "default_scan_batch_size")]
    pub batch_size: usize,

    /// Whether symbolic links are followed while walking folders.
    #[serde(default)]
    pub follow_links: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_SCAN_BATCH_SIZE,
            follow_links: false,
        }
    }
}

impl ScanConfig {
    /// Batch size clamped to its valid range.
    #[must_use]
    pub fn effective_batch_size(&self) -> usize {
        self.batch_size
            .clamp(MIN_SCAN_BATCH_SIZE, MAX_SCAN_BATCH_SIZE)
    }
}

// =============================================================================
// Main Config Struct (Sectioned)
// =============================================================================

/// Gallery configuration with logical sections.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub gallery: GalleryConfig,

    #[serde(default)]
    pub viewport: ViewportSection,

    #[serde(default)]
    pub scan: ScanConfig,
}

// =============================================================================
// Default Value Functions
// =============================================================================

fn default_proximity_margin_px() -> f32 {
    DEFAULT_PROXIMITY_MARGIN_PX
}

fn default_playback_threshold() -> f32 {
    DEFAULT_PLAYBACK_THRESHOLD
}

fn default_scan_batch_size() -> usize {
    DEFAULT_SCAN_BATCH_SIZE
}

fn clamp_or_default(value: f32, min: f32, max: f32, default: f32) -> f32 {
    if value.is_nan() {
        default
    } else {
        value.clamp(min, max)
    }
}

// =============================================================================
// Config Path Resolution
// =============================================================================

/// Returns the config file path with an optional override.
fn get_config_path_with_override(base_dir: Option<PathBuf>) -> Option<PathBuf> {
    AppDir::Config.resolve(base_dir).map(|mut path| {
        path.push(CONFIG_FILE);
        path
    })
}

// =============================================================================
// Load Functions
// =============================================================================

/// Loads the configuration from the default path.
///
/// Returns a tuple of (config, optional_warning). If loading fails, returns
/// default config with [`LOAD_ERROR_WARNING`].
pub fn load() -> (Config, Option<String>) {
    load_with_override(None)
}

/// Loads the configuration from a custom directory.
pub fn load_with_override(base_dir: Option<PathBuf>) -> (Config, Option<String>) {
    if let Some(path) = get_config_path_with_override(base_dir) {
        if path.exists() {
            match load_from_path(&path) {
                Ok(config) => return (config, None),
                Err(err) => {
                    tracing::warn!(path = %path.display(), %err, "falling back to default settings");
                    return (Config::default(), Some(LOAD_ERROR_WARNING.to_string()));
                }
            }
        }
    }
    (Config::default(), None)
}

/// Loads configuration from a specific path.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

// =============================================================================
// Save Functions
// =============================================================================

/// Saves the configuration to the default path.
pub fn save(config: &Config) -> Result<()> {
    save_with_override(config, None)
}

/// Saves the configuration to a custom directory.
///
/// # Errors
///
/// Returns [`Error::Config`] when no config directory can be resolved, or
/// the write failure.
pub fn save_with_override(config: &Config, base_dir: Option<PathBuf>) -> Result<()> {
    save_to_resolved(config, get_config_path_with_override(base_dir))
}

fn save_to_resolved(config: &Config, path: Option<PathBuf>) -> Result<()> {
    let path =
        path.ok_or_else(|| Error::Config("config directory unavailable".to_string()))?;
    save_to_path(config, &path)
}

/// Saves configuration to a specific path.
pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config).map_err(Error::from)?;
    fs::write(path, content)?;
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
