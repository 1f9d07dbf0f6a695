// SPDX-License-Identifier: MPL-2.0
//! Locations of the gallery's own files.
//!
//! The data directory holds `folders.cbor`; the config directory holds
//! `settings.toml`. Both resolve the same way, first match wins:
//!
//! 1. an explicit override handed to [`AppDir::resolve`] (tests, embedders)
//! 2. the `--data-dir` / `--config-dir` flags, see [`init_cli_overrides`]
//! 3. `LENS_GALLERY_DATA_DIR` / `LENS_GALLERY_CONFIG_DIR`
//! 4. the platform directory from `dirs`, with `LensGallery` appended

use std::path::PathBuf;
use std::sync::OnceLock;

const APP_NAME: &str = "LensGallery";

/// Environment variable naming the data directory.
pub const ENV_DATA_DIR: &str = "LENS_GALLERY_DATA_DIR";

/// Environment variable naming the config directory.
pub const ENV_CONFIG_DIR: &str = "LENS_GALLERY_CONFIG_DIR";

/// Directory overrides from the command line, fixed for the process.
#[derive(Debug, Default)]
struct CliOverrides {
    data: Option<PathBuf>,
    config: Option<PathBuf>,
}

static CLI_OVERRIDES: OnceLock<CliOverrides> = OnceLock::new();

/// Records the `--data-dir` and `--config-dir` flags.
///
/// Must run before the first directory is resolved. Returns `false` if the
/// overrides were already set; the first call wins.
pub fn init_cli_overrides(data_dir: Option<String>, config_dir: Option<String>) -> bool {
    CLI_OVERRIDES
        .set(CliOverrides {
            data: data_dir.map(PathBuf::from),
            config: config_dir.map(PathBuf::from),
        })
        .is_ok()
}

/// One of the gallery's application directories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppDir {
    /// Linked folder list.
    Data,
    /// User settings.
    Config,
}

impl AppDir {
    #[must_use]
    pub fn env_var(self) -> &'static str {
        match self {
            AppDir::Data => ENV_DATA_DIR,
            AppDir::Config => ENV_CONFIG_DIR,
        }
    }

    fn cli_override(self) -> Option<PathBuf> {
        let overrides = CLI_OVERRIDES.get()?;
        match self {
            AppDir::Data => overrides.data.clone(),
            AppDir::Config => overrides.config.clone(),
        }
    }

    fn env_override(self) -> Option<PathBuf> {
        std::env::var_os(self.env_var())
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
    }

    fn platform_default(self) -> Option<PathBuf> {
        let base = match self {
            AppDir::Data => dirs::data_dir(),
            AppDir::Config => dirs::config_dir(),
        };
        base.map(|base| base.join(APP_NAME))
    }

    /// Resolves the directory. `None` only when no override is set and the
    /// platform has no such directory.
    ///
    /// Platform defaults for [`AppDir::Data`]:
    /// - Linux: `~/.local/share/LensGallery/`
    /// - macOS: `~/Library/Application Support/LensGallery/`
    /// - Windows: `C:\Users\<User>\AppData\Roaming\LensGallery\`
    #[must_use]
    pub fn resolve(self, override_path: Option<PathBuf>) -> Option<PathBuf> {
        override_path
            .or_else(|| self.cli_override())
            .or_else(|| self.env_override())
            .or_else(|| self.platform_default())
    }
}
