//! Cross-platform application paths using the `dirs` crate.
//!
//! Everything lives in one config directory:
//!
//!   Windows: %APPDATA%\typemagic\
//!   macOS:   ~/Library/Application Support/typemagic/
//!   Linux:   ~/.config/typemagic/

use std::path::{Path, PathBuf};

/// Holds all resolved application directory/file paths.
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Directory holding every file below.
    pub config_dir: PathBuf,
    /// Full path to `settings.toml`.
    pub settings_file: PathBuf,
    /// Full path to `secrets.toml` (API keys, mode 0600 on Unix).
    pub secrets_file: PathBuf,
    /// Full path to `stats.json`.
    pub stats_file: PathBuf,
}

impl AppPaths {
    const APP_NAME: &'static str = "typemagic";

    /// Resolves all paths using the `dirs` crate.
    ///
    /// Falls back to the current directory if the platform cannot provide a
    /// standard path.
    pub fn new() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);
        Self::in_dir(&config_dir)
    }

    /// Paths rooted at an explicit directory.
    pub fn in_dir(config_dir: &Path) -> Self {
        Self {
            config_dir: config_dir.to_path_buf(),
            settings_file: config_dir.join("settings.toml"),
            secrets_file: config_dir.join("secrets.toml"),
            stats_file: config_dir.join("stats.json"),
        }
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}
