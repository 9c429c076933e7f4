//! Watcher settings on disk
//!
//! Settings are read from the first readable TOML file in a fixed search
//! order. Missing sections and keys fall back to their defaults.

use crate::config::Config;
use crate::error::ConfigError;

use std::path::{Path, PathBuf};

/// Locates and parses `devwatch.toml`
pub struct ConfigFile;

impl ConfigFile {
    /// Parse one settings file, failing if it cannot be read
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound(path.display().to_string()))?;

        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// First usable file of the search order
    ///
    /// Unparsable files are skipped with a warning and the search goes on.
    pub fn load_default() -> Option<Config> {
        Self::default_paths()
            .into_iter()
            .filter(|path| path.exists())
            .find_map(|path| match Self::load(&path) {
                Ok(config) => {
                    log::info!("Loaded config from {}", path.display());
                    Some(config)
                }
                Err(e) => {
                    log::warn!("Ignoring {}: {}", path.display(), e);
                    None
                }
            })
    }

    /// Search order: system file, per-user file, then the working directory
    pub fn default_paths() -> Vec<PathBuf> {
        let user = dirs::config_dir().map(|dir| dir.join("devwatch").join("config.toml"));

        std::iter::once(PathBuf::from("/etc/devwatch/config.toml"))
            .chain(user)
            .chain(["devwatch.toml", ".devwatch.toml"].map(PathBuf::from))
            .collect()
    }
}
