//! Configuration builder
//!
//! Merges configuration from files and CLI arguments.

use crate::config::{Config, ConfigFile};
use crate::error::ConfigError;

/// Builder for merging configuration sources
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Load configuration from a file
    ///
    /// An explicitly named file must exist and parse. Without a name the
    /// default locations are searched and defaults kept when none is found.
    pub fn with_file(mut self, path: Option<&str>) -> Result<Self, ConfigError> {
        let file_config = match path {
            Some(path) => Some(ConfigFile::load(path)?),
            None => ConfigFile::load_default(),
        };

        if let Some(cfg) = file_config {
            self.config = cfg;
        }

        Ok(self)
    }

    /// Override with CLI dry-run flag
    pub fn with_dry_run(mut self, dry_run: Option<bool>) -> Self {
        if let Some(d) = dry_run {
            self.config.general.dry_run = d;
        }
        self
    }

    /// Override with CLI store path
    pub fn with_store_path(mut self, path: Option<String>) -> Self {
        if let Some(p) = path {
            self.config.store.path = Some(p);
        }
        self
    }

    /// Override with CLI namespace
    pub fn with_namespace(mut self, namespace: Option<String>) -> Self {
        if let Some(ns) = namespace {
            self.config.general.namespace = ns;
        }
        self
    }

    /// Build the final configuration
    pub fn build(self) -> Result<Config, ConfigError> {
        let config = self.config;

        if config.general.namespace.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "general.namespace".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        if config.notifications.check_hour > 23 {
            return Err(ConfigError::InvalidValue {
                key: "notifications.check_hour".to_string(),
                message: format!("{} is not an hour of the day", config.notifications.check_hour),
            });
        }

        Ok(config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
