//! Builder for ConfigManager
//!
//! This module contains [`ConfigManagerBuilder`] which provides a fluent API
//! for creating a [`ConfigManager`](super::ConfigManager).

use crate::config::{EnvSource, SettingsConfigBuilder};
use std::path::PathBuf;

use super::ConfigManager;

/// Builder for creating a [`ConfigManager`] with a fluent API.
///
/// # Example
///
/// ```rust,no_run
/// use ldapconf::ConfigManager;
///
/// let manager = ConfigManager::builder()
///     .config_dir("/etc/keystone")
///     .with_env_prefix("KEYSTONE")
///     .header_line("Managed by ldapconf, local edits are overwritten")
///     .build();
/// ```
#[derive(Debug, Default)]
pub struct ConfigManagerBuilder {
    config_builder: SettingsConfigBuilder,
}

impl ConfigManagerBuilder {
    pub fn new() -> Self {
        Self {
            config_builder: SettingsConfigBuilder::new(),
        }
    }

    /// Set the configuration directory.
    ///
    /// Supports `~` expansion for home directory.
    pub fn config_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_builder = self.config_builder.config_dir(path);
        self
    }

    /// Set the rendered file name (default: "keystone.conf").
    pub fn file_name(mut self, name: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.file_name(name);
        self
    }

    /// Add a comment line written above the first section.
    pub fn header_line(mut self, line: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.header_line(line);
        self
    }

    /// Enable environment variable overrides.
    ///
    /// The format is: `{PREFIX}_{SECTION}_{NAME}` (all uppercase)
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.with_env_prefix(prefix);
        self
    }

    /// Read environment overrides from a custom source.
    pub fn env_source(mut self, source: impl EnvSource + 'static) -> Self {
        self.config_builder = self.config_builder.env_source(source);
        self
    }

    /// Write resolved sets without schema validation.
    pub fn skip_validation(mut self) -> Self {
        self.config_builder = self.config_builder.skip_validation();
        self
    }

    /// Build the ConfigManager.
    pub fn build(self) -> ConfigManager {
        ConfigManager::new(self.config_builder.build())
    }
}
