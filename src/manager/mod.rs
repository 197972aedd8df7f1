//! Render pipeline
//!
//! [`ConfigManager`] resolves overrides, writes the target file and verifies
//! what ended up on disk.

mod builder;

pub use builder::ConfigManagerBuilder;

use crate::config::SettingsConfig;
use crate::error::Result;
use crate::resolver::SettingsResolver;
use crate::set::ConfigurationSet;
use crate::storage::{IniStorage, StorageBackend};
use crate::verify::{self, VerificationReport};
use log::info;
use std::path::{Path, PathBuf};

/// Resolves, renders and verifies the LDAP identity backend configuration.
///
/// # Example
///
/// ```rust,no_run
/// use ldapconf::{ConfigManager, ConfigurationSet};
///
/// let manager = ConfigManager::builder()
///     .config_dir("/etc/keystone")
///     .build();
///
/// let overrides = ConfigurationSet::new()
///     .with("ldap", "url", "ldaps://ldap.example.com")
///     .with("ldap", "use_tls", true);
///
/// let report = manager.render_and_verify(&overrides)?;
/// assert!(report.is_ok());
/// # Ok::<(), ldapconf::Error>(())
/// ```
pub struct ConfigManager {
    config: SettingsConfig,
    resolver: SettingsResolver,
    storage: IniStorage,
}

impl ConfigManager {
    pub fn new(config: SettingsConfig) -> Self {
        let resolver =
            SettingsResolver::with_env(config.env_prefix.clone(), config.env_source.clone());
        let storage = IniStorage::with_header(config.header.clone());
        Self {
            config,
            resolver,
            storage,
        }
    }

    pub fn builder() -> ConfigManagerBuilder {
        ConfigManagerBuilder::new()
    }

    pub fn config(&self) -> &SettingsConfig {
        &self.config
    }

    pub fn resolver(&self) -> &SettingsResolver {
        &self.resolver
    }

    /// Path of the rendered file
    pub fn output_path(&self) -> PathBuf {
        self.config.output_path()
    }

    /// Resolve `overrides` (validating unless disabled) without writing
    pub fn resolve(&self, overrides: &ConfigurationSet) -> Result<ConfigurationSet> {
        if self.config.validate {
            self.resolver.resolve_validated(overrides)
        } else {
            Ok(self.resolver.resolve(overrides))
        }
    }

    /// Resolve `overrides` and write the target file
    pub fn render(&self, overrides: &ConfigurationSet) -> Result<PathBuf> {
        let resolved = self.resolve(overrides)?;
        self.write(&resolved)
    }

    /// Render, then verify the file on disk against the resolved set
    pub fn render_and_verify(&self, overrides: &ConfigurationSet) -> Result<VerificationReport> {
        let resolved = self.resolve(overrides)?;
        let path = self.write(&resolved)?;
        verify::verify_file(&path, &resolved)
    }

    /// Verify the current file against `expected`
    pub fn verify(&self, expected: &ConfigurationSet) -> Result<VerificationReport> {
        verify::verify_file(&self.output_path(), expected)
    }

    /// Read the current file back
    pub fn load_rendered(&self) -> Result<ConfigurationSet> {
        self.storage.read(&self.output_path())
    }

    /// Load overrides from a JSON (or TOML/YAML) file and render them
    pub fn render_from_file(&self, overrides_path: &Path) -> Result<PathBuf> {
        let overrides = crate::storage::load_overrides(overrides_path)?;
        self.render(&overrides)
    }

    fn write(&self, resolved: &ConfigurationSet) -> Result<PathBuf> {
        let path = self.output_path();
        self.storage.write(&path, resolved)?;
        info!(
            "Rendered {} settings to {}",
            resolved.len(),
            path.display()
        );
        Ok(path)
    }
}
