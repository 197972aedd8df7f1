//! Configuration for the config manager

use std::path::PathBuf;
use std::sync::Arc;

/// Default file name of the rendered configuration
pub const DEFAULT_FILE_NAME: &str = "keystone.conf";

/// Directory under the system config dir used when none is given
pub const DEFAULT_DIR_NAME: &str = "keystone";

// =============================================================================
// Environment Source
// =============================================================================

/// Source of environment variables
///
/// Allows tests to inject variables without touching the process environment.
pub trait EnvSource: Send + Sync {
    fn var(&self, key: &str) -> Result<String, std::env::VarError>;
}

/// Reads from the real process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultEnvSource;

impl EnvSource for DefaultEnvSource {
    fn var(&self, key: &str) -> Result<String, std::env::VarError> {
        std::env::var(key)
    }
}

// =============================================================================
// Settings Config
// =============================================================================

/// Configuration for initializing the [`crate::ConfigManager`]
pub struct SettingsConfig {
    /// Directory the rendered file is written to
    pub config_dir: PathBuf,

    /// File name of the rendered file (e.g., "keystone.conf")
    pub file_name: String,

    /// Comment lines written above the first section
    pub header: Vec<String>,

    /// Environment variable prefix for setting overrides (e.g., "KEYSTONE" -> KEYSTONE_LDAP_URL)
    /// If None, env var overrides are disabled
    pub env_prefix: Option<String>,

    /// Where environment overrides are read from
    pub env_source: Arc<dyn EnvSource>,

    /// Reject resolved sets that violate the schema before writing
    pub validate: bool,
}

impl Default for SettingsConfig {
    fn default() -> Self {
        SettingsConfigBuilder::new().build()
    }
}

impl std::fmt::Debug for SettingsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsConfig")
            .field("config_dir", &self.config_dir)
            .field("file_name", &self.file_name)
            .field("header", &self.header)
            .field("env_prefix", &self.env_prefix)
            .field("validate", &self.validate)
            .finish_non_exhaustive()
    }
}

impl SettingsConfig {
    /// Get the full path to the rendered file
    pub fn output_path(&self) -> PathBuf {
        self.config_dir.join(&self.file_name)
    }

    /// Create a new builder for SettingsConfig
    ///
    /// # Example
    /// ```rust
    /// use ldapconf::SettingsConfig;
    ///
    /// let config = SettingsConfig::builder()
    ///     .config_dir("/etc/keystone")
    ///     .build();
    /// assert!(config.output_path().ends_with("keystone.conf"));
    /// ```
    pub fn builder() -> SettingsConfigBuilder {
        SettingsConfigBuilder::new()
    }
}

/// Builder for creating SettingsConfig with a fluent API
#[derive(Clone)]
pub struct SettingsConfigBuilder {
    config_dir: Option<PathBuf>,
    file_name: String,
    header: Vec<String>,
    env_prefix: Option<String>,
    env_source: Arc<dyn EnvSource>,
    validate: bool,
}

impl std::fmt::Debug for SettingsConfigBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsConfigBuilder")
            .field("config_dir", &self.config_dir)
            .field("file_name", &self.file_name)
            .field("header", &self.header)
            .field("env_prefix", &self.env_prefix)
            .field("validate", &self.validate)
            .finish_non_exhaustive()
    }
}

impl Default for SettingsConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsConfigBuilder {
    pub fn new() -> Self {
        Self {
            config_dir: None,
            file_name: DEFAULT_FILE_NAME.into(),
            header: Vec::new(),
            env_prefix: None,
            env_source: Arc::new(DefaultEnvSource),
            validate: true,
        }
    }

    /// Set the configuration directory
    ///
    /// Supports `~` expansion for home directory.
    pub fn config_dir(mut self, path: impl Into<PathBuf>) -> Self {
        let path: PathBuf = path.into();
        let expanded = if path.starts_with("~") {
            match dirs::home_dir() {
                Some(home) => home.join(path.strip_prefix("~").unwrap_or(&path)),
                None => path,
            }
        } else {
            path
        };
        self.config_dir = Some(expanded);
        self
    }

    /// Set the rendered file name (default: "keystone.conf")
    pub fn file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = name.into();
        self
    }

    /// Add a comment line written above the first section
    pub fn header_line(mut self, line: impl Into<String>) -> Self {
        self.header.push(line.into());
        self
    }

    /// Enable environment variable overrides
    ///
    /// The format is: `{PREFIX}_{SECTION}_{NAME}` (all uppercase)
    ///
    /// # Example
    /// ```rust
    /// use ldapconf::SettingsConfig;
    ///
    /// let config = SettingsConfig::builder()
    ///     .with_env_prefix("KEYSTONE")
    ///     .build();
    ///
    /// // Now KEYSTONE_LDAP_URL=ldaps://ldap.example.com overrides "ldap/url"
    /// assert_eq!(config.env_prefix.as_deref(), Some("KEYSTONE"));
    /// ```
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    /// Read environment overrides from a custom source
    pub fn env_source(mut self, source: impl EnvSource + 'static) -> Self {
        self.env_source = Arc::new(source);
        self
    }

    /// Write resolved sets without schema validation
    pub fn skip_validation(mut self) -> Self {
        self.validate = false;
        self
    }

    /// Build the SettingsConfig
    ///
    /// If `config_dir` is not set, uses `<system config dir>/keystone`.
    pub fn build(self) -> SettingsConfig {
        let config_dir = self.config_dir.unwrap_or_else(|| {
            dirs::config_dir()
                .map(|d| d.join(DEFAULT_DIR_NAME))
                .unwrap_or_else(|| PathBuf::from("."))
        });

        SettingsConfig {
            config_dir,
            file_name: self.file_name,
            header: self.header,
            env_prefix: self.env_prefix,
            env_source: self.env_source,
            validate: self.validate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_basic() {
        let config = SettingsConfig::builder().build();

        assert_eq!(config.file_name, "keystone.conf");
        assert!(config.env_prefix.is_none());
        assert!(config.validate);
    }

    #[test]
    fn test_builder_with_options() {
        let config = SettingsConfig::builder()
            .config_dir("/tmp/keystone")
            .file_name("ldap.conf")
            .header_line("Managed by ldapconf")
            .with_env_prefix("KS")
            .skip_validation()
            .build();

        assert_eq!(config.config_dir, PathBuf::from("/tmp/keystone"));
        assert_eq!(config.output_path(), PathBuf::from("/tmp/keystone/ldap.conf"));
        assert_eq!(config.header, vec!["Managed by ldapconf".to_string()]);
        assert_eq!(config.env_prefix.as_deref(), Some("KS"));
        assert!(!config.validate);
    }

    #[test]
    fn test_tilde_expansion() {
        let config = SettingsConfig::builder().config_dir("~/keystone").build();
        if let Some(home) = dirs::home_dir() {
            assert_eq!(config.config_dir, home.join("keystone"));
        }
    }
}
