//! Settings resolution
//!
//! [`SettingsResolver`] merges overrides into the defaults table. Precedence,
//! lowest first: defaults, explicit overrides, environment overrides.

mod env;

pub use env::EnvironmentHandler;

use crate::config::{
    DefaultEnvSource, EnvSource, SettingKey, SettingMetadata, SettingType, SettingValue,
};
use crate::defaults;
use crate::error::{Error, Result, SettingViolation};
use crate::set::ConfigurationSet;
use log::{debug, warn};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Placeholder written to logs and reports instead of secret values
pub const REDACTED: &str = "****";

/// Merges overrides with the built-in defaults
///
/// # Example
///
/// ```rust
/// use ldapconf::{ConfigurationSet, SettingsResolver, SettingValue};
///
/// let resolver = SettingsResolver::new();
/// let resolved = resolver.resolve(&ConfigurationSet::new().with("ldap", "use_tls", true));
///
/// assert_eq!(resolved.lookup("ldap", "use_tls"), Some(&SettingValue::Bool(true)));
/// assert_eq!(resolved.lookup("ldap", "url").unwrap().render(), "ldap://localhost");
/// ```
pub struct SettingsResolver {
    defaults: &'static ConfigurationSet,
    metadata: &'static BTreeMap<SettingKey, SettingMetadata>,
    env: EnvironmentHandler,
}

impl Default for SettingsResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsResolver {
    /// Resolver without environment overrides
    pub fn new() -> Self {
        Self::with_env(None, Arc::new(DefaultEnvSource))
    }

    /// Resolver reading `{PREFIX}_{SECTION}_{NAME}` variables from `source`
    pub fn with_env(prefix: Option<String>, source: Arc<dyn EnvSource>) -> Self {
        Self {
            defaults: defaults::defaults(),
            metadata: defaults::metadata(),
            env: EnvironmentHandler::new(prefix, source),
        }
    }

    /// The defaults table this resolver starts from
    pub fn defaults(&self) -> &ConfigurationSet {
        self.defaults
    }

    /// Merge `overrides` into the defaults
    ///
    /// Every known key ends up with exactly one value. Override keys missing
    /// from the defaults table pass through unchanged. Toggle values given as
    /// text (`"true"`, `"FALSE"`) become booleans so they render `True`/`False`.
    pub fn resolve(&self, overrides: &ConfigurationSet) -> ConfigurationSet {
        let mut resolved = self.defaults.clone();

        for (key, value) in overrides {
            if !self.defaults.contains_key(key) {
                warn!("Override for unknown setting '{key}' passed through");
            }
            debug!("Override {key} = {}", self.display_value(key, value));
            resolved.insert(key.clone(), value.clone());
        }

        for key in self.defaults.keys() {
            if let Some(value) = self.env.get_env_override(key, self.setting_type(key)) {
                debug!(
                    "Environment override {key} = {}",
                    self.display_value(key, &value)
                );
                resolved.insert(key.clone(), value);
            }
        }

        for (key, meta) in self.metadata {
            if meta.setting_type != SettingType::Toggle {
                continue;
            }
            let normalized = match resolved.get(key) {
                Some(value @ SettingValue::Text(_)) => value.as_bool(),
                _ => None,
            };
            if let Some(flag) = normalized {
                resolved.insert(key.clone(), SettingValue::Bool(flag));
            }
        }

        debug!(
            "Resolved {} settings ({} overrides)",
            resolved.len(),
            overrides.len()
        );
        resolved
    }

    /// Check a set against the schema, reporting every violation at once
    ///
    /// Keys without metadata are not checked.
    pub fn validate(&self, set: &ConfigurationSet) -> Result<()> {
        let violations: Vec<SettingViolation> = set
            .iter()
            .filter_map(|(key, value)| {
                let meta = self.metadata.get(key)?;
                meta.validate(value).err().map(|reason| SettingViolation {
                    key: key.clone(),
                    reason,
                })
            })
            .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(Error::InvalidSettings(violations))
        }
    }

    /// [`resolve`](Self::resolve) followed by [`validate`](Self::validate)
    pub fn resolve_validated(&self, overrides: &ConfigurationSet) -> Result<ConfigurationSet> {
        let resolved = self.resolve(overrides);
        self.validate(&resolved)?;
        Ok(resolved)
    }

    fn setting_type(&self, key: &SettingKey) -> SettingType {
        self.metadata
            .get(key)
            .map(|meta| meta.setting_type)
            .unwrap_or_default()
    }

    fn display_value(&self, key: &SettingKey, value: &SettingValue) -> String {
        if self.metadata.get(key).is_some_and(SettingMetadata::is_secret) && !value.is_unset() {
            REDACTED.to_string()
        } else {
            value.render().into_owned()
        }
    }
}
