//! Environment variable handling for settings
//!
//! Helper struct to encapsulate logic for overriding settings via env vars.

use crate::config::{EnvSource, NULL_LITERAL, SettingKey, SettingType, SettingValue};
use std::sync::Arc;

/// Handles environment variable lookups and parsing
pub struct EnvironmentHandler {
    prefix: Option<String>,
    source: Arc<dyn EnvSource>,
}

impl EnvironmentHandler {
    pub fn new(prefix: Option<String>, source: Arc<dyn EnvSource>) -> Self {
        Self { prefix, source }
    }

    /// Get the environment variable name for a setting key
    ///
    /// Returns None if env var overrides are disabled.
    pub fn get_env_var_name(&self, key: &SettingKey) -> Option<String> {
        self.prefix.as_deref().map(|prefix| key.env_var_name(prefix))
    }

    /// Value of the environment override for `key`, if one is set
    ///
    /// Only toggles turn `true`/`false` into booleans; other settings keep
    /// the raw text. An empty variable unsets the value, `None` nulls it.
    pub fn get_env_override(
        &self,
        key: &SettingKey,
        setting_type: SettingType,
    ) -> Option<SettingValue> {
        let env_var_name = self.get_env_var_name(key)?;
        let raw = self.source.var(&env_var_name).ok()?;

        Some(match setting_type {
            SettingType::Toggle => SettingValue::parse_loose(&raw),
            _ if raw == NULL_LITERAL => SettingValue::Null,
            _ => SettingValue::from_rendered(&raw),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct MapEnv(HashMap<String, String>);

    impl EnvSource for MapEnv {
        fn var(&self, key: &str) -> Result<String, std::env::VarError> {
            self.0.get(key).cloned().ok_or(std::env::VarError::NotPresent)
        }
    }

    fn handler(prefix: Option<&str>, vars: &[(&str, &str)]) -> EnvironmentHandler {
        let map = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        EnvironmentHandler::new(prefix.map(String::from), Arc::new(MapEnv(map)))
    }

    #[test]
    fn test_disabled_without_prefix() {
        let env = handler(None, &[("KEYSTONE_LDAP_URL", "ldaps://x")]);
        let key = SettingKey::new("ldap", "url");

        assert!(env.get_env_var_name(&key).is_none());
        assert!(env.get_env_override(&key, SettingType::Url).is_none());
    }

    #[test]
    fn test_override_is_parsed() {
        let env = handler(
            Some("keystone"),
            &[("KEYSTONE_LDAP_USE_TLS", "true"), ("KEYSTONE_LDAP_PASSWORD", "s3cret")],
        );

        assert_eq!(
            env.get_env_override(&SettingKey::new("ldap", "use_tls"), SettingType::Toggle),
            Some(SettingValue::Bool(true))
        );
        assert_eq!(
            env.get_env_override(&SettingKey::new("ldap", "password"), SettingType::Text),
            Some(SettingValue::text("s3cret"))
        );
        assert!(
            env.get_env_override(&SettingKey::new("ldap", "url"), SettingType::Url)
                .is_none()
        );
    }

    #[test]
    fn test_text_settings_keep_boolean_looking_values() {
        let env = handler(
            Some("keystone"),
            &[
                ("KEYSTONE_LDAP_USER_ID_ATTRIBUTE", "true"),
                ("KEYSTONE_LDAP_PASSWORD", "None"),
                ("KEYSTONE_LDAP_USER_FILTER", ""),
            ],
        );

        assert_eq!(
            env.get_env_override(&SettingKey::new("ldap", "user_id_attribute"), SettingType::Text),
            Some(SettingValue::text("true"))
        );
        assert_eq!(
            env.get_env_override(&SettingKey::new("ldap", "password"), SettingType::Text),
            Some(SettingValue::Null)
        );
        assert_eq!(
            env.get_env_override(&SettingKey::new("ldap", "user_filter"), SettingType::Text),
            Some(SettingValue::Unset)
        );
    }
}
