//! Section/name keys

use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Address of a single setting: an INI section plus a key name within it.
///
/// Parses from `section/name` or `section.name` and always displays as
/// `section/name`. Ordering is by section, then name, so rendering a set
/// keyed by `SettingKey` groups sections together.
///
/// ```
/// use ldapconf::SettingKey;
///
/// let key: SettingKey = "ldap/url".parse().unwrap();
/// assert_eq!(key.section(), "ldap");
/// assert_eq!(key.name(), "url");
/// assert_eq!(key.to_string(), "ldap/url");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SettingKey {
    section: String,
    name: String,
}

impl SettingKey {
    pub fn new(section: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            section: section.into(),
            name: name.into(),
        }
    }

    pub fn section(&self) -> &str {
        &self.section
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Environment variable name for this key under `prefix`
    ///
    /// Format: `{PREFIX}_{SECTION}_{NAME}` (all uppercase)
    pub fn env_var_name(&self, prefix: &str) -> String {
        format!(
            "{}_{}_{}",
            prefix.to_uppercase(),
            self.section.to_uppercase(),
            self.name.to_uppercase()
        )
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.section, self.name)
    }
}

impl FromStr for SettingKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (section, name) = s
            .split_once('/')
            .or_else(|| s.split_once('.'))
            .ok_or_else(|| Error::InvalidKey(s.to_string()))?;

        let section = section.trim();
        let name = name.trim();
        if section.is_empty() || name.is_empty() || name.contains('/') {
            return Err(Error::InvalidKey(s.to_string()));
        }

        Ok(Self::new(section, name))
    }
}

impl Serialize for SettingKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SettingKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
