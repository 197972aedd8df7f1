//! Resolved configuration sets

use crate::config::{SettingKey, SettingValue};
use crate::error::Result;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

/// Nested `section -> name -> value` form used by serde
pub type SectionMap = BTreeMap<String, BTreeMap<String, SettingValue>>;

/// Mapping from [`SettingKey`] to [`SettingValue`]
///
/// Keys are unique. Iteration is ordered by section, then name, which makes
/// rendering deterministic. The same type carries overrides, resolved sets
/// and expected values for verification.
///
/// ```
/// use ldapconf::{ConfigurationSet, SettingValue};
///
/// let overrides = ConfigurationSet::new()
///     .with("ldap", "url", "ldaps://ldap.example.com")
///     .with("ldap", "use_tls", true);
///
/// assert_eq!(overrides.len(), 2);
/// assert_eq!(overrides.lookup("ldap", "use_tls"), Some(&SettingValue::Bool(true)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigurationSet {
    entries: BTreeMap<SettingKey, SettingValue>,
}

impl ConfigurationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    #[must_use]
    pub fn with(
        mut self,
        section: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<SettingValue>,
    ) -> Self {
        self.insert(SettingKey::new(section, name), value);
        self
    }

    /// Insert or replace a value, returning the previous one
    pub fn insert(&mut self, key: SettingKey, value: impl Into<SettingValue>) -> Option<SettingValue> {
        self.entries.insert(key, value.into())
    }

    /// Insert using a `section/name` string key
    pub fn insert_str(&mut self, key: &str, value: impl Into<SettingValue>) -> Result<Option<SettingValue>> {
        let key: SettingKey = key.parse()?;
        Ok(self.insert(key, value))
    }

    pub fn get(&self, key: &SettingKey) -> Option<&SettingValue> {
        self.entries.get(key)
    }

    pub fn lookup(&self, section: &str, name: &str) -> Option<&SettingValue> {
        self.entries.get(&SettingKey::new(section, name))
    }

    pub fn contains_key(&self, key: &SettingKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn remove(&mut self, key: &SettingKey) -> Option<SettingValue> {
        self.entries.remove(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SettingKey, &SettingValue)> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &SettingKey> {
        self.entries.keys()
    }

    /// Distinct section names in order
    pub fn sections(&self) -> Vec<&str> {
        let mut sections: Vec<&str> = self.entries.keys().map(SettingKey::section).collect();
        sections.dedup();
        sections
    }

    /// Entries of one section as `(name, value)` pairs
    pub fn section<'a>(&'a self, section: &'a str) -> impl Iterator<Item = (&'a str, &'a SettingValue)> {
        self.entries
            .iter()
            .filter(move |(k, _)| k.section() == section)
            .map(|(k, v)| (k.name(), v))
    }

    /// Convert to the nested `section -> name -> value` form
    pub fn to_sections(&self) -> SectionMap {
        let mut nested = SectionMap::new();
        for (key, value) in &self.entries {
            nested
                .entry(key.section().to_string())
                .or_default()
                .insert(key.name().to_string(), value.clone());
        }
        nested
    }

    /// Build from the nested `section -> name -> value` form
    pub fn from_sections(nested: SectionMap) -> Self {
        nested
            .into_iter()
            .flat_map(|(section, names)| {
                names
                    .into_iter()
                    .map(move |(name, value)| (SettingKey::new(section.clone(), name), value))
            })
            .collect()
    }
}

impl FromIterator<(SettingKey, SettingValue)> for ConfigurationSet {
    fn from_iter<I: IntoIterator<Item = (SettingKey, SettingValue)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl Extend<(SettingKey, SettingValue)> for ConfigurationSet {
    fn extend<I: IntoIterator<Item = (SettingKey, SettingValue)>>(&mut self, iter: I) {
        self.entries.extend(iter);
    }
}

impl IntoIterator for ConfigurationSet {
    type Item = (SettingKey, SettingValue);
    type IntoIter = std::collections::btree_map::IntoIter<SettingKey, SettingValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a ConfigurationSet {
    type Item = (&'a SettingKey, &'a SettingValue);
    type IntoIter = std::collections::btree_map::Iter<'a, SettingKey, SettingValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl Serialize for ConfigurationSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_sections().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ConfigurationSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        SectionMap::deserialize(deserializer).map(Self::from_sections)
    }
}
