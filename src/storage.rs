//! Storage backend trait and implementations
//!
//! [`IniStorage`] renders and parses the target configuration file. The JSON,
//! TOML and YAML backends read and write override files shaped
//! `{"section": {"name": value}}`.

use crate::config::SettingValue;
use crate::error::{self, Error, Result};
use crate::set::ConfigurationSet;
use log::debug;
use std::fmt::Write as _;
use std::path::Path;

/// Trait for storage backend implementations
pub trait StorageBackend: Clone + Send + Sync {
    /// File extension for this storage format (e.g., "conf", "json")
    fn extension(&self) -> &str;

    /// Serialize a set to string
    fn serialize(&self, set: &ConfigurationSet) -> Result<String>;

    /// Deserialize a set from string
    fn deserialize(&self, content: &str) -> Result<ConfigurationSet>;

    /// Read and deserialize from file
    fn read(&self, path: &Path) -> Result<ConfigurationSet> {
        let content = error::read_file(path)?;
        self.deserialize(&content)
    }

    /// Serialize and write to file
    ///
    /// Uses atomic write: writes to temp file then renames to prevent corruption.
    fn write(&self, path: &Path, set: &ConfigurationSet) -> Result<()> {
        let content = self.serialize(set)?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                error::create_dir(parent)?;
            }
        }

        let file_name = path.file_name().ok_or_else(|| {
            Error::Config(format!(
                "Invalid path '{}': must have a filename",
                path.display()
            ))
        })?;
        let mut temp_filename = file_name.to_os_string();
        temp_filename.push(".tmp");
        let temp_path = path.with_file_name(temp_filename);

        error::write_file(&temp_path, &content)?;
        std::fs::rename(&temp_path, path).map_err(|e| Error::FileWrite {
            path: path.to_path_buf(),
            source: e,
        })?;

        debug!("Wrote {} settings to {}", set.len(), path.display());
        Ok(())
    }
}

// =============================================================================
// INI Storage Implementation
// =============================================================================

/// INI-style target file (`[section]` headers, `name=value` lines)
#[derive(Clone, Debug, Default)]
pub struct IniStorage {
    header: Vec<String>,
}

impl IniStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Comment lines written above the first section
    pub fn with_header(header: Vec<String>) -> Self {
        Self { header }
    }
}

impl StorageBackend for IniStorage {
    fn extension(&self) -> &str {
        "conf"
    }

    fn serialize(&self, set: &ConfigurationSet) -> Result<String> {
        let mut out = String::new();

        for line in &self.header {
            // Writing to a String cannot fail
            let _ = writeln!(out, "# {line}");
        }
        if !self.header.is_empty() {
            out.push('\n');
        }

        for (i, section) in set.sections().into_iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            let _ = writeln!(out, "[{section}]");
            for (name, value) in set.section(section) {
                let rendered = value.render();
                if rendered.contains('\n') {
                    return Err(Error::Config(format!(
                        "Value of {section}/{name} contains a line break"
                    )));
                }
                let _ = writeln!(out, "{name}={rendered}");
            }
        }

        Ok(out)
    }

    fn deserialize(&self, content: &str) -> Result<ConfigurationSet> {
        let mut set = ConfigurationSet::new();
        let mut section: Option<String> = None;

        for (idx, raw_line) in content.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw_line.trim();

            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            if let Some(rest) = line.strip_prefix('[') {
                let name = rest.strip_suffix(']').map(str::trim).ok_or_else(|| Error::Parse {
                    line: line_no,
                    reason: format!("Malformed section header '{line}'"),
                })?;
                if name.is_empty() {
                    return Err(Error::Parse {
                        line: line_no,
                        reason: "Empty section name".into(),
                    });
                }
                section = Some(name.to_string());
                continue;
            }

            // Values keep their raw bytes after `=`. In the padded `name = value`
            // form only the separator padding is dropped.
            let (raw_name, raw_value) = raw_line.trim_start().split_once('=').ok_or_else(|| Error::Parse {
                line: line_no,
                reason: format!("Expected 'name=value', found '{line}'"),
            })?;
            let current = section.as_deref().ok_or_else(|| Error::Parse {
                line: line_no,
                reason: format!("Key '{}' appears before any section", raw_name.trim()),
            })?;

            let name = raw_name.trim();
            if name.is_empty() {
                return Err(Error::Parse {
                    line: line_no,
                    reason: "Empty key name".into(),
                });
            }
            let value = if raw_name.ends_with(char::is_whitespace) {
                raw_value.trim_start()
            } else {
                raw_value
            };

            set.insert(
                crate::config::SettingKey::new(current, name),
                SettingValue::from_rendered(value),
            );
        }

        Ok(set)
    }
}

// =============================================================================
// JSON Storage Implementation
// =============================================================================

/// JSON storage backend (default for override files)
#[derive(Clone, Debug)]
pub struct JsonStorage {
    /// Pretty print JSON output
    pretty: bool,
}

impl Default for JsonStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonStorage {
    /// Create a new JSON storage backend with pretty printing enabled
    pub fn new() -> Self {
        Self { pretty: true }
    }

    /// Create a compact JSON storage (no pretty printing)
    pub fn compact() -> Self {
        Self { pretty: false }
    }
}

impl StorageBackend for JsonStorage {
    fn extension(&self) -> &str {
        "json"
    }

    fn serialize(&self, set: &ConfigurationSet) -> Result<String> {
        if self.pretty {
            serde_json::to_string_pretty(set).map_err(Error::from)
        } else {
            serde_json::to_string(set).map_err(Error::from)
        }
    }

    fn deserialize(&self, content: &str) -> Result<ConfigurationSet> {
        serde_json::from_str(content).map_err(|e| Error::OverridesParse(e.to_string()))
    }
}

// =============================================================================
// TOML Storage Implementation (toml feature)
// =============================================================================

/// TOML storage backend
///
/// TOML has no null, so `Null` is written as the string `None`.
#[cfg(feature = "toml")]
#[derive(Clone, Debug, Default)]
pub struct TomlStorage;

#[cfg(feature = "toml")]
impl TomlStorage {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(feature = "toml")]
impl StorageBackend for TomlStorage {
    fn extension(&self) -> &str {
        "toml"
    }

    fn serialize(&self, set: &ConfigurationSet) -> Result<String> {
        let nulls_as_text: ConfigurationSet = set
            .iter()
            .map(|(key, value)| {
                let value = match value {
                    SettingValue::Null => SettingValue::text(crate::config::NULL_LITERAL),
                    other => other.clone(),
                };
                (key.clone(), value)
            })
            .collect();
        toml::to_string_pretty(&nulls_as_text).map_err(|e| Error::Config(e.to_string()))
    }

    fn deserialize(&self, content: &str) -> Result<ConfigurationSet> {
        toml::from_str(content).map_err(|e| Error::OverridesParse(e.to_string()))
    }
}

// =============================================================================
// YAML Storage Implementation (yaml feature)
// =============================================================================

/// YAML storage backend
#[cfg(feature = "yaml")]
#[derive(Clone, Debug, Default)]
pub struct YamlStorage;

#[cfg(feature = "yaml")]
impl YamlStorage {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(feature = "yaml")]
impl StorageBackend for YamlStorage {
    fn extension(&self) -> &str {
        "yaml"
    }

    fn serialize(&self, set: &ConfigurationSet) -> Result<String> {
        serde_yaml::to_string(set).map_err(|e| Error::Config(e.to_string()))
    }

    fn deserialize(&self, content: &str) -> Result<ConfigurationSet> {
        serde_yaml::from_str(content).map_err(|e| Error::OverridesParse(e.to_string()))
    }
}

// =============================================================================
// Override Files
// =============================================================================

/// Load overrides from a file, picking the format from its extension
///
/// `.json` is always supported, `.toml` and `.yaml`/`.yml` need the
/// matching feature.
pub fn load_overrides(path: &Path) -> Result<ConfigurationSet> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let overrides = match extension.as_str() {
        "json" => JsonStorage::new().read(path)?,
        #[cfg(feature = "toml")]
        "toml" => TomlStorage::new().read(path)?,
        #[cfg(feature = "yaml")]
        "yaml" | "yml" => YamlStorage::new().read(path)?,
        other => {
            return Err(Error::Config(format!(
                "Unsupported overrides format '{other}' for {}",
                path.display()
            )));
        }
    };

    debug!("Loaded {} overrides from {}", overrides.len(), path.display());
    Ok(overrides)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SettingKey;
    use tempfile::tempdir;

    fn sample() -> ConfigurationSet {
        ConfigurationSet::new()
            .with("ldap", "url", "ldap://localhost")
            .with("ldap", "user", "dc=Manager,dc=example,dc=com")
            .with("ldap", "use_tls", false)
            .with("ldap", "user_filter", SettingValue::Unset)
            .with("identity", "driver", "keystone.identity.backends.ldap.Identity")
    }

    #[test]
    fn test_ini_render_layout() {
        let ini = IniStorage::with_header(vec!["Managed file".into()])
            .serialize(&sample())
            .unwrap();

        assert_eq!(
            ini,
            "# Managed file\n\
             \n\
             [identity]\n\
             driver=keystone.identity.backends.ldap.Identity\n\
             \n\
             [ldap]\n\
             url=ldap://localhost\n\
             use_tls=False\n\
             user=dc=Manager,dc=example,dc=com\n\
             user_filter=\n"
        );
    }

    #[test]
    fn test_ini_parse_keeps_equals_in_values() {
        let set = IniStorage::new()
            .deserialize("[ldap]\nuser = dc=Manager,dc=example,dc=com\n")
            .unwrap();

        assert_eq!(
            set.lookup("ldap", "user"),
            Some(&SettingValue::text("dc=Manager,dc=example,dc=com"))
        );
    }

    #[test]
    fn test_ini_keeps_surrounding_whitespace_in_values() {
        let storage = IniStorage::new();
        let set = ConfigurationSet::new()
            .with("ldap", "user_filter", "(objectClass=person) ")
            .with("ldap", "group_filter", " (objectClass=group)");

        let ini = storage.serialize(&set).unwrap();
        assert_eq!(storage.deserialize(&ini).unwrap(), set);
    }

    #[test]
    fn test_ini_padded_separator_is_not_part_of_value() {
        let set = IniStorage::new()
            .deserialize("[ldap]
  url = ldap://localhost
suffix =
")
            .unwrap();

        assert_eq!(set.lookup("ldap", "url"), Some(&SettingValue::text("ldap://localhost")));
        assert_eq!(set.lookup("ldap", "suffix"), Some(&SettingValue::Unset));
    }

    #[test]
    fn test_ini_parse_skips_comments_and_blank_lines() {
        let content = "# header\n; other comment\n\n[DEFAULT]\n\n[ldap]\nuse_tls=True\n";
        let set = IniStorage::new().deserialize(content).unwrap();

        assert_eq!(set.len(), 1);
        assert_eq!(
            set.get(&SettingKey::new("ldap", "use_tls")),
            Some(&SettingValue::text("True"))
        );
    }

    #[test]
    fn test_ini_parse_errors_name_the_line() {
        let storage = IniStorage::new();

        let err = storage.deserialize("url=ldap://localhost\n").unwrap_err();
        assert!(matches!(err, Error::Parse { line: 1, .. }));

        let err = storage.deserialize("[ldap]\n\n[broken\n").unwrap_err();
        assert!(matches!(err, Error::Parse { line: 3, .. }));

        let err = storage.deserialize("[ldap]\njust text\n").unwrap_err();
        assert!(matches!(err, Error::Parse { line: 2, .. }));
    }

    #[test]
    fn test_ini_rejects_line_breaks_in_values() {
        let set = ConfigurationSet::new().with("ldap", "user_filter", "a\nb");
        assert!(IniStorage::new().serialize(&set).is_err());
    }

    #[test]
    fn test_ini_write_is_atomic_and_creates_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("etc/keystone/keystone.conf");

        IniStorage::new().write(&path, &sample()).unwrap();

        assert!(path.exists());
        assert!(!dir.path().join("etc/keystone/keystone.conf.tmp").exists());
        let read_back = IniStorage::new().read(&path).unwrap();
        assert_eq!(read_back.len(), sample().len());
    }

    #[test]
    fn test_json_serialize_compact() {
        let json = JsonStorage::compact().serialize(&sample()).unwrap();
        assert!(!json.contains('\n'));
        assert!(json.contains("\"use_tls\":false"));
    }

    #[test]
    fn test_load_overrides_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("overrides.json");
        std::fs::write(
            &path,
            r#"{"ldap": {"url": "ldaps://ldap.example.com", "use_tls": true, "password": null}}"#,
        )
        .unwrap();

        let overrides = load_overrides(&path).unwrap();
        assert_eq!(overrides.len(), 3);
        assert_eq!(overrides.lookup("ldap", "use_tls"), Some(&SettingValue::Bool(true)));
        assert_eq!(overrides.lookup("ldap", "password"), Some(&SettingValue::Null));
    }

    #[test]
    fn test_load_overrides_rejects_unknown_format() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("overrides.ini");
        std::fs::write(&path, "[ldap]\n").unwrap();

        assert!(matches!(load_overrides(&path), Err(Error::Config(_))));
    }

    #[test]
    fn test_read_nonexistent_file() {
        let result = IniStorage::new().read(Path::new("/nonexistent/keystone.conf"));
        assert!(matches!(result, Err(Error::FileRead { .. })));
    }
}
