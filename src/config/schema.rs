//! Settings schema trait and metadata types
//!
//! Every entry in a defaults table carries a [`SettingMetadata`]: the setting
//! type, the default value, and optional constraints (an option list for
//! selects, a regex pattern for text). Metadata drives validation, docs
//! generation and secret redaction.
//!
//! ```rust
//! use ldapconf::{SettingMetadata, SettingValue};
//!
//! let tls_req_cert = SettingMetadata::select("demand", &["demand", "allow", "never"])
//!     .description("Peer certificate checks for TLS sessions");
//!
//! assert!(tls_req_cert.validate(&SettingValue::text("allow")).is_ok());
//! assert!(tls_req_cert.validate(&SettingValue::text("sometimes")).is_err());
//! ```

use super::key::SettingKey;
use super::value::SettingValue;
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;

// One attribute=value pair: attribute name or OID, value with `\x` escapes
const RDN_PART: &str = r"\s*(?:[A-Za-z][\w-]*|\d+(?:\.\d+)*)\s*=(?:[^,+\\]|\\.)+";

/// LDAP distinguished name, `+` joins multi-valued RDNs
fn dn_pattern() -> String {
    let rdn = format!(r"{RDN_PART}(?:\+{RDN_PART})*");
    format!(r"^{rdn}(?:,{rdn})*$")
}

/// One or more whitespace-separated LDAP URIs
const URL_PATTERN: &str = r"^\s*ldap[si]?://\S+(?:\s+ldap[si]?://\S+)*\s*$";

// =============================================================================
// Setting Types
// =============================================================================

/// Kind of value a setting holds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SettingType {
    /// Free-form text
    #[default]
    Text,
    /// Boolean rendered as `True`/`False`
    Toggle,
    /// One of a fixed option list
    Select,
    /// LDAP distinguished name
    Dn,
    /// LDAP server URL
    Url,
    /// Backend class path loaded by the consuming service
    Driver,
}

impl SettingType {
    pub fn label(&self) -> &'static str {
        match self {
            SettingType::Text => "String",
            SettingType::Toggle => "Boolean",
            SettingType::Select => "Select",
            SettingType::Dn => "Distinguished Name",
            SettingType::Url => "URL",
            SettingType::Driver => "Driver Path",
        }
    }
}

// =============================================================================
// Pattern
// =============================================================================

/// Regex constraint, compiled once at construction
///
/// Compile errors are kept and surfaced by
/// [`SettingMetadata::validate_schema`].
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    compiled: Result<Regex, regex::Error>,
}

impl Pattern {
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        let compiled = Regex::new(&source);
        Self { source, compiled }
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn regex(&self) -> Result<&Regex, String> {
        self.compiled
            .as_ref()
            .map_err(|e| format!("Invalid regex pattern: {e}"))
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

// =============================================================================
// Setting Metadata
// =============================================================================

/// Metadata for a single setting
#[derive(Debug, Clone, PartialEq)]
pub struct SettingMetadata {
    pub setting_type: SettingType,
    pub default: SettingValue,
    pub description: Option<String>,
    /// Allowed values for `Select`
    pub options: Option<Vec<String>>,
    /// Regex a non-empty text value must match
    pub pattern: Option<Pattern>,
    /// Value must not be logged or shown in reports
    pub secret: bool,
}

impl SettingMetadata {
    fn with_type(setting_type: SettingType, default: SettingValue) -> Self {
        Self {
            setting_type,
            default,
            description: None,
            options: None,
            pattern: None,
            secret: false,
        }
    }

    // =========================================================================
    // Type-specific constructors
    // =========================================================================

    /// Create a text setting
    pub fn text(default: impl Into<SettingValue>) -> Self {
        Self::with_type(SettingType::Text, default.into())
    }

    /// Create a boolean setting
    pub fn toggle(default: bool) -> Self {
        Self::with_type(SettingType::Toggle, SettingValue::Bool(default))
    }

    /// Create a select setting
    ///
    /// Options are required at construction time.
    pub fn select(default: impl Into<String>, options: &[&str]) -> Self {
        let mut meta = Self::with_type(SettingType::Select, SettingValue::Text(default.into()));
        meta.options = Some(options.iter().map(|o| (*o).to_string()).collect());
        meta
    }

    /// Create a distinguished-name setting
    pub fn dn(default: impl Into<String>) -> Self {
        Self::with_type(SettingType::Dn, SettingValue::Text(default.into()))
            .pattern(dn_pattern())
    }

    /// Create an LDAP URL setting
    pub fn url(default: impl Into<String>) -> Self {
        Self::with_type(SettingType::Url, SettingValue::Text(default.into()))
            .pattern(URL_PATTERN)
    }

    /// Create a backend driver setting
    pub fn driver(default: impl Into<String>) -> Self {
        Self::with_type(SettingType::Driver, SettingValue::Text(default.into()))
            .pattern(r"^[A-Za-z_][\w]*(\.[A-Za-z_][\w]*)+$")
    }

    // =========================================================================
    // Builder methods
    // =========================================================================

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set regex pattern for validation
    #[must_use]
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(Pattern::new(pattern));
        self
    }

    /// Mark setting as secret
    #[must_use]
    pub fn secret(mut self) -> Self {
        self.secret = true;
        self
    }

    pub fn is_secret(&self) -> bool {
        self.secret
    }

    // =========================================================================
    // Validation
    // =========================================================================

    /// Validate a value against this setting's constraints
    ///
    /// Unset sentinels are always accepted.
    pub fn validate(&self, value: &SettingValue) -> Result<(), String> {
        if value.is_unset() {
            return Ok(());
        }

        match self.setting_type {
            SettingType::Toggle => {
                if value.as_bool().is_none() {
                    return Err(format!("Value '{value}' must be True or False"));
                }
            }
            SettingType::Select => {
                if let Some(ref options) = self.options {
                    let rendered = value.render();
                    if !options.iter().any(|o| *o == rendered) {
                        return Err(format!(
                            "Value '{rendered}' must be one of: {}",
                            options.join(", ")
                        ));
                    }
                }
            }
            SettingType::Text | SettingType::Dn | SettingType::Url | SettingType::Driver => {
                if matches!(value, SettingValue::Bool(_)) {
                    return Err("Value must be a string, not a boolean".to_string());
                }
            }
        }

        if let Some(ref pattern) = self.pattern {
            let re = pattern.regex()?;
            let rendered = value.render();
            if !re.is_match(&rendered) {
                return Err(format!("Value does not match pattern: {pattern}"));
            }
        }

        Ok(())
    }

    /// Validate the metadata definition itself
    ///
    /// Checks that selects have options, that the pattern compiles and that
    /// the default satisfies the constraints.
    pub fn validate_schema(&self) -> Result<(), String> {
        if self.setting_type == SettingType::Select {
            match self.options {
                Some(ref options) if !options.is_empty() => {}
                _ => return Err("Select type must have options defined".to_string()),
            }
        }

        if let Some(ref pattern) = self.pattern {
            if pattern.as_str().is_empty() {
                return Err("Pattern cannot be empty string".to_string());
            }
            pattern.regex()?;
        }

        self.validate(&self.default)
            .map_err(|e| format!("Default value is invalid: {e}"))
    }
}

// =============================================================================
// Settings Schema Trait
// =============================================================================

/// Trait for types that ship a defaults table
pub trait SettingsSchema {
    /// Metadata for every known key
    fn get_metadata() -> BTreeMap<SettingKey, SettingMetadata>;

    /// Sections in key order
    #[must_use]
    fn get_sections() -> Vec<String> {
        let mut sections: Vec<String> = Self::get_metadata()
            .keys()
            .map(|k| k.section().to_string())
            .collect();
        sections.dedup();
        sections
    }
}

/// Macro for building a settings metadata map
///
/// # Example
/// ```rust
/// use ldapconf::{settings, SettingMetadata};
///
/// let table = settings! {
///     "ldap/url" => SettingMetadata::url("ldap://localhost"),
///     "ldap/use_tls" => SettingMetadata::toggle(false),
/// };
/// assert_eq!(table.len(), 2);
/// ```
#[macro_export]
macro_rules! settings {
    ($($key:expr => $value:expr),* $(,)?) => {{
        let mut map = std::collections::BTreeMap::new();
        $(
            let key: $crate::SettingKey = $key
                .parse()
                .unwrap_or_else(|e| panic!("invalid key in settings! table: {e}"));
            map.insert(key, $value);
        )*
        map
    }};
}

// =============================================================================
// Tests
// =============================================================================
