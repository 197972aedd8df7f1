//! Setting values and their rendered forms

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Cow;
use std::fmt;

/// Literal the consuming service reads as "no value"
pub const NULL_LITERAL: &str = "None";
/// Canonical rendered form of `true`
pub const TRUE_LITERAL: &str = "True";
/// Canonical rendered form of `false`
pub const FALSE_LITERAL: &str = "False";

/// Value of a single setting
///
/// Two variants represent "no value". They differ only in how they render:
/// [`SettingValue::Unset`] renders as the empty string (e.g. `user_filter=`),
/// [`SettingValue::Null`] renders as `None` (e.g. `password=None`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SettingValue {
    /// Free-form string
    Text(String),
    /// Boolean, rendered as `True`/`False`
    Bool(bool),
    /// Empty-string unset sentinel
    Unset,
    /// `None` unset sentinel
    Null,
}

impl SettingValue {
    pub fn text(value: impl Into<String>) -> Self {
        SettingValue::Text(value.into())
    }

    /// Rendered form as written to the target file
    pub fn render(&self) -> Cow<'_, str> {
        match self {
            SettingValue::Text(s) => Cow::Borrowed(s.as_str()),
            SettingValue::Bool(true) => Cow::Borrowed(TRUE_LITERAL),
            SettingValue::Bool(false) => Cow::Borrowed(FALSE_LITERAL),
            SettingValue::Unset => Cow::Borrowed(""),
            SettingValue::Null => Cow::Borrowed(NULL_LITERAL),
        }
    }

    /// Whether this value is one of the unset sentinels
    pub fn is_unset(&self) -> bool {
        matches!(self, SettingValue::Unset | SettingValue::Null)
    }

    /// Compare by rendered form
    ///
    /// `Bool(true)` matches `Text("True")`, `Null` matches `Text("None")`.
    pub fn matches(&self, other: &SettingValue) -> bool {
        self.render() == other.render()
    }

    /// Interpret this value as a boolean
    ///
    /// Accepts real booleans and the case-insensitive strings `true`/`false`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SettingValue::Bool(b) => Some(*b),
            SettingValue::Text(s) if s.eq_ignore_ascii_case(TRUE_LITERAL) => Some(true),
            SettingValue::Text(s) if s.eq_ignore_ascii_case(FALSE_LITERAL) => Some(false),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SettingValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Value read back from a rendered file
    ///
    /// No type inference: an empty value is `Unset`, everything else is text.
    pub fn from_rendered(raw: &str) -> Self {
        if raw.is_empty() {
            SettingValue::Unset
        } else {
            SettingValue::Text(raw.to_string())
        }
    }

    /// Value supplied as a loosely typed string (environment, CLI)
    ///
    /// `true`/`false` (any case) become booleans, `None` becomes `Null`,
    /// the empty string becomes `Unset`.
    pub fn parse_loose(raw: &str) -> Self {
        if raw.is_empty() {
            SettingValue::Unset
        } else if raw == NULL_LITERAL {
            SettingValue::Null
        } else if raw.eq_ignore_ascii_case(TRUE_LITERAL) {
            SettingValue::Bool(true)
        } else if raw.eq_ignore_ascii_case(FALSE_LITERAL) {
            SettingValue::Bool(false)
        } else {
            SettingValue::Text(raw.to_string())
        }
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<&str> for SettingValue {
    fn from(value: &str) -> Self {
        SettingValue::Text(value.to_string())
    }
}

impl From<String> for SettingValue {
    fn from(value: String) -> Self {
        SettingValue::Text(value)
    }
}

impl From<bool> for SettingValue {
    fn from(value: bool) -> Self {
        SettingValue::Bool(value)
    }
}

impl<T: Into<SettingValue>> From<Option<T>> for SettingValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(SettingValue::Null, Into::into)
    }
}

// =============================================================================
// Serde
// =============================================================================

impl Serialize for SettingValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SettingValue::Text(s) => serializer.serialize_str(s),
            SettingValue::Bool(b) => serializer.serialize_bool(*b),
            SettingValue::Unset => serializer.serialize_str(""),
            SettingValue::Null => serializer.serialize_none(),
        }
    }
}

struct SettingValueVisitor;

impl<'de> Visitor<'de> for SettingValueVisitor {
    type Value = SettingValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string, boolean, number or null")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<SettingValue, E> {
        Ok(SettingValue::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<SettingValue, E> {
        Ok(SettingValue::Text(v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<SettingValue, E> {
        Ok(SettingValue::Text(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<SettingValue, E> {
        Ok(SettingValue::Text(v.to_string()))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<SettingValue, E> {
        Ok(SettingValue::from_rendered(v))
    }

    fn visit_none<E: de::Error>(self) -> Result<SettingValue, E> {
        Ok(SettingValue::Null)
    }

    fn visit_unit<E: de::Error>(self) -> Result<SettingValue, E> {
        Ok(SettingValue::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<SettingValue, D::Error> {
        deserializer.deserialize_any(SettingValueVisitor)
    }
}

impl<'de> Deserialize<'de> for SettingValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(SettingValueVisitor)
    }
}
