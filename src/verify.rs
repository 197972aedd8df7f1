//! Verification of rendered settings
//!
//! The verifier compares every expected key against a rendered set and
//! collects all mismatches into one [`VerificationReport`]. It never stops
//! at the first failure.

use crate::config::{SettingKey, SettingValue};
use crate::defaults;
use crate::error::{Error, Result};
use crate::resolver::REDACTED;
use crate::set::ConfigurationSet;
use crate::storage::{IniStorage, StorageBackend};
use log::debug;
use std::fmt;
use std::path::Path;

/// One key whose rendered value differs from the expected one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    pub key: SettingKey,
    /// Rendered form of the expected value
    pub expected: String,
    /// Rendered form of the actual value, `None` if the key is missing
    pub actual: Option<String>,
}

impl Mismatch {
    pub fn is_missing(&self) -> bool {
        self.actual.is_none()
    }
}

/// Outcome of a verification run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerificationReport {
    checked: usize,
    mismatches: Vec<Mismatch>,
}

impl VerificationReport {
    pub fn is_ok(&self) -> bool {
        self.mismatches.is_empty()
    }

    /// Number of expected keys compared
    pub fn checked(&self) -> usize {
        self.checked
    }

    pub fn mismatches(&self) -> &[Mismatch] {
        &self.mismatches
    }

    /// Mismatch for `key`, if any
    pub fn mismatch(&self, key: &SettingKey) -> Option<&Mismatch> {
        self.mismatches.iter().find(|m| &m.key == key)
    }

    /// `Ok(self)` when every key matched, `Error::VerificationFailed` otherwise
    pub fn into_result(self) -> Result<Self> {
        if self.is_ok() {
            Ok(self)
        } else {
            Err(Error::VerificationFailed(self))
        }
    }
}

impl fmt::Display for VerificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_ok() {
            return write!(f, "all {} settings match", self.checked);
        }

        writeln!(
            f,
            "{} of {} settings do not match:",
            self.mismatches.len(),
            self.checked
        )?;
        for m in &self.mismatches {
            let secret = defaults::is_secret(&m.key);
            let shown = |v: &str| if secret { REDACTED.to_string() } else { format!("'{v}'") };
            match m.actual {
                Some(ref actual) => writeln!(
                    f,
                    "  {}: expected {}, got {}",
                    m.key,
                    shown(&m.expected),
                    shown(actual)
                )?,
                None => writeln!(f, "  {}: expected {}, missing", m.key, shown(&m.expected))?,
            }
        }
        Ok(())
    }
}

/// Check that every expected key is present in `rendered` with the same
/// rendered value
///
/// Booleans compare by their `True`/`False` form, so `Bool(true)` matches a
/// `True` read back from a file.
pub fn verify(rendered: &ConfigurationSet, expected: &ConfigurationSet) -> VerificationReport {
    let mismatches: Vec<Mismatch> = expected
        .iter()
        .filter_map(|(key, want)| match rendered.get(key) {
            Some(got) if got.matches(want) => None,
            got => Some(Mismatch {
                key: key.clone(),
                expected: want.render().into_owned(),
                actual: got.map(|v: &SettingValue| v.render().into_owned()),
            }),
        })
        .collect();

    debug!(
        "Verified {} settings, {} mismatches",
        expected.len(),
        mismatches.len()
    );

    VerificationReport {
        checked: expected.len(),
        mismatches,
    }
}

/// Parse a rendered INI file and [`verify`] it
pub fn verify_file(path: &Path, expected: &ConfigurationSet) -> Result<VerificationReport> {
    let rendered = IniStorage::new().read(path)?;
    Ok(verify(&rendered, expected))
}
