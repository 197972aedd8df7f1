//! Error types for ldapconf

use std::path::PathBuf;
use thiserror::Error;

use crate::config::SettingKey;
use crate::verify::VerificationReport;

/// Result type alias for ldapconf operations
pub type Result<T> = std::result::Result<T, Error>;

/// A single schema violation found by [`crate::SettingsResolver::validate`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingViolation {
    pub key: SettingKey,
    pub reason: String,
}

impl std::fmt::Display for SettingViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.key, self.reason)
    }
}

/// Main error type for ldapconf
#[derive(Error, Debug)]
pub enum Error {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("Failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file '{path}': {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create directory '{path}': {source}")]
    DirectoryCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Failed to serialize data: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Parse error on line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("Failed to parse overrides: {0}")]
    OverridesParse(String),

    // -------------------------------------------------------------------------
    // Settings Errors
    // -------------------------------------------------------------------------
    #[error("Invalid setting key '{0}': expected 'section/name'")]
    InvalidKey(String),

    #[error("Invalid settings: {}", format_violations(.0))]
    InvalidSettings(Vec<SettingViolation>),

    #[error("Verification failed:\n{0}")]
    VerificationFailed(VerificationReport),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

fn format_violations(violations: &[SettingViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl Error {
    /// Check if this is a "file not found" error
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::FileRead { source, .. } if source.kind() == std::io::ErrorKind::NotFound
        )
    }

    /// Check if this error carries a failed verification report
    #[must_use]
    pub fn is_verification_failure(&self) -> bool {
        matches!(self, Error::VerificationFailed(_))
    }
}

// =============================================================================
// Filesystem Helper Functions
// =============================================================================

use std::path::Path;

/// Create a directory (and parents) with proper error handling
pub fn create_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path).map_err(|e| Error::DirectoryCreate {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Read a file to a string with proper error handling
pub fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Write content to a file with proper error handling
pub fn write_file(path: &Path, contents: impl AsRef<[u8]>) -> Result<()> {
    std::fs::write(path, contents).map_err(|e| Error::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_detection() {
        let err = read_file(Path::new("/nonexistent/ldapconf/keystone.conf")).unwrap_err();
        assert!(err.is_not_found());
        assert!(!err.is_verification_failure());
    }

    #[test]
    fn test_invalid_settings_message_lists_every_violation() {
        let err = Error::InvalidSettings(vec![
            SettingViolation {
                key: SettingKey::new("ldap", "url"),
                reason: "bad scheme".into(),
            },
            SettingViolation {
                key: SettingKey::new("ldap", "use_tls"),
                reason: "not a boolean".into(),
            },
        ]);

        let msg = err.to_string();
        assert!(msg.contains("ldap/url: bad scheme"));
        assert!(msg.contains("ldap/use_tls: not a boolean"));
    }
}
