//! Documentation generator for the defaults table
//!
//! Generates a markdown settings reference from `SettingsSchema` metadata.

use crate::config::{SettingKey, SettingMetadata, SettingsSchema};
use std::collections::BTreeMap;
use std::fmt::Write;

/// Configuration for docs generation
#[derive(Debug, Clone, Default)]
pub struct DocsConfig {
    /// Title for the documentation
    pub title: Option<String>,
    /// Description/introduction text
    pub description: Option<String>,
}

impl DocsConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }
}

/// Generate markdown documentation from a settings schema
#[must_use]
pub fn generate_docs<T: SettingsSchema>(config: DocsConfig) -> String {
    generate_docs_from_metadata(&T::get_metadata(), config)
}

/// Generate docs from raw metadata
#[must_use]
pub fn generate_docs_from_metadata(
    metadata: &BTreeMap<SettingKey, SettingMetadata>,
    config: DocsConfig,
) -> String {
    let mut output = String::new();

    let title = config
        .title
        .unwrap_or_else(|| "Settings Reference".to_string());
    let _ = writeln!(output, "# {title}\n");

    if let Some(desc) = config.description {
        let _ = writeln!(output, "{desc}\n");
    }

    let mut current_section: Option<&str> = None;
    for (key, meta) in metadata {
        if current_section != Some(key.section()) {
            let _ = writeln!(output, "\n## [{}]\n", key.section());
            current_section = Some(key.section());
        }
        format_setting(&mut output, key, meta);
    }

    output
}

fn format_setting(out: &mut String, key: &SettingKey, meta: &SettingMetadata) {
    let _ = writeln!(out, "### `{key}`\n");

    if meta.is_secret() {
        let _ = writeln!(out, "Secret\n");
    }

    if let Some(ref desc) = meta.description {
        let _ = writeln!(out, "{desc}\n");
    }

    out.push_str("| Property | Value |\n");
    out.push_str("|----------|-------|\n");
    let _ = writeln!(out, "| **Type** | {} |", meta.setting_type.label());
    let default = meta.default.render();
    if default.is_empty() {
        let _ = writeln!(out, "| **Default** | *(empty)* |");
    } else {
        let _ = writeln!(out, "| **Default** | `{default}` |");
    }

    if let Some(ref pattern) = meta.pattern {
        let _ = writeln!(out, "| **Pattern** | `{pattern}` |");
    }

    out.push('\n');

    if let Some(ref options) = meta.options {
        out.push_str("**Options:**\n\n");
        for opt in options {
            let _ = writeln!(out, "- `{opt}`");
        }
        out.push('\n');
    }

    out.push_str("---\n\n");
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::LdapSettings;

    #[test]
    fn test_generate_docs() {
        let docs = generate_docs::<LdapSettings>(
            DocsConfig::new()
                .with_title("Keystone LDAP Settings")
                .with_description("Defaults rendered into keystone.conf"),
        );

        assert!(docs.starts_with("# Keystone LDAP Settings\n"));
        assert!(docs.contains("Defaults rendered into keystone.conf"));
        assert!(docs.contains("## [assignment]"));
        assert!(docs.contains("## [identity]"));
        assert!(docs.contains("## [ldap]"));
        assert!(docs.contains("### `ldap/url`"));
        assert!(docs.contains("| **Default** | `ldap://localhost` |"));
        assert!(docs.contains("- `never`"));
    }

    #[test]
    fn test_secret_badge_and_empty_default() {
        let docs = generate_docs::<LdapSettings>(DocsConfig::new());

        let password = docs.split("### `ldap/password`").nth(1).unwrap();
        assert!(password.trim_start().starts_with("Secret"));

        let filter = docs.split("### `ldap/user_filter`").nth(1).unwrap();
        assert!(filter.contains("| **Default** | *(empty)* |"));
    }
}
