//! Common test utilities for ldapconf integration tests
//!
//! Provides the documented defaults, an injectable environment and a
//! manager fixture rooted in a temporary directory.

#![allow(dead_code)]

use ldapconf::{ConfigManager, ConfigurationSet, EnvSource, SettingKey, SettingValue};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use tempfile::TempDir;

// =============================================================================
// Documented Defaults
// =============================================================================

/// Every default as it must appear in the rendered file
pub const DOCUMENTED_DEFAULTS: &[(&str, &str)] = &[
    ("ldap/url", "ldap://localhost"),
    ("ldap/user", "dc=Manager,dc=example,dc=com"),
    ("ldap/password", "None"),
    ("ldap/suffix", "cn=example,cn=com"),
    ("ldap/user_tree_dn", "ou=Users,dc=example,dc=com"),
    ("ldap/tenant_tree_dn", "ou=Roles,dc=example,dc=com"),
    ("ldap/role_tree_dn", "dc=example,dc=com"),
    ("ldap/user_filter", ""),
    ("ldap/user_objectclass", "inetOrgPerson"),
    ("ldap/user_id_attribute", "cn"),
    ("ldap/user_name_attribute", "sn"),
    ("ldap/user_mail_attribute", "email"),
    ("ldap/user_allow_create", "True"),
    ("ldap/user_allow_update", "True"),
    ("ldap/user_allow_delete", "True"),
    ("ldap/user_pass_attribute", "userPassword"),
    ("ldap/user_enabled_emulation", "False"),
    ("ldap/user_enabled_emulation_dn", "cn=enabled_users,dc=example,dc=com"),
    ("ldap/group_tree_dn", "ou=Groups,dc=example,dc=com"),
    ("ldap/group_filter", ""),
    ("ldap/group_objectclass", "groupOfNames"),
    ("ldap/group_id_attribute", "cn"),
    ("ldap/group_name_attribute", "ou"),
    ("ldap/group_member_attribute", "member"),
    ("ldap/group_desc_attribute", "desc"),
    ("ldap/group_allow_create", "True"),
    ("ldap/group_allow_update", "True"),
    ("ldap/group_allow_delete", "True"),
    ("ldap/use_tls", "False"),
    ("ldap/tls_cacertfile", ""),
    ("ldap/tls_req_cert", "demand"),
    ("identity/driver", "keystone.identity.backends.ldap.Identity"),
    ("assignment/driver", "keystone.identity.backends.sql.Assignment"),
];

pub fn key(raw: &str) -> SettingKey {
    raw.parse().expect("valid test key")
}

/// Documented defaults as an expected set
pub fn documented_defaults() -> ConfigurationSet {
    DOCUMENTED_DEFAULTS
        .iter()
        .map(|(k, v)| (key(k), SettingValue::text(*v)))
        .collect()
}

// =============================================================================
// Injectable Environment
// =============================================================================

/// Environment backed by a shared map
#[derive(Clone, Default)]
pub struct TestEnv {
    vars: Arc<RwLock<HashMap<String, String>>>,
}

impl TestEnv {
    pub fn set(&self, name: &str, value: &str) {
        self.vars
            .write()
            .unwrap()
            .insert(name.to_string(), value.to_string());
    }

    pub fn remove(&self, name: &str) {
        self.vars.write().unwrap().remove(name);
    }
}

impl EnvSource for TestEnv {
    fn var(&self, key: &str) -> Result<String, std::env::VarError> {
        self.vars
            .read()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or(std::env::VarError::NotPresent)
    }
}

// =============================================================================
// Test Fixtures
// =============================================================================

/// Test fixture that provides a temporary directory and configured ConfigManager
pub struct TestFixture {
    pub temp_dir: TempDir,
    pub env: TestEnv,
    pub manager: ConfigManager,
}

impl TestFixture {
    /// Create a new test fixture with default configuration
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let env = TestEnv::default();
        let manager = ConfigManager::builder()
            .config_dir(temp_dir.path())
            .env_source(env.clone())
            .build();

        Self {
            temp_dir,
            env,
            manager,
        }
    }

    /// Create a fixture with environment variable prefix
    pub fn with_env_prefix(prefix: &str) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let env = TestEnv::default();
        let manager = ConfigManager::builder()
            .config_dir(temp_dir.path())
            .with_env_prefix(prefix)
            .env_source(env.clone())
            .build();

        Self {
            temp_dir,
            env,
            manager,
        }
    }

    /// Get the config directory path
    pub fn config_dir(&self) -> PathBuf {
        self.temp_dir.path().to_path_buf()
    }

    /// Get the rendered file path
    pub fn output_path(&self) -> PathBuf {
        self.temp_dir.path().join("keystone.conf")
    }

    /// Raw content of the rendered file
    pub fn read_output(&self) -> String {
        std::fs::read_to_string(self.output_path()).expect("rendered file exists")
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Install env_logger once so `RUST_LOG=debug` shows resolver output
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
