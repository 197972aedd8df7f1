//! Built-in defaults for the LDAP identity backend
//!
//! The table is process-wide constant data, built once on first use.

use crate::config::{SettingKey, SettingMetadata, SettingValue, SettingsSchema};
use crate::set::ConfigurationSet;
use crate::settings;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Identity backend class path that selects LDAP
pub const LDAP_IDENTITY_DRIVER: &str = "keystone.identity.backends.ldap.Identity";

/// Assignment backend class path that selects SQL
pub const SQL_ASSIGNMENT_DRIVER: &str = "keystone.identity.backends.sql.Assignment";

const TLS_REQ_CERT_OPTIONS: &[&str] = &["demand", "allow", "never"];

/// Schema of the LDAP identity backend settings
#[derive(Debug, Clone, Copy, Default)]
pub struct LdapSettings;

impl SettingsSchema for LdapSettings {
    fn get_metadata() -> BTreeMap<SettingKey, SettingMetadata> {
        settings! {
            // Connection
            "ldap/url" => SettingMetadata::url("ldap://localhost")
                .description("URL of the LDAP server"),
            "ldap/user" => SettingMetadata::dn("dc=Manager,dc=example,dc=com")
                .description("Bind DN used to query the directory"),
            "ldap/password" => SettingMetadata::text(SettingValue::Null)
                .description("Password for the bind DN")
                .secret(),
            "ldap/suffix" => SettingMetadata::dn("cn=example,cn=com")
                .description("Base DN of the directory"),

            // Trees
            "ldap/user_tree_dn" => SettingMetadata::dn("ou=Users,dc=example,dc=com")
                .description("Search base for users"),
            "ldap/tenant_tree_dn" => SettingMetadata::dn("ou=Roles,dc=example,dc=com")
                .description("Search base for tenants"),
            "ldap/role_tree_dn" => SettingMetadata::dn("dc=example,dc=com")
                .description("Search base for roles"),

            // Users
            "ldap/user_filter" => SettingMetadata::text(SettingValue::Unset)
                .description("Additional LDAP filter applied to user searches"),
            "ldap/user_objectclass" => SettingMetadata::text("inetOrgPerson"),
            "ldap/user_id_attribute" => SettingMetadata::text("cn"),
            "ldap/user_name_attribute" => SettingMetadata::text("sn"),
            "ldap/user_mail_attribute" => SettingMetadata::text("email"),
            "ldap/user_allow_create" => SettingMetadata::toggle(true),
            "ldap/user_allow_update" => SettingMetadata::toggle(true),
            "ldap/user_allow_delete" => SettingMetadata::toggle(true),
            "ldap/user_pass_attribute" => SettingMetadata::text("userPassword"),
            "ldap/user_enabled_emulation" => SettingMetadata::toggle(false)
                .description("Derive the enabled flag from membership of an emulation group"),
            "ldap/user_enabled_emulation_dn" => SettingMetadata::dn("cn=enabled_users,dc=example,dc=com")
                .description("Group whose members count as enabled users"),

            // Groups
            "ldap/group_tree_dn" => SettingMetadata::dn("ou=Groups,dc=example,dc=com")
                .description("Search base for groups"),
            "ldap/group_filter" => SettingMetadata::text(SettingValue::Unset)
                .description("Additional LDAP filter applied to group searches"),
            "ldap/group_objectclass" => SettingMetadata::text("groupOfNames"),
            "ldap/group_id_attribute" => SettingMetadata::text("cn"),
            "ldap/group_name_attribute" => SettingMetadata::text("ou"),
            "ldap/group_member_attribute" => SettingMetadata::text("member"),
            "ldap/group_desc_attribute" => SettingMetadata::text("desc"),
            "ldap/group_allow_create" => SettingMetadata::toggle(true),
            "ldap/group_allow_update" => SettingMetadata::toggle(true),
            "ldap/group_allow_delete" => SettingMetadata::toggle(true),

            // TLS
            "ldap/use_tls" => SettingMetadata::toggle(false)
                .description("Negotiate StartTLS after connecting"),
            "ldap/tls_cacertfile" => SettingMetadata::text(SettingValue::Unset)
                .description("CA certificate file used to verify the server"),
            "ldap/tls_req_cert" => SettingMetadata::select("demand", TLS_REQ_CERT_OPTIONS)
                .description("Peer certificate checks for TLS sessions"),

            // Backends
            "identity/driver" => SettingMetadata::driver(LDAP_IDENTITY_DRIVER)
                .description("Identity backend loaded by the service"),
            "assignment/driver" => SettingMetadata::driver(SQL_ASSIGNMENT_DRIVER)
                .description("Assignment backend loaded by the service"),
        }
    }
}

static METADATA: LazyLock<BTreeMap<SettingKey, SettingMetadata>> =
    LazyLock::new(LdapSettings::get_metadata);

static DEFAULTS: LazyLock<ConfigurationSet> = LazyLock::new(|| {
    METADATA
        .iter()
        .map(|(key, meta)| (key.clone(), meta.default.clone()))
        .collect()
});

/// Metadata for every known key
pub fn metadata() -> &'static BTreeMap<SettingKey, SettingMetadata> {
    &METADATA
}

/// The defaults table
pub fn defaults() -> &'static ConfigurationSet {
    &DEFAULTS
}

/// Whether `key` holds a secret
pub fn is_secret(key: &SettingKey) -> bool {
    METADATA.get(key).is_some_and(SettingMetadata::is_secret)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_size() {
        assert_eq!(defaults().len(), 33);
        assert_eq!(defaults().section("ldap").count(), 31);
    }

    #[test]
    fn test_every_default_satisfies_its_schema() {
        for (key, meta) in metadata() {
            assert!(
                meta.validate_schema().is_ok(),
                "{key}: {:?}",
                meta.validate_schema()
            );
        }
    }

    #[test]
    fn test_unset_sentinels() {
        let d = defaults();
        assert_eq!(d.lookup("ldap", "password"), Some(&SettingValue::Null));
        assert_eq!(d.lookup("ldap", "user_filter"), Some(&SettingValue::Unset));
        assert_eq!(d.lookup("ldap", "group_filter"), Some(&SettingValue::Unset));
        assert_eq!(d.lookup("ldap", "tls_cacertfile"), Some(&SettingValue::Unset));
    }

    #[test]
    fn test_only_password_is_secret() {
        let secrets: Vec<String> = metadata()
            .iter()
            .filter(|(_, m)| m.is_secret())
            .map(|(k, _)| k.to_string())
            .collect();
        assert_eq!(secrets, vec!["ldap/password"]);
        assert!(is_secret(&SettingKey::new("ldap", "password")));
        assert!(!is_secret(&SettingKey::new("ldap", "unknown")));
    }

    #[test]
    fn test_sections() {
        assert_eq!(
            LdapSettings::get_sections(),
            vec!["assignment", "identity", "ldap"]
        );
    }
}
