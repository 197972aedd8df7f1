//! Render the LDAP identity backend settings and verify the result
//!
//! Run with: cargo run --example render_defaults [config_dir]
//! Set `KEYSTONE_LDAP_URL=...` (or any other key) to override from the environment.

use ldapconf::{ConfigManager, ConfigurationSet, DocsConfig, LdapSettings, generate_docs};

fn main() -> ldapconf::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_dir = std::env::args()
        .nth(1)
        .unwrap_or_else(|| std::env::temp_dir().join("ldapconf-demo").display().to_string());

    let manager = ConfigManager::builder()
        .config_dir(config_dir)
        .with_env_prefix("KEYSTONE")
        .header_line("Rendered by the ldapconf demo")
        .build();

    let overrides = ConfigurationSet::new()
        .with("ldap", "url", "ldaps://ldap.example.com")
        .with("ldap", "use_tls", true);

    let report = manager.render_and_verify(&overrides)?;
    println!("{}: {report}", manager.output_path().display());

    if std::env::var_os("LDAPCONF_DOCS").is_some() {
        println!("{}", generate_docs::<LdapSettings>(DocsConfig::new()));
    }

    Ok(())
}
