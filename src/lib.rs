//! # ldapconf - LDAP identity backend configuration
//!
//! Declarative settings for an identity service that uses an LDAP directory
//! as its identity backend: a table of documented defaults, override merging,
//! INI rendering and read-back verification.
//!
//! ## Features
//!
//! - **Defaults Table**: 33 documented keys under `[ldap]`, `[identity]` and `[assignment]`
//! - **Overrides**: Replace any value in code, from JSON/TOML/YAML files or from env vars
//! - **Validation**: Booleans, option lists and regex patterns checked before writing
//! - **Rendering**: Atomic INI output with deterministic ordering
//! - **Verification**: Every mismatch reported in one run, secrets redacted
//!
//! ## Quick Start
//!
//! ```rust
//! use ldapconf::{ConfigurationSet, SettingsResolver, verify};
//!
//! let resolver = SettingsResolver::new();
//! let resolved = resolver.resolve(&ConfigurationSet::new());
//!
//! let expected = ConfigurationSet::new()
//!     .with("ldap", "url", "ldap://localhost")
//!     .with("identity", "driver", "keystone.identity.backends.ldap.Identity");
//!
//! assert!(verify(&resolved, &expected).is_ok());
//! ```
//!
//! ## Rendering to disk
//!
//! ```rust,no_run
//! use ldapconf::{ConfigManager, ConfigurationSet};
//!
//! # fn example() -> ldapconf::Result<()> {
//! let manager = ConfigManager::builder()
//!     .config_dir("/etc/keystone")
//!     .with_env_prefix("KEYSTONE")   // KEYSTONE_LDAP_URL=... wins over everything
//!     .build();
//!
//! let overrides = ConfigurationSet::new().with("ldap", "use_tls", true);
//! let report = manager.render_and_verify(&overrides)?;
//! println!("{report}");
//! # Ok(())
//! # }
//! ```
//!
//! ## Unset values
//!
//! `ldap/password` defaults to [`SettingValue::Null`], which renders as `None`.
//! The filter and CA file settings default to [`SettingValue::Unset`], which
//! renders as an empty value.

// Core modules
mod defaults;
mod docs;
mod error;
mod manager;
mod resolver;
mod set;
pub mod storage;
mod verify;

// Grouped modules
pub mod config;

pub use config::{
    DefaultEnvSource, EnvSource, Pattern, SettingKey, SettingMetadata, SettingType, SettingValue,
    SettingsConfig, SettingsConfigBuilder, SettingsSchema,
};
pub use defaults::{LDAP_IDENTITY_DRIVER, LdapSettings, SQL_ASSIGNMENT_DRIVER, defaults, metadata};
pub use docs::{DocsConfig, generate_docs, generate_docs_from_metadata};
pub use error::{Error, Result, SettingViolation};
pub use manager::{ConfigManager, ConfigManagerBuilder};
pub use resolver::{EnvironmentHandler, REDACTED, SettingsResolver};
pub use set::{ConfigurationSet, SectionMap};
pub use storage::{IniStorage, JsonStorage, StorageBackend, load_overrides};
pub use verify::{Mismatch, VerificationReport, verify, verify_file};

#[cfg(feature = "toml")]
pub use storage::TomlStorage;

#[cfg(feature = "yaml")]
pub use storage::YamlStorage;
