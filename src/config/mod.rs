//! Core configuration types and traits
//!
//! This module contains the foundational types for settings management:
//! - `SettingKey` / `SettingValue` - addressing and values
//! - `SettingsSchema` - Trait for shipping a defaults table with metadata
//! - `SettingMetadata` - Type, default and constraints of a setting
//! - `SettingsConfig` - Configuration for the config manager

mod key;
mod schema;
mod types;
mod value;

pub use key::SettingKey;
pub use schema::{Pattern, SettingMetadata, SettingType, SettingsSchema};
pub use types::{
    DEFAULT_DIR_NAME, DEFAULT_FILE_NAME, DefaultEnvSource, EnvSource, SettingsConfig,
    SettingsConfigBuilder,
};
pub use value::{FALSE_LITERAL, NULL_LITERAL, SettingValue, TRUE_LITERAL};
