//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section; every field has a default so a missing file still yields a
//! usable configuration.

pub mod client;
pub mod logging;
pub mod notifications;
pub mod retention;
pub mod store;
pub mod translation;

use serde::{Deserialize, Serialize};

pub use self::client::ClientConfig;
pub use self::logging::LoggingConfig;
pub use self::notifications::NotificationsConfig;
pub use self::retention::RetentionConfig;
pub use self::store::{LocalStoreConfig, StoreConfig};
pub use self::translation::TranslationConfig;

use crate::error::AppError;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Remote document store settings.
    #[serde(default)]
    pub store: StoreConfig,
    /// Local key/value store settings.
    #[serde(default)]
    pub local: LocalStoreConfig,
    /// Notification emission settings.
    #[serde(default)]
    pub notifications: NotificationsConfig,
    /// Retention sweep settings.
    #[serde(default)]
    pub retention: RetentionConfig,
    /// REST backend client settings.
    #[serde(default)]
    pub client: ClientConfig,
    /// Translation pipeline settings.
    #[serde(default)]
    pub translation: TranslationConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file plus `CAMPUS__`-prefixed
    /// environment variables. The file is optional.
    pub fn load(path: &str) -> Result<Self, AppError> {
        Self::builder(path)
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }

    /// Load a base file, then an environment overlay (`config/{env}`), then
    /// environment variables.
    pub fn load_layered(path: &str, env: &str) -> Result<Self, AppError> {
        config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(env_source())
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }

    fn builder(path: &str) -> config::ConfigBuilder<config::builder::DefaultState> {
        config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(env_source())
    }
}

fn env_source() -> config::Environment {
    config::Environment::with_prefix("CAMPUS")
        .separator("__")
        .try_parsing(true)
}
