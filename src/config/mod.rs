//! Application configuration module
//!
//! Configuration is read once at startup from an optional YAML file and
//! environment variables, then validated as a whole. The file usually
//! carries the persona, group, provider and model tables; the environment
//! carries secrets and per-deployment overrides.
//!
//! # Sources, later wins
//!
//! 1. `.env` (development convenience, loaded into the environment)
//! 2. YAML file at `$HEALTH_COACH_CONFIG_FILE`, default `config/app.yaml`; optional
//! 3. `HEALTH_COACH__*` variables, `__` separating nested keys
//!
//! # Example
//!
//! ```no_run
//! use health_coach::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod ai;
mod assessment;
mod chat;
mod database;
mod error;
mod personas;
mod redis;
mod server;

pub use ai::{AiConfig, ProviderConfig, ProviderKind};
pub use assessment::AssessmentConfig;
pub use chat::ChatConfig;
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use personas::PersonasConfig;
pub use redis::RedisConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;
use std::path::Path;

/// Variable naming the YAML configuration file.
pub const CONFIG_FILE_ENV: &str = "HEALTH_COACH_CONFIG_FILE";
pub const DEFAULT_CONFIG_FILE: &str = "config/app.yaml";
pub const ENV_PREFIX: &str = "HEALTH_COACH";

/// Root application configuration
#[derive(Debug, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    /// PostgreSQL; in-memory stores when absent
    #[serde(default)]
    pub database: Option<DatabaseConfig>,

    /// Redis for guest quotas; in-memory counters when absent
    #[serde(default)]
    pub redis: Option<RedisConfig>,

    #[serde(default)]
    pub ai: AiConfig,

    #[serde(default)]
    pub personas: PersonasConfig,

    #[serde(default)]
    pub chat: ChatConfig,

    #[serde(default)]
    pub assessment: AssessmentConfig,
}

impl AppConfig {
    /// Loads `.env`, then the configured YAML file and the environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source cannot be read or values cannot be
    /// parsed into the expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let file = std::env::var(CONFIG_FILE_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Self::load_from(file)
    }

    /// Loads from `path` (skipped if missing) and the environment.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config = config::Config::builder()
            .add_source(
                config::File::from(path.as_ref())
                    .format(config::FileFormat::Yaml)
                    .required(false),
            )
            .add_source(
                config::Environment::default()
                    .prefix(ENV_PREFIX)
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validates every section and the references between them.
    ///
    /// # Errors
    ///
    /// Returns the first `ValidationError` found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        if let Some(database) = &self.database {
            database.validate()?;
        }
        if let Some(redis) = &self.redis {
            redis.validate()?;
        }
        self.ai.validate()?;
        self.personas.validate(&self.ai.models)?;
        self.chat.validate()?;
        self.assessment.validate()?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
