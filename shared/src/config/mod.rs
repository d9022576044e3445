//! Configuration module with business-specific sub-modules
//!
//! - `auth` - token signing secret, token lifetimes, cleanup cadence
//! - `database` - MySQL connection and pool configuration
//! - `environment` - environment detection and logging configuration
//! - `server` - HTTP server binding and storage backend selection

pub mod auth;
pub mod database;
pub mod environment;
pub mod server;

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use auth::{AuthConfig, JwtConfig};
pub use database::DatabaseConfig;
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use server::{ServerConfig, StorageBackend};

/// Errors raised while assembling or validating configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration: {0}")]
    Source(#[from] config::ConfigError),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Authentication configuration
    pub auth: AuthConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            auth: AuthConfig::default(),
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables on top of the defaults.
    /// A `.env` file in the working directory is read first when present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::load(None)
    }

    /// Load configuration in layers: defaults, then the optional TOML file,
    /// then environment variables. The result is validated before returning.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder =
            config::Config::builder().add_source(config::Config::try_from(&AppConfig::default())?);
        if let Some(path) = file {
            builder = builder.add_source(config::File::from(path));
        }

        let mut app: AppConfig = builder.build()?.try_deserialize()?;
        app.apply_env()?;
        app.validate()?;
        Ok(app)
    }

    /// Override fields from environment variables
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Some(env) = env_parse::<Environment>("ENVIRONMENT")? {
            self.environment = env;
            self.logging = LoggingConfig::for_environment(env);
        }
        if let Ok(level) = std::env::var("LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = env_parse("LOG_FORMAT")? {
            self.logging.format = format;
        }
        self.server.apply_env()?;
        self.database.apply_env()?;
        self.auth.apply_env()?;
        Ok(())
    }

    /// Check cross-field invariants
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.auth.jwt.validate()?;
        if self.environment.is_production() && self.auth.jwt.is_using_default_secret() {
            return Err(ConfigError::Invalid(
                "JWT_SECRET must be set in production".to_string(),
            ));
        }
        Ok(())
    }
}

/// Read and parse an environment variable, `Ok(None)` when unset
pub(crate) fn env_parse<T: FromStr>(key: &str) -> Result<Option<T>, ConfigError> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue {
                key: key.to_string(),
                value: raw,
            }),
        Err(_) => Ok(None),
    }
}
