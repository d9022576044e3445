//! Shared configuration for the gateway server
//!
//! This crate holds the configuration types used by every server crate.
//! Values come from built-in defaults, an optional TOML file, and
//! environment variables (highest precedence).

pub mod config;

pub use config::{
    AppConfig, AuthConfig, ConfigError, DatabaseConfig, Environment, JwtConfig, LogFormat,
    LoggingConfig, ServerConfig, StorageBackend,
};
