//! Authentication configuration

use serde::{Deserialize, Serialize};

use super::{env_parse, ConfigError};

const DEFAULT_SECRET: &str = "development-secret-please-change-in-production";

/// Token signing configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// Shared secret for HMAC signing
    pub secret: String,

    /// Access token lifetime in seconds
    pub access_token_expiry: i64,

    /// Refresh token lifetime in seconds
    pub refresh_token_expiry: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::from(DEFAULT_SECRET),
            access_token_expiry: 900,     // 15 minutes
            refresh_token_expiry: 604800, // 7 days
        }
    }
}

impl JwtConfig {
    /// Create a new JWT configuration with secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Set access token expiry in minutes
    pub fn with_access_expiry_minutes(mut self, minutes: i64) -> Self {
        self.access_token_expiry = minutes * 60;
        self
    }

    /// Set refresh token expiry in days
    pub fn with_refresh_expiry_days(mut self, days: i64) -> Self {
        self.refresh_token_expiry = days * 86400;
        self
    }

    /// Check if using default secret (security warning)
    pub fn is_using_default_secret(&self) -> bool {
        self.secret == DEFAULT_SECRET
    }

    /// Reject empty secrets and lifetimes that cannot produce a usable pair
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.secret.is_empty() {
            return Err(ConfigError::Invalid("JWT secret must not be empty".to_string()));
        }
        if self.access_token_expiry <= 0 {
            return Err(ConfigError::Invalid(
                "access token expiry must be positive".to_string(),
            ));
        }
        if self.refresh_token_expiry <= self.access_token_expiry {
            return Err(ConfigError::Invalid(
                "refresh token expiry must exceed access token expiry".to_string(),
            ));
        }
        Ok(())
    }
}

/// Complete authentication configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// JWT configuration
    pub jwt: JwtConfig,

    /// Realm reported in `WWW-Authenticate` challenges
    #[serde(default = "default_realm")]
    pub realm: String,

    /// Seconds between expired-token sweeps, 0 disables the sweeper
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt: JwtConfig::default(),
            realm: default_realm(),
            cleanup_interval: default_cleanup_interval(),
        }
    }
}

impl AuthConfig {
    /// Create from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    pub(crate) fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Ok(secret) = std::env::var("JWT_SECRET") {
            self.jwt.secret = secret;
        }
        if let Some(expiry) = env_parse("JWT_ACCESS_TOKEN_EXPIRY")? {
            self.jwt.access_token_expiry = expiry;
        }
        if let Some(expiry) = env_parse("JWT_REFRESH_TOKEN_EXPIRY")? {
            self.jwt.refresh_token_expiry = expiry;
        }
        if let Ok(name) = std::env::var("APP_NAME") {
            self.realm = name;
        }
        if let Some(interval) = env_parse("TOKEN_CLEANUP_INTERVAL")? {
            self.cleanup_interval = interval;
        }
        Ok(())
    }
}

fn default_realm() -> String {
    String::from("gateway")
}

fn default_cleanup_interval() -> u64 {
    3600
}
