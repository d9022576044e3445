//! Configuration for the token service

use chrono::Duration;
use gw_shared::JwtConfig;

/// Configuration for the token service
#[derive(Debug, Clone)]
pub struct TokenServiceConfig {
    /// HMAC signing secret
    pub jwt_secret: String,
    /// Access token lifetime
    pub access_token_ttl: Duration,
    /// Refresh token lifetime
    pub refresh_token_ttl: Duration,
}

impl TokenServiceConfig {
    pub fn new(jwt_secret: impl Into<String>, access_token_ttl: Duration, refresh_token_ttl: Duration) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            access_token_ttl,
            refresh_token_ttl,
        }
    }
}

impl Default for TokenServiceConfig {
    fn default() -> Self {
        Self::from(&JwtConfig::default())
    }
}

impl From<&JwtConfig> for TokenServiceConfig {
    fn from(config: &JwtConfig) -> Self {
        Self {
            jwt_secret: config.secret.clone(),
            access_token_ttl: Duration::seconds(config.access_token_expiry),
            refresh_token_ttl: Duration::seconds(config.refresh_token_expiry),
        }
    }
}
