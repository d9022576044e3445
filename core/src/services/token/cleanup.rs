//! Token cleanup service for periodic removal of expired token records
//!
//! Expired tokens are already rejected by validation; this keeps the
//! store from growing without bound.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::repositories::{Authenticator, TokenStore};

use super::service::TokenService;

/// Configuration for token cleanup service
#[derive(Debug, Clone)]
pub struct TokenCleanupConfig {
    /// How often to run cleanup (in seconds)
    pub interval_seconds: u64,
    /// Whether to enable automatic cleanup
    pub enabled: bool,
}

impl TokenCleanupConfig {
    pub fn every(interval_seconds: u64) -> Self {
        Self {
            interval_seconds,
            enabled: interval_seconds > 0,
        }
    }
}

impl Default for TokenCleanupConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 3600, // Run every hour
            enabled: true,
        }
    }
}

/// Service for cleaning up expired tokens
pub struct TokenCleanupService<S: TokenStore + 'static, A: Authenticator + 'static> {
    token_service: Arc<TokenService<S, A>>,
    config: TokenCleanupConfig,
}

impl<S: TokenStore + 'static, A: Authenticator + 'static> TokenCleanupService<S, A> {
    /// Create a new token cleanup service
    pub fn new(token_service: Arc<TokenService<S, A>>, config: TokenCleanupConfig) -> Self {
        Self {
            token_service,
            config,
        }
    }

    /// Run a single cleanup cycle. Store failures are recorded in
    /// `errors` rather than aborting.
    pub async fn run_cleanup(&self) -> CleanupResult {
        if !self.config.enabled {
            return CleanupResult::default();
        }

        info!("Starting token cleanup cycle");

        let mut result = CleanupResult::default();

        match self.token_service.cleanup_expired().await {
            Ok(count) => {
                result.expired_tokens_deleted = count;
            }
            Err(e) => {
                error!("Failed to cleanup expired tokens: {}", e);
                result.errors.push(format!("Token cleanup error: {}", e));
            }
        }

        info!(
            "Token cleanup completed - Expired: {}",
            result.expired_tokens_deleted
        );

        result
    }

    /// Start the cleanup service as a background task
    ///
    /// The first cycle runs one full interval after start. Returns `None`
    /// when cleanup is disabled.
    pub fn start_background_task(self: Arc<Self>) -> Option<JoinHandle<()>> {
        if !self.config.enabled || self.config.interval_seconds == 0 {
            warn!("Token cleanup service is disabled");
            return None;
        }

        let period = Duration::from_secs(self.config.interval_seconds);

        Some(tokio::spawn(async move {
            info!(
                "Token cleanup service started - will run every {} seconds",
                self.config.interval_seconds
            );

            let mut interval_timer = tokio::time::interval_at(tokio::time::Instant::now() + period, period);

            loop {
                interval_timer.tick().await;

                let result = self.run_cleanup().await;
                if !result.is_success() {
                    warn!("Cleanup completed with errors: {:?}", result.errors);
                }
            }
        }))
    }
}

/// Result of a cleanup operation
#[derive(Debug, Default)]
pub struct CleanupResult {
    /// Number of expired token records deleted
    pub expired_tokens_deleted: usize,
    /// Any errors encountered during cleanup
    pub errors: Vec<String>,
}

impl CleanupResult {
    /// Check if the cleanup was successful (no errors)
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}
