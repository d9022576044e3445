//! Authentication flows built on the token lifecycle service

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::entities::token::TokenPair;
use crate::domain::entities::user::UserId;
use crate::errors::{DomainError, DomainResult};
use crate::repositories::{Authenticator, TokenStore};
use crate::services::token::TokenService;

/// Login, registration, refresh and logout
pub struct AuthService<S: TokenStore, A: Authenticator> {
    /// Credential checks and user creation
    authenticator: Arc<A>,
    /// Token service for session management
    token_service: Arc<TokenService<S, A>>,
}

impl<S: TokenStore, A: Authenticator> AuthService<S, A> {
    pub fn new(authenticator: Arc<A>, token_service: Arc<TokenService<S, A>>) -> Self {
        Self {
            authenticator,
            token_service,
        }
    }

    pub fn token_service(&self) -> &Arc<TokenService<S, A>> {
        &self.token_service
    }

    /// Check credentials and open a new session
    pub async fn login(&self, email: &str, password: &str, user_agent: &str) -> DomainResult<TokenPair> {
        let user_id = match self.authenticator.check_credentials(email, password).await {
            Ok(user_id) => user_id,
            Err(e) => {
                warn!("Login failed: {}", e);
                return Err(e);
            }
        };

        let pair = self.token_service.issue_pair(user_id, user_agent).await?;
        info!(user_id, "User logged in");
        Ok(pair)
    }

    /// Create an account and open its first session
    pub async fn register(&self, email: &str, password: &str, user_agent: &str) -> DomainResult<TokenPair> {
        let user_id = self.authenticator.register(email, password).await?;
        info!(user_id, "User registered");

        self.token_service.issue_pair(user_id, user_agent).await
    }

    /// Exchange a refresh token for a new pair
    pub async fn refresh(&self, refresh_token: &str, user_agent: &str) -> DomainResult<TokenPair> {
        self.token_service.rotate(refresh_token, user_agent).await
    }

    /// End the session the access token belongs to
    pub async fn logout(&self, access_token: &str) -> Result<(), DomainError> {
        self.token_service.revoke_access(access_token, true).await
    }

    /// End every session of the user
    pub async fn logout_all(&self, user_id: UserId) -> Result<usize, DomainError> {
        self.token_service.revoke_all_for_user(user_id).await
    }
}
