//! Token lifecycle engine: issuance, validation, revocation and rotation.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::entities::token::{
    AccessToken, Claims, RefreshToken, TokenKind, TokenPair, ValidatedToken,
};
use crate::domain::entities::user::UserId;
use crate::errors::{DomainError, TokenError};
use crate::repositories::{Authenticator, TokenStore};

use super::clock::{Clock, SystemClock};
use super::codec::TokenCodec;
use super::config::TokenServiceConfig;

/// Service for minting, validating and revoking session tokens.
///
/// A token is valid only while it verifies, has not expired, is still
/// present in the store, and belongs to a principal that still exists.
/// Removing a record from the store is the only way to revoke a token.
pub struct TokenService<S: TokenStore, A: Authenticator> {
    store: Arc<S>,
    authenticator: Arc<A>,
    codec: TokenCodec,
    config: TokenServiceConfig,
    clock: Arc<dyn Clock>,
}

impl<S: TokenStore, A: Authenticator> TokenService<S, A> {
    /// Creates a token service using the system clock
    pub fn new(store: Arc<S>, authenticator: Arc<A>, config: TokenServiceConfig) -> Self {
        Self::with_clock(store, authenticator, config, Arc::new(SystemClock))
    }

    /// Creates a token service with an explicit time source
    pub fn with_clock(
        store: Arc<S>,
        authenticator: Arc<A>,
        config: TokenServiceConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let codec = TokenCodec::new(config.jwt_secret.as_bytes());
        Self {
            store,
            authenticator,
            codec,
            config,
            clock,
        }
    }

    pub fn config(&self) -> &TokenServiceConfig {
        &self.config
    }

    /// Issues a new session for a user: a refresh token, then an access
    /// token bound to it.
    ///
    /// If the access token cannot be stored the refresh token stays behind
    /// without children; it is still a valid session and can be rotated.
    ///
    /// # Returns
    ///
    /// * `Ok(TokenPair)` - The stored pair
    /// * `Err(DomainError)` - Signing failed or the store rejected a record
    pub async fn issue_pair(&self, user_id: UserId, user_agent: &str) -> Result<TokenPair, DomainError> {
        let now = self.clock.now();

        let refresh_token = self.generate_refresh_token(user_id, user_agent, now).await?;
        let access_token = self
            .generate_access_token(user_id, refresh_token.id, user_agent, now)
            .await?;

        info!(
            user_id,
            refresh_token_id = %refresh_token.id,
            "Issued token pair"
        );

        Ok(TokenPair::new(access_token, refresh_token))
    }

    async fn generate_refresh_token(
        &self,
        user_id: UserId,
        user_agent: &str,
        now: DateTime<Utc>,
    ) -> Result<RefreshToken, DomainError> {
        let claims = Claims::new(user_id, TokenKind::Refresh, now, self.config.refresh_token_ttl);
        let token = self.codec.sign(&claims)?;

        let record = RefreshToken::new(user_id, user_agent, token, claims.expires_at(), now);
        self.store.save_refresh(record).await
    }

    async fn generate_access_token(
        &self,
        user_id: UserId,
        refresh_token_id: Uuid,
        user_agent: &str,
        now: DateTime<Utc>,
    ) -> Result<AccessToken, DomainError> {
        let claims = Claims::new(user_id, TokenKind::Access, now, self.config.access_token_ttl);
        let token = self.codec.sign(&claims)?;

        let record = AccessToken::new(
            user_id,
            refresh_token_id,
            user_agent,
            token,
            claims.expires_at(),
            now,
        );
        self.store.save_access(record).await
    }

    /// Validates a token of either kind.
    ///
    /// Checks run in order and the first failure wins: signature and shape,
    /// expiry (skipped when `allow_expired`), presence in the store, then
    /// ownership and principal existence.
    ///
    /// # Returns
    ///
    /// * `Ok(ValidatedToken)` - Subject and kind of the token
    /// * `Err(DomainError::Token(..))` - `Invalid`, `Expired`, `NotFound` or `UserInvalid`
    pub async fn validate(&self, token: &str, allow_expired: bool) -> Result<ValidatedToken, DomainError> {
        let claims = self.codec.verify(token)?;

        if !allow_expired && claims.is_expired_at(self.clock.now()) {
            debug!(user_id = claims.sub, kind = %claims.kind, "Token expired");
            return Err(TokenError::Expired.into());
        }

        let owner = match claims.kind {
            TokenKind::Access => self
                .store
                .find_access_by_token(token)
                .await?
                .map(|record| record.user_id),
            TokenKind::Refresh => self
                .store
                .find_refresh_by_token(token)
                .await?
                .map(|record| record.user_id),
        };

        let owner = owner.ok_or(TokenError::NotFound)?;
        if owner != claims.sub {
            warn!(
                claimed = claims.sub,
                stored = owner,
                "Token subject does not match stored owner"
            );
            return Err(TokenError::UserInvalid.into());
        }

        if !self.authenticator.principal_exists(claims.sub).await? {
            debug!(user_id = claims.sub, "Token belongs to a removed principal");
            return Err(TokenError::UserInvalid.into());
        }

        Ok(ValidatedToken {
            user_id: claims.sub,
            kind: claims.kind,
        })
    }

    /// Revokes one access token. With `cascade_to_refresh` the whole
    /// session is revoked instead: the parent refresh token and every
    /// access token issued with it.
    ///
    /// Unknown tokens are treated as already revoked.
    pub async fn revoke_access(&self, token: &str, cascade_to_refresh: bool) -> Result<(), DomainError> {
        let Some(access_token) = self.store.find_access_by_token(token).await? else {
            debug!("Access token already revoked");
            return Ok(());
        };

        if cascade_to_refresh {
            if let Some(parent) = self
                .store
                .find_refresh_by_id(access_token.refresh_token_id)
                .await?
            {
                return self.revoke_refresh(&parent.token).await;
            }
        }

        self.store.delete_access_by_token(token).await?;
        info!(
            user_id = access_token.user_id,
            access_token_id = %access_token.id,
            "Revoked access token"
        );
        Ok(())
    }

    /// Revokes a refresh token and every access token issued with it.
    ///
    /// Unknown tokens are treated as already revoked.
    pub async fn revoke_refresh(&self, token: &str) -> Result<(), DomainError> {
        let Some(refresh_token) = self.store.find_refresh_by_token(token).await? else {
            debug!("Refresh token already revoked");
            return Ok(());
        };

        if self.store.delete_refresh_cascade(refresh_token.id).await? {
            info!(
                user_id = refresh_token.user_id,
                refresh_token_id = %refresh_token.id,
                "Revoked session"
            );
        }
        Ok(())
    }

    /// Exchanges a valid refresh token for a brand-new pair.
    ///
    /// The presented session is revoked before the new one is issued, and
    /// only the caller whose revocation actually removed it may continue,
    /// so one refresh token yields at most one new pair.
    ///
    /// # Returns
    ///
    /// * `Ok(TokenPair)` - The replacement pair
    /// * `Err(DomainError::Token(TokenError::WrongKind { .. }))` - An access token was presented
    /// * `Err(DomainError::Token(TokenError::NotFound))` - Already rotated or revoked
    pub async fn rotate(&self, refresh_token: &str, user_agent: &str) -> Result<TokenPair, DomainError> {
        let validated = self.validate(refresh_token, false).await?;
        if validated.kind != TokenKind::Refresh {
            return Err(TokenError::WrongKind {
                expected: TokenKind::Refresh,
                actual: validated.kind,
            }
            .into());
        }

        let record = self
            .store
            .find_refresh_by_token(refresh_token)
            .await?
            .ok_or(TokenError::NotFound)?;

        if !self.store.delete_refresh_cascade(record.id).await? {
            warn!(
                user_id = validated.user_id,
                refresh_token_id = %record.id,
                "Refresh token was rotated concurrently"
            );
            return Err(TokenError::NotFound.into());
        }

        debug!(user_id = validated.user_id, "Rotating session");
        self.issue_pair(validated.user_id, user_agent).await
    }

    /// Revokes every session of a user
    ///
    /// # Returns
    ///
    /// The number of sessions this call removed
    pub async fn revoke_all_for_user(&self, user_id: UserId) -> Result<usize, DomainError> {
        let sessions = self.store.find_refresh_by_user(user_id).await?;

        let mut revoked = 0;
        for session in sessions {
            if self.store.delete_refresh_cascade(session.id).await? {
                revoked += 1;
            }
        }

        info!(user_id, revoked, "Revoked all sessions");
        Ok(revoked)
    }

    /// Deletes every stored token that has expired
    pub async fn cleanup_expired(&self) -> Result<usize, DomainError> {
        self.store.delete_expired(self.clock.now()).await
    }
}
