//! Token store trait defining the persistence contract for issued tokens.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::token::{AccessToken, RefreshToken};
use crate::domain::entities::user::UserId;
use crate::errors::DomainError;

/// Persistence contract for access and refresh token records
///
/// Implementations must keep token strings unique across both kinds and
/// must never hold an access token whose parent refresh token is gone.
/// Backend failures are reported as `DomainError::StoreUnavailable`;
/// a record that does not exist is `Ok(None)`, never an error.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Persist a refresh token record
    ///
    /// # Returns
    /// * `Ok(RefreshToken)` - The stored record
    /// * `Err(DomainError::Token(TokenError::Duplicate))` - Token string already stored
    async fn save_refresh(&self, token: RefreshToken) -> Result<RefreshToken, DomainError>;

    /// Persist an access token record; its parent refresh token must exist
    async fn save_access(&self, token: AccessToken) -> Result<AccessToken, DomainError>;

    async fn find_access_by_token(&self, token: &str) -> Result<Option<AccessToken>, DomainError>;

    async fn find_refresh_by_token(&self, token: &str) -> Result<Option<RefreshToken>, DomainError>;

    async fn find_refresh_by_id(&self, id: Uuid) -> Result<Option<RefreshToken>, DomainError>;

    /// All access tokens issued with the given refresh token
    async fn find_access_by_refresh_id(
        &self,
        refresh_token_id: Uuid,
    ) -> Result<Vec<AccessToken>, DomainError>;

    /// All refresh tokens (open sessions) of a user
    async fn find_refresh_by_user(&self, user_id: UserId) -> Result<Vec<RefreshToken>, DomainError>;

    /// Delete one access token record
    ///
    /// # Returns
    /// * `Ok(true)` - A record was removed
    /// * `Ok(false)` - No record matched
    async fn delete_access_by_token(&self, token: &str) -> Result<bool, DomainError>;

    /// Delete a refresh token together with every access token issued with it.
    ///
    /// The children go first and the whole operation is atomic. Returns
    /// `true` only for the call that actually removed the refresh record,
    /// so concurrent callers can tell which one won.
    async fn delete_refresh_cascade(&self, refresh_token_id: Uuid) -> Result<bool, DomainError>;

    /// Remove every record that is expired at `now`, refresh tokens with
    /// their children. Returns the number of records removed.
    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<usize, DomainError>;

    /// Number of open sessions of a user
    async fn count_sessions(&self, user_id: UserId) -> Result<usize, DomainError> {
        Ok(self.find_refresh_by_user(user_id).await?.len())
    }
}
