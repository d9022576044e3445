//! Authenticator trait: the credential capability the lifecycle engine consumes.

use async_trait::async_trait;

use crate::domain::entities::user::UserId;
use crate::errors::DomainError;

/// Credential checks and principal lookup
///
/// The token engine only needs `principal_exists`; the login and
/// registration flows use the other two.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Verify an identifier/secret pair
    ///
    /// # Returns
    /// * `Ok(UserId)` - Credentials are valid
    /// * `Err(DomainError::Auth(AuthError::InvalidCredentials))` - Unknown identifier or wrong secret
    async fn check_credentials(&self, identifier: &str, secret: &str) -> Result<UserId, DomainError>;

    /// Whether the principal is still known
    async fn principal_exists(&self, user_id: UserId) -> Result<bool, DomainError>;

    /// Create a principal
    ///
    /// # Returns
    /// * `Ok(UserId)` - The new principal's id
    /// * `Err(DomainError::Auth(AuthError::UserAlreadyExists))` - Identifier is taken
    async fn register(&self, identifier: &str, secret: &str) -> Result<UserId, DomainError>;
}
