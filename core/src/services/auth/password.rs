//! Password hashing via bcrypt.

use tracing::error;

use crate::errors::AuthError;

/// bcrypt cost factor used outside of tests.
pub const DEFAULT_BCRYPT_COST: u32 = bcrypt::DEFAULT_COST;

/// Hash a password with bcrypt at the given cost.
pub fn hash_password(password: &str, cost: u32) -> Result<String, AuthError> {
    bcrypt::hash(password, cost).map_err(|e| {
        error!("bcrypt hash failed: {}", e);
        AuthError::HashingFailed
    })
}

/// Verify a password against a bcrypt hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    bcrypt::verify(password, hash).map_err(|e| {
        error!("bcrypt verify failed: {}", e);
        AuthError::HashingFailed
    })
}
