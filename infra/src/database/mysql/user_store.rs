//! MySQL implementation of the Authenticator trait.

use async_trait::async_trait;
use sqlx::{MySqlPool, Row};

use gw_core::domain::entities::user::{normalize_email, UserId};
use gw_core::errors::{AuthError, DomainError};
use gw_core::repositories::Authenticator;
use gw_core::services::auth::password::{self, DEFAULT_BCRYPT_COST};

use super::{column_error, is_unique_violation, store_error};

/// MySQL implementation of Authenticator over the `users` table
#[derive(Clone)]
pub struct MySqlUserStore {
    pool: MySqlPool,
    bcrypt_cost: u32,
}

impl MySqlUserStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self::with_cost(pool, DEFAULT_BCRYPT_COST)
    }

    pub fn with_cost(pool: MySqlPool, bcrypt_cost: u32) -> Self {
        Self { pool, bcrypt_cost }
    }
}

#[async_trait]
impl Authenticator for MySqlUserStore {
    async fn check_credentials(&self, identifier: &str, secret: &str) -> Result<UserId, DomainError> {
        let row = sqlx::query("SELECT id, password_hash FROM users WHERE email = ? LIMIT 1")
            .bind(normalize_email(identifier))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| store_error("Failed to find user", e))?;

        let Some(row) = row else {
            return Err(AuthError::InvalidCredentials.into());
        };

        let id: UserId = row.try_get("id").map_err(|e| column_error("id", e))?;
        let hash: String = row
            .try_get("password_hash")
            .map_err(|e| column_error("password_hash", e))?;

        if password::verify_password(secret, &hash)? {
            Ok(id)
        } else {
            Err(AuthError::InvalidCredentials.into())
        }
    }

    async fn principal_exists(&self, user_id: UserId) -> Result<bool, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| store_error("Failed to check user existence", e))?;

        Ok(count > 0)
    }

    async fn register(&self, identifier: &str, secret: &str) -> Result<UserId, DomainError> {
        let password_hash = password::hash_password(secret, self.bcrypt_cost)?;

        let result = sqlx::query("INSERT INTO users (email, password_hash, created_at) VALUES (?, ?, ?)")
            .bind(normalize_email(identifier))
            .bind(password_hash)
            .bind(chrono::Utc::now())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    DomainError::Auth(AuthError::UserAlreadyExists)
                } else {
                    store_error("Failed to create user", e)
                }
            })?;

        Ok(result.last_insert_id())
    }
}
