//! MySQL implementation of the TokenStore trait.
//!
//! Access and refresh tokens live in separate tables. Access tokens carry a
//! foreign key to their refresh token; cascade deletion still removes the
//! children explicitly, inside the same transaction as the parent.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::mysql::MySqlRow;
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use gw_core::domain::entities::token::{AccessToken, RefreshToken};
use gw_core::domain::entities::user::UserId;
use gw_core::errors::{DomainError, TokenError};
use gw_core::repositories::TokenStore;

use super::{column_error, is_foreign_key_violation, is_unique_violation, store_error};

const REFRESH_COLUMNS: &str = "id, user_id, user_agent, token_string, expires_at, created_at";
const ACCESS_COLUMNS: &str =
    "id, user_id, refresh_token_id, user_agent, token_string, expires_at, created_at";

/// MySQL implementation of TokenStore
#[derive(Clone)]
pub struct MySqlTokenStore {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlTokenStore {
    /// Create a new MySQL token store
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn parse_uuid(row: &MySqlRow, column: &str) -> Result<Uuid, DomainError> {
        let raw: String = row.try_get(column).map_err(|e| column_error(column, e))?;
        Uuid::parse_str(&raw).map_err(|e| column_error(column, e))
    }

    fn row_to_refresh(row: &MySqlRow) -> Result<RefreshToken, DomainError> {
        Ok(RefreshToken {
            id: Self::parse_uuid(row, "id")?,
            user_id: row.try_get("user_id").map_err(|e| column_error("user_id", e))?,
            user_agent: row
                .try_get("user_agent")
                .map_err(|e| column_error("user_agent", e))?,
            token: row
                .try_get("token_string")
                .map_err(|e| column_error("token_string", e))?,
            expires_at: row
                .try_get::<DateTime<Utc>, _>("expires_at")
                .map_err(|e| column_error("expires_at", e))?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| column_error("created_at", e))?,
        })
    }

    fn row_to_access(row: &MySqlRow) -> Result<AccessToken, DomainError> {
        Ok(AccessToken {
            id: Self::parse_uuid(row, "id")?,
            user_id: row.try_get("user_id").map_err(|e| column_error("user_id", e))?,
            refresh_token_id: Self::parse_uuid(row, "refresh_token_id")?,
            user_agent: row
                .try_get("user_agent")
                .map_err(|e| column_error("user_agent", e))?,
            token: row
                .try_get("token_string")
                .map_err(|e| column_error("token_string", e))?,
            expires_at: row
                .try_get::<DateTime<Utc>, _>("expires_at")
                .map_err(|e| column_error("expires_at", e))?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| column_error("created_at", e))?,
        })
    }

    /// Token strings must not collide across the two tables either
    async fn token_exists_in(&self, table: &str, token: &str) -> Result<bool, DomainError> {
        let query = format!("SELECT COUNT(*) FROM {} WHERE token_string = ?", table);
        let count: i64 = sqlx::query_scalar(&query)
            .bind(token)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| store_error("Failed to check token existence", e))?;
        Ok(count > 0)
    }
}

#[async_trait]
impl TokenStore for MySqlTokenStore {
    async fn save_refresh(&self, token: RefreshToken) -> Result<RefreshToken, DomainError> {
        if self.token_exists_in("access_tokens", &token.token).await? {
            return Err(TokenError::Duplicate.into());
        }

        let query = r#"
            INSERT INTO refresh_tokens (
                id, user_id, user_agent, token_string, expires_at, created_at
            ) VALUES (?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(token.id.to_string())
            .bind(token.user_id)
            .bind(&token.user_agent)
            .bind(&token.token)
            .bind(token.expires_at)
            .bind(token.created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    DomainError::Token(TokenError::Duplicate)
                } else if is_foreign_key_violation(&e) {
                    DomainError::Validation {
                        message: format!("user {} does not exist", token.user_id),
                    }
                } else {
                    store_error("Failed to save refresh token", e)
                }
            })?;

        Ok(token)
    }

    async fn save_access(&self, token: AccessToken) -> Result<AccessToken, DomainError> {
        if self.token_exists_in("refresh_tokens", &token.token).await? {
            return Err(TokenError::Duplicate.into());
        }

        let query = r#"
            INSERT INTO access_tokens (
                id, user_id, refresh_token_id, user_agent, token_string, expires_at, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(token.id.to_string())
            .bind(token.user_id)
            .bind(token.refresh_token_id.to_string())
            .bind(&token.user_agent)
            .bind(&token.token)
            .bind(token.expires_at)
            .bind(token.created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    DomainError::Token(TokenError::Duplicate)
                } else if is_foreign_key_violation(&e) {
                    DomainError::Validation {
                        message: format!("refresh token {} does not exist", token.refresh_token_id),
                    }
                } else {
                    store_error("Failed to save access token", e)
                }
            })?;

        Ok(token)
    }

    async fn find_access_by_token(&self, token: &str) -> Result<Option<AccessToken>, DomainError> {
        let query = format!(
            "SELECT {} FROM access_tokens WHERE token_string = ? LIMIT 1",
            ACCESS_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| store_error("Failed to find access token", e))?;

        row.as_ref().map(Self::row_to_access).transpose()
    }

    async fn find_refresh_by_token(&self, token: &str) -> Result<Option<RefreshToken>, DomainError> {
        let query = format!(
            "SELECT {} FROM refresh_tokens WHERE token_string = ? LIMIT 1",
            REFRESH_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| store_error("Failed to find refresh token", e))?;

        row.as_ref().map(Self::row_to_refresh).transpose()
    }

    async fn find_refresh_by_id(&self, id: Uuid) -> Result<Option<RefreshToken>, DomainError> {
        let query = format!("SELECT {} FROM refresh_tokens WHERE id = ?", REFRESH_COLUMNS);

        let row = sqlx::query(&query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| store_error("Failed to find refresh token by id", e))?;

        row.as_ref().map(Self::row_to_refresh).transpose()
    }

    async fn find_access_by_refresh_id(
        &self,
        refresh_token_id: Uuid,
    ) -> Result<Vec<AccessToken>, DomainError> {
        let query = format!(
            "SELECT {} FROM access_tokens WHERE refresh_token_id = ? ORDER BY created_at",
            ACCESS_COLUMNS
        );

        let rows = sqlx::query(&query)
            .bind(refresh_token_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| store_error("Failed to find access tokens", e))?;

        rows.iter().map(Self::row_to_access).collect()
    }

    async fn find_refresh_by_user(&self, user_id: UserId) -> Result<Vec<RefreshToken>, DomainError> {
        let query = format!(
            "SELECT {} FROM refresh_tokens WHERE user_id = ? ORDER BY created_at DESC",
            REFRESH_COLUMNS
        );

        let rows = sqlx::query(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| store_error("Failed to find user sessions", e))?;

        rows.iter().map(Self::row_to_refresh).collect()
    }

    async fn delete_access_by_token(&self, token: &str) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM access_tokens WHERE token_string = ?")
            .bind(token)
            .execute(&self.pool)
            .await
            .map_err(|e| store_error("Failed to delete access token", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_refresh_cascade(&self, refresh_token_id: Uuid) -> Result<bool, DomainError> {
        let id = refresh_token_id.to_string();
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| store_error("Failed to begin transaction", e))?;

        sqlx::query("DELETE FROM access_tokens WHERE refresh_token_id = ?")
            .bind(&id)
            .execute(&mut *tx)
            .await
            .map_err(|e| store_error("Failed to delete access tokens", e))?;

        let result = sqlx::query("DELETE FROM refresh_tokens WHERE id = ?")
            .bind(&id)
            .execute(&mut *tx)
            .await
            .map_err(|e| store_error("Failed to delete refresh token", e))?;

        tx.commit()
            .await
            .map_err(|e| store_error("Failed to commit token deletion", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<usize, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| store_error("Failed to begin transaction", e))?;

        let children = sqlx::query(
            r#"
            DELETE a FROM access_tokens a
            INNER JOIN refresh_tokens r ON a.refresh_token_id = r.id
            WHERE r.expires_at <= ?
            "#,
        )
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(|e| store_error("Failed to delete expired sessions", e))?;

        let parents = sqlx::query("DELETE FROM refresh_tokens WHERE expires_at <= ?")
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(|e| store_error("Failed to delete expired refresh tokens", e))?;

        let access = sqlx::query("DELETE FROM access_tokens WHERE expires_at <= ?")
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(|e| store_error("Failed to delete expired access tokens", e))?;

        tx.commit()
            .await
            .map_err(|e| store_error("Failed to commit expired token cleanup", e))?;

        Ok((children.rows_affected() + parents.rows_affected() + access.rows_affected()) as usize)
    }
}
