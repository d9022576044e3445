//! In-memory implementation of TokenStore

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::token::{AccessToken, RefreshToken};
use crate::domain::entities::user::UserId;
use crate::errors::{DomainError, TokenError};

use super::r#trait::TokenStore;

#[derive(Default)]
struct Tables {
    /// Refresh tokens keyed by record id
    refresh: HashMap<Uuid, RefreshToken>,
    /// Access tokens keyed by record id
    access: HashMap<Uuid, AccessToken>,
    /// Token string to record id, shared by both kinds
    index: HashMap<String, Uuid>,
}

impl Tables {
    fn remove_access(&mut self, id: Uuid) -> bool {
        match self.access.remove(&id) {
            Some(token) => {
                self.index.remove(&token.token);
                true
            }
            None => false,
        }
    }

    /// Children first, then the parent
    fn remove_refresh_cascade(&mut self, id: Uuid) -> (bool, usize) {
        let children: Vec<Uuid> = self
            .access
            .values()
            .filter(|t| t.refresh_token_id == id)
            .map(|t| t.id)
            .collect();
        let mut removed = 0;
        for child in children {
            if self.remove_access(child) {
                removed += 1;
            }
        }

        match self.refresh.remove(&id) {
            Some(token) => {
                self.index.remove(&token.token);
                (true, removed + 1)
            }
            None => (false, removed),
        }
    }
}

/// Token store backed by process memory.
///
/// All tables sit behind one lock, so a cascade delete is observed either
/// completely or not at all.
#[derive(Clone)]
pub struct InMemoryTokenStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryTokenStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            tables: Arc::new(RwLock::new(Tables::default())),
        }
    }

    /// Number of stored access tokens
    pub async fn access_count(&self) -> usize {
        self.tables.read().await.access.len()
    }

    /// Number of stored refresh tokens
    pub async fn refresh_count(&self) -> usize {
        self.tables.read().await.refresh.len()
    }
}

impl Default for InMemoryTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn save_refresh(&self, token: RefreshToken) -> Result<RefreshToken, DomainError> {
        let mut tables = self.tables.write().await;

        if tables.index.contains_key(&token.token) {
            return Err(TokenError::Duplicate.into());
        }

        tables.index.insert(token.token.clone(), token.id);
        tables.refresh.insert(token.id, token.clone());
        Ok(token)
    }

    async fn save_access(&self, token: AccessToken) -> Result<AccessToken, DomainError> {
        let mut tables = self.tables.write().await;

        if tables.index.contains_key(&token.token) {
            return Err(TokenError::Duplicate.into());
        }
        if !tables.refresh.contains_key(&token.refresh_token_id) {
            return Err(DomainError::Validation {
                message: format!("refresh token {} does not exist", token.refresh_token_id),
            });
        }

        tables.index.insert(token.token.clone(), token.id);
        tables.access.insert(token.id, token.clone());
        Ok(token)
    }

    async fn find_access_by_token(&self, token: &str) -> Result<Option<AccessToken>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables
            .index
            .get(token)
            .and_then(|id| tables.access.get(id))
            .cloned())
    }

    async fn find_refresh_by_token(&self, token: &str) -> Result<Option<RefreshToken>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables
            .index
            .get(token)
            .and_then(|id| tables.refresh.get(id))
            .cloned())
    }

    async fn find_refresh_by_id(&self, id: Uuid) -> Result<Option<RefreshToken>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables.refresh.get(&id).cloned())
    }

    async fn find_access_by_refresh_id(
        &self,
        refresh_token_id: Uuid,
    ) -> Result<Vec<AccessToken>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables
            .access
            .values()
            .filter(|t| t.refresh_token_id == refresh_token_id)
            .cloned()
            .collect())
    }

    async fn find_refresh_by_user(&self, user_id: UserId) -> Result<Vec<RefreshToken>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables
            .refresh
            .values()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn delete_access_by_token(&self, token: &str) -> Result<bool, DomainError> {
        let mut tables = self.tables.write().await;

        let id = match tables.index.get(token) {
            Some(id) => *id,
            None => return Ok(false),
        };
        Ok(tables.remove_access(id))
    }

    async fn delete_refresh_cascade(&self, refresh_token_id: Uuid) -> Result<bool, DomainError> {
        let mut tables = self.tables.write().await;
        let (parent_removed, _) = tables.remove_refresh_cascade(refresh_token_id);
        Ok(parent_removed)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<usize, DomainError> {
        let mut tables = self.tables.write().await;

        let expired_refresh: Vec<Uuid> = tables
            .refresh
            .values()
            .filter(|t| t.is_expired_at(now))
            .map(|t| t.id)
            .collect();
        let mut removed = 0;
        for id in expired_refresh {
            removed += tables.remove_refresh_cascade(id).1;
        }

        let expired_access: Vec<Uuid> = tables
            .access
            .values()
            .filter(|t| t.is_expired_at(now))
            .map(|t| t.id)
            .collect();
        for id in expired_access {
            if tables.remove_access(id) {
                removed += 1;
            }
        }

        Ok(removed)
    }
}
