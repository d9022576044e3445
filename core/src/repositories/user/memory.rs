//! In-memory implementation of Authenticator

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::user::{normalize_email, User, UserId};
use crate::errors::{AuthError, DomainError};
use crate::services::auth::password;

use super::r#trait::Authenticator;

struct Users {
    by_id: HashMap<UserId, User>,
    next_id: UserId,
}

/// User store backed by process memory
#[derive(Clone)]
pub struct InMemoryAuthenticator {
    users: Arc<RwLock<Users>>,
    bcrypt_cost: u32,
}

impl InMemoryAuthenticator {
    pub fn new() -> Self {
        Self::with_cost(password::DEFAULT_BCRYPT_COST)
    }

    /// Use a custom bcrypt cost; tests use the minimum to stay fast
    pub fn with_cost(bcrypt_cost: u32) -> Self {
        Self {
            users: Arc::new(RwLock::new(Users {
                by_id: HashMap::new(),
                next_id: 1,
            })),
            bcrypt_cost,
        }
    }

    /// Remove a principal, e.g. an account deleted out of band
    pub async fn remove(&self, user_id: UserId) -> bool {
        self.users.write().await.by_id.remove(&user_id).is_some()
    }

    pub async fn find_by_id(&self, user_id: UserId) -> Option<User> {
        self.users.read().await.by_id.get(&user_id).cloned()
    }
}

impl Default for InMemoryAuthenticator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Authenticator for InMemoryAuthenticator {
    async fn check_credentials(&self, identifier: &str, secret: &str) -> Result<UserId, DomainError> {
        let email = normalize_email(identifier);
        let user = {
            let users = self.users.read().await;
            users.by_id.values().find(|u| u.email == email).cloned()
        };

        match user {
            Some(user) if password::verify_password(secret, &user.password_hash)? => Ok(user.id),
            _ => Err(AuthError::InvalidCredentials.into()),
        }
    }

    async fn principal_exists(&self, user_id: UserId) -> Result<bool, DomainError> {
        Ok(self.users.read().await.by_id.contains_key(&user_id))
    }

    async fn register(&self, identifier: &str, secret: &str) -> Result<UserId, DomainError> {
        let email = normalize_email(identifier);
        let password_hash = password::hash_password(secret, self.bcrypt_cost)?;

        let mut users = self.users.write().await;
        if users.by_id.values().any(|u| u.email == email) {
            return Err(AuthError::UserAlreadyExists.into());
        }

        let id = users.next_id;
        users.next_id += 1;
        users.by_id.insert(id, User::new(id, &email, password_hash));
        Ok(id)
    }
}
