//! User entity backing credential checks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stable identifier of a principal
pub type UserId = u64;

/// A registered user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,

    /// Login identifier, stored lowercase
    pub email: String,

    /// bcrypt hash of the password
    #[serde(skip_serializing)]
    pub password_hash: String,

    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(id: UserId, email: &str, password_hash: String) -> Self {
        Self {
            id,
            email: normalize_email(email),
            password_hash,
            created_at: Utc::now(),
        }
    }
}

/// Canonical form of a login identifier
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
