//! Token entities for JWT-based session management.
//!
//! A session is a pair of signed tokens: a long-lived refresh token and a
//! short-lived access token that references the refresh token it was issued
//! with. Both are persisted so that revocation is authoritative.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::UserId;

/// Which side of a session a token belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Access => write!(f, "access"),
            TokenKind::Refresh => write!(f, "refresh"),
        }
    }
}

/// Claims structure for the JWT payload.
///
/// Every field is required when decoding. Timestamps are whole seconds since
/// the Unix epoch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: UserId,

    /// Token kind
    pub kind: TokenKind,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// JWT ID, unique per minted token
    pub jti: String,
}

impl Claims {
    /// Creates claims for a token issued at `issued_at` that lives for `lifetime`.
    ///
    /// The issue time is truncated to whole seconds so that the encoded
    /// claims and the persisted record agree on the expiry instant.
    pub fn new(sub: UserId, kind: TokenKind, issued_at: DateTime<Utc>, lifetime: Duration) -> Self {
        let iat = issued_at.timestamp();
        Self {
            sub,
            kind,
            iat,
            exp: iat + lifetime.num_seconds(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// A token is expired once `now` reaches its expiry second.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        from_epoch_seconds(self.iat)
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        from_epoch_seconds(self.exp)
    }
}

fn from_epoch_seconds(seconds: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(seconds, 0).unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Persisted record of an issued refresh token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshToken {
    /// Unique identifier for the record
    pub id: Uuid,

    /// User who owns this session
    pub user_id: UserId,

    /// User agent of the client that opened the session
    pub user_agent: String,

    /// The signed token string
    pub token: String,

    /// When the token expires
    pub expires_at: DateTime<Utc>,

    /// When the record was created
    pub created_at: DateTime<Utc>,
}

impl RefreshToken {
    pub fn new(
        user_id: UserId,
        user_agent: impl Into<String>,
        token: String,
        expires_at: DateTime<Utc>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            user_agent: user_agent.into(),
            token,
            expires_at,
            created_at,
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Persisted record of an issued access token.
///
/// Every access token belongs to exactly one refresh token; deleting the
/// refresh token deletes its access tokens with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    /// Unique identifier for the record
    pub id: Uuid,

    /// User who owns this session
    pub user_id: UserId,

    /// The refresh token this access token was issued with
    pub refresh_token_id: Uuid,

    /// User agent of the client
    pub user_agent: String,

    /// The signed token string
    pub token: String,

    /// When the token expires
    pub expires_at: DateTime<Utc>,

    /// When the record was created
    pub created_at: DateTime<Utc>,
}

impl AccessToken {
    pub fn new(
        user_id: UserId,
        refresh_token_id: Uuid,
        user_agent: impl Into<String>,
        token: String,
        expires_at: DateTime<Utc>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            refresh_token_id,
            user_agent: user_agent.into(),
            token,
            expires_at,
            created_at,
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// An access/refresh token pair returned by issuance and rotation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: AccessToken,
    pub refresh_token: RefreshToken,
}

impl TokenPair {
    pub fn new(access_token: AccessToken, refresh_token: RefreshToken) -> Self {
        Self {
            access_token,
            refresh_token,
        }
    }

    /// Access token lifetime in seconds
    pub fn access_expires_in(&self) -> i64 {
        (self.access_token.expires_at - self.access_token.created_at).num_seconds()
    }

    /// Refresh token lifetime in seconds
    pub fn refresh_expires_in(&self) -> i64 {
        (self.refresh_token.expires_at - self.refresh_token.created_at).num_seconds()
    }
}

/// Outcome of a successful validation: who the token belongs to and what it is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedToken {
    pub user_id: UserId,
    pub kind: TokenKind,
}
