//! Domain-specific error types and error handling.

mod types;


pub use types::{AuthError, CodecError, TokenError};

use thiserror::Error;

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Storage unavailable: {message}")]
    StoreUnavailable { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Token(#[from] TokenError),
}

impl DomainError {
    pub fn store_unavailable(message: impl Into<String>) -> Self {
        DomainError::StoreUnavailable {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        DomainError::Internal {
            message: message.into(),
        }
    }

    /// True when the error is a token that failed only because it expired
    pub fn is_token_expired(&self) -> bool {
        matches!(self, DomainError::Token(TokenError::Expired))
    }
}

impl From<CodecError> for DomainError {
    fn from(err: CodecError) -> Self {
        DomainError::Token(TokenError::Invalid(err))
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
