//! Error types for credentials, token lifecycle and token encoding.

use thiserror::Error;

use crate::domain::entities::token::TokenKind;

/// Credential and account errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User already exists")]
    UserAlreadyExists,

    #[error("Password hashing failed")]
    HashingFailed,
}

/// Failures to decode or verify a signed token
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Structurally unparseable, missing required claims, or inconsistent timestamps
    #[error("Token is malformed")]
    Malformed,

    /// Well-formed but not signed by our key, or signed with another algorithm
    #[error("Token signature verification failed")]
    BadSignature,
}

/// Token lifecycle errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token is invalid: {0}")]
    Invalid(CodecError),

    #[error("Token expired")]
    Expired,

    #[error("Token does not belong to a valid user")]
    UserInvalid,

    #[error("Token not found")]
    NotFound,

    #[error("Expected a {expected} token but got a {actual} token")]
    WrongKind { expected: TokenKind, actual: TokenKind },

    #[error("Token already stored")]
    Duplicate,

    #[error("Token generation failed")]
    GenerationFailed,
}
