//! # Gateway Core
//!
//! Core business logic and domain layer for the gateway backend.
//! This crate contains the token entities, the token codec and lifecycle
//! engine, the capability traits the engine consumes (`TokenStore`,
//! `Authenticator`) with in-memory implementations, and the error types.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
