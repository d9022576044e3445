//! # Infrastructure Layer
//!
//! MySQL-backed implementations of the capabilities the token engine
//! consumes:
//! - **Database**: connection pool management and embedded migrations
//! - **Token store**: access/refresh token records with cascade deletion
//! - **User store**: bcrypt credential checks and registration

// Re-export core types for convenience
pub use gw_core::errors::*;

/// Database module - MySQL implementations using SQLx
pub mod database;

pub use database::{DatabasePool, MySqlTokenStore, MySqlUserStore, PoolStatistics};

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration error
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
