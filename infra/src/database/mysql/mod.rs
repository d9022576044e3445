//! MySQL implementations of the core capability traits

mod token_store;
mod user_store;

pub use token_store::MySqlTokenStore;
pub use user_store::MySqlUserStore;

use gw_core::errors::DomainError;

/// Backend failure: the caller sees the store as unavailable
pub(crate) fn store_error(context: &str, e: sqlx::Error) -> DomainError {
    tracing::error!("{}: {}", context, e);
    DomainError::StoreUnavailable {
        message: format!("{}: {}", context, e),
    }
}

/// A row came back in a shape we cannot map
pub(crate) fn column_error(column: &str, e: impl std::fmt::Display) -> DomainError {
    DomainError::Internal {
        message: format!("Failed to get {}: {}", column, e),
    }
}

pub(crate) fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_unique_violation())
}

pub(crate) fn is_foreign_key_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_foreign_key_violation())
}
