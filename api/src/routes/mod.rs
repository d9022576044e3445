//! Route handlers grouped by resource

pub mod auth;
pub mod users;

pub use auth::AppState;
