//! Domain entities representing core business objects.

pub mod token;
pub mod user;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use token::{AccessToken, Claims, RefreshToken, TokenKind, TokenPair, ValidatedToken};
pub use user::{User, UserId};
