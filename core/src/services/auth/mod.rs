//! Authentication service module
//!
//! Credential-based login and registration, session refresh and logout,
//! on top of the token lifecycle service.

pub mod password;
mod service;

#[cfg(test)]
mod tests;

pub use service::AuthService;
