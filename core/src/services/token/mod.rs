//! Token service module for JWT session management
//!
//! This module handles all token-related operations including:
//! - Signing and verifying token strings
//! - Issuing, validating, rotating and revoking token pairs
//! - Background cleanup of expired tokens

mod cleanup;
mod clock;
mod codec;
mod config;
mod service;


pub use cleanup::{CleanupResult, TokenCleanupConfig, TokenCleanupService};
pub use clock::{Clock, ManualClock, SystemClock};
pub use codec::TokenCodec;
pub use config::TokenServiceConfig;
pub use service::TokenService;
