pub mod auth;
pub mod error;

pub use auth::{CredentialsRequest, CurrentUserResponse, LogoutAllResponse, MessageResponse};
pub use error::ErrorResponse;
