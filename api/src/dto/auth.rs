use serde::{Deserialize, Serialize};
use validator::Validate;

/// Body of the login and register endpoints
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CredentialsRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 6, max = 72))]
    pub password: String,
}

/// Tokens travel in headers; bodies only carry a message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogoutAllResponse {
    pub message: String,
    pub sessions_revoked: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUserResponse {
    pub user_id: u64,
}
