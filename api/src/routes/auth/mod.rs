//! Authentication route handlers
//!
//! - Registration and login with email and password
//! - Token refresh
//! - Logout of one session or all of them
//!
//! Issued tokens travel in response headers only: the access token in
//! `Authorization: Bearer <token>` and the refresh token in
//! `Refresh-Authorization: <token>`.

pub mod login;
pub mod logout;
pub mod refresh;
pub mod register;

use std::sync::Arc;

use actix_web::http::header::{AUTHORIZATION, USER_AGENT};
use actix_web::{HttpRequest, HttpResponse};

use gw_core::domain::entities::token::TokenPair;
use gw_core::repositories::{Authenticator, TokenStore};
use gw_core::services::auth::AuthService;
use gw_core::services::token::TokenService;

use crate::dto::MessageResponse;

pub use login::login;
pub use logout::{logout, logout_all};
pub use refresh::refresh;
pub use register::register;

/// Response header carrying the refresh token
pub const REFRESH_AUTHORIZATION: &str = "Refresh-Authorization";

/// Logout is the one gated route that accepts an expired access token
pub const LOGOUT_PATH: &str = "/api/v1/auth/logout";

/// Application state that holds shared services
pub struct AppState<S: TokenStore, A: Authenticator> {
    pub auth_service: Arc<AuthService<S, A>>,
    pub token_service: Arc<TokenService<S, A>>,
    /// Realm reported in `WWW-Authenticate` challenges
    pub realm: String,
}

impl<S: TokenStore, A: Authenticator> AppState<S, A> {
    pub fn new(auth_service: Arc<AuthService<S, A>>, realm: impl Into<String>) -> Self {
        Self {
            token_service: Arc::clone(auth_service.token_service()),
            auth_service,
            realm: realm.into(),
        }
    }
}

/// The client's `User-Agent`, empty when absent or not valid text
pub(crate) fn user_agent(req: &HttpRequest) -> &str {
    req.headers()
        .get(USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}

/// 200 response carrying a freshly issued pair in the token headers
pub(crate) fn token_response(pair: &TokenPair, message: &str) -> HttpResponse {
    HttpResponse::Ok()
        .insert_header((AUTHORIZATION, format!("Bearer {}", pair.access_token.token)))
        .insert_header((REFRESH_AUTHORIZATION, pair.refresh_token.token.as_str()))
        .json(MessageResponse::new(message))
}
