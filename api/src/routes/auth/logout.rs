use actix_web::{web, HttpResponse};

use gw_core::repositories::{Authenticator, TokenStore};

use crate::dto::{LogoutAllResponse, MessageResponse};
use crate::handlers::error::handle_domain_error;
use crate::middleware::auth::AuthContext;

use super::AppState;

/// Handler for POST /api/v1/auth/logout
///
/// Revokes the presented access token together with the refresh token it
/// was issued with and every sibling access token. The gate lets expired
/// access tokens through on this route.
///
/// # Headers
///
/// ```text
/// Authorization: Bearer {access_token}
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "message": "Logout success"
/// }
/// ```
pub async fn logout<S, A>(state: web::Data<AppState<S, A>>, auth: AuthContext) -> HttpResponse
where
    S: TokenStore + 'static,
    A: Authenticator + 'static,
{
    match state.auth_service.logout(&auth.access_token).await {
        Ok(()) => HttpResponse::Ok().json(MessageResponse::new("Logout success")),
        Err(error) => handle_domain_error(&error),
    }
}

/// Handler for POST /api/v1/auth/logout-all
///
/// Revokes every session of the authenticated user, on all devices.
pub async fn logout_all<S, A>(state: web::Data<AppState<S, A>>, auth: AuthContext) -> HttpResponse
where
    S: TokenStore + 'static,
    A: Authenticator + 'static,
{
    match state.auth_service.logout_all(auth.user_id).await {
        Ok(sessions_revoked) => HttpResponse::Ok().json(LogoutAllResponse {
            message: "Logout success".to_string(),
            sessions_revoked,
        }),
        Err(error) => handle_domain_error(&error),
    }
}
