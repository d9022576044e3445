use actix_web::http::header::AUTHORIZATION;
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse};

use gw_core::repositories::{Authenticator, TokenStore};

use crate::dto::ErrorResponse;
use crate::handlers::error::handle_domain_error;

use super::{token_response, user_agent, AppState};

/// Handler for POST /api/v1/auth/refresh
///
/// Exchanges the refresh token presented as `Authorization: Bearer <token>`
/// for a new pair. The old refresh token and its access tokens are revoked;
/// of two concurrent refreshes with the same token only one succeeds.
///
/// # Response
///
/// ## Success (200 OK)
/// New tokens in the `Authorization` and `Refresh-Authorization` headers.
/// ```json
/// {
///     "message": "Refresh success"
/// }
/// ```
///
/// ## Errors
/// - 401 Unauthorized: Missing, invalid, expired, revoked or non-refresh token
pub async fn refresh<S, A>(req: HttpRequest, state: web::Data<AppState<S, A>>) -> HttpResponse
where
    S: TokenStore + 'static,
    A: Authenticator + 'static,
{
    let Some(refresh_token) = bearer_token(&req) else {
        return ErrorResponse::new(
            "missing_authorization",
            "Missing or invalid Authorization header",
        )
        .to_response(StatusCode::UNAUTHORIZED);
    };

    match state.auth_service.refresh(refresh_token, user_agent(&req)).await {
        Ok(pair) => token_response(&pair, "Refresh success"),
        Err(error) => handle_domain_error(&error),
    }
}

fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
