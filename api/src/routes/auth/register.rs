use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use gw_core::repositories::{Authenticator, TokenStore};

use crate::dto::CredentialsRequest;
use crate::handlers::error::{handle_domain_error, handle_validation_error};

use super::{token_response, user_agent, AppState};

/// Handler for POST /api/v1/auth/register
///
/// Creates an account and opens its first session.
///
/// # Request Body
///
/// ```json
/// {
///     "email": "user@example.com",
///     "password": "secret-password"
/// }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// Tokens in the `Authorization` and `Refresh-Authorization` headers.
/// ```json
/// {
///     "message": "Register success"
/// }
/// ```
///
/// ## Errors
/// - 400 Bad Request: Invalid email or password length
/// - 409 Conflict: Email already registered
/// - 503 Service Unavailable: Token or user store unreachable
pub async fn register<S, A>(
    req: HttpRequest,
    state: web::Data<AppState<S, A>>,
    request: web::Json<CredentialsRequest>,
) -> HttpResponse
where
    S: TokenStore + 'static,
    A: Authenticator + 'static,
{
    if let Err(errors) = request.validate() {
        return handle_validation_error(&errors);
    }

    match state
        .auth_service
        .register(&request.email, &request.password, user_agent(&req))
        .await
    {
        Ok(pair) => token_response(&pair, "Register success"),
        Err(error) => handle_domain_error(&error),
    }
}
