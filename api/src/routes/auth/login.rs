use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use gw_core::repositories::{Authenticator, TokenStore};

use crate::dto::CredentialsRequest;
use crate::handlers::error::{handle_domain_error, handle_validation_error};

use super::{token_response, user_agent, AppState};

/// Handler for POST /api/v1/auth/login
///
/// Checks the credentials and issues a new token pair bound to the
/// caller's `User-Agent`.
///
/// ## Errors
/// - 400 Bad Request: Malformed body
/// - 401 Unauthorized: Unknown email or wrong password
pub async fn login<S, A>(
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
        .login(&request.email, &request.password, user_agent(&req))
        .await
    {
        Ok(pair) => token_response(&pair, "Login success"),
        Err(error) => handle_domain_error(&error),
    }
}
