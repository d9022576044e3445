//! JWT authentication middleware for protecting API endpoints.
//!
//! The gate extracts the bearer token from the Authorization header, asks
//! the token service to validate it, and injects an `AuthContext` into the
//! request. Only access tokens pass. An expired token gets a 401 with a
//! `WWW-Authenticate` challenge so clients know to refresh; every other
//! token failure gets the same plain 401, except that logging out with an
//! already revoked access token reports success.

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    error::ErrorUnauthorized,
    http::{
        header::{AUTHORIZATION, WWW_AUTHENTICATE},
        Method, StatusCode,
    },
    web, Error, FromRequest, HttpMessage, HttpRequest, HttpResponse,
};
use async_trait::async_trait;
use futures_util::future::LocalBoxFuture;
use gw_core::{
    domain::entities::token::{TokenKind, ValidatedToken},
    domain::entities::user::UserId,
    errors::{DomainError, TokenError},
    repositories::{Authenticator, TokenStore},
    services::token::TokenService,
};
use std::{
    future::{ready, Ready},
    rc::Rc,
};

use crate::dto::{ErrorResponse, MessageResponse};
use crate::handlers::error::handle_domain_error;

/// User authentication context injected into requests
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Owner of the presented access token
    pub user_id: UserId,
    /// The raw access token, needed to revoke it on logout
    pub access_token: String,
}

/// Trait for wrapping TokenService to allow dynamic dispatch
#[async_trait]
pub trait TokenValidator: Send + Sync {
    async fn validate_token(&self, token: &str, allow_expired: bool) -> Result<ValidatedToken, DomainError>;
}

#[async_trait]
impl<S, A> TokenValidator for TokenService<S, A>
where
    S: TokenStore + 'static,
    A: Authenticator + 'static,
{
    async fn validate_token(&self, token: &str, allow_expired: bool) -> Result<ValidatedToken, DomainError> {
        self.validate(token, allow_expired).await
    }
}

struct GateSettings {
    realm: String,
    /// POST to this path is accepted with an expired access token
    logout_path: Option<String>,
}

impl GateSettings {
    fn allows_expired(&self, req: &ServiceRequest) -> bool {
        match &self.logout_path {
            Some(path) => req.method() == Method::POST && req.path() == path.as_str(),
            None => false,
        }
    }

    fn challenge(&self) -> String {
        format!(
            "Bearer realm=\"{}\",error=\"access_token_expired\"",
            self.realm
        )
    }
}

/// JWT authentication middleware factory
///
/// Requires a `web::Data<dyn TokenValidator>` in app data.
pub struct JwtAuth {
    settings: Rc<GateSettings>,
}

impl JwtAuth {
    /// Creates a new JWT authentication middleware for the given realm
    pub fn new(realm: impl Into<String>) -> Self {
        Self {
            settings: Rc::new(GateSettings {
                realm: realm.into(),
                logout_path: None,
            }),
        }
    }

    /// Accept expired access tokens on `POST path` so that clients can
    /// still end a session after the access token lapsed
    pub fn with_logout_path(self, path: impl Into<String>) -> Self {
        Self {
            settings: Rc::new(GateSettings {
                realm: self.settings.realm.clone(),
                logout_path: Some(path.into()),
            }),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddleware {
            service: Rc::new(service),
            settings: Rc::clone(&self.settings),
        }))
    }
}

/// JWT authentication middleware service
pub struct JwtAuthMiddleware<S> {
    service: Rc<S>,
    settings: Rc<GateSettings>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    actix_web::dev::forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let settings = Rc::clone(&self.settings);

        Box::pin(async move {
            let Some(validator) = req.app_data::<web::Data<dyn TokenValidator>>().cloned() else {
                tracing::error!("JwtAuth used without a TokenValidator in app data");
                let response = ErrorResponse::new("internal_error", "An internal error occurred")
                    .to_response(StatusCode::INTERNAL_SERVER_ERROR);
                return Ok(req.into_response(response).map_into_right_body());
            };

            let Some(token) = extract_bearer_token(&req) else {
                let response = ErrorResponse::new(
                    "missing_authorization",
                    "Missing or invalid Authorization header",
                )
                .to_response(StatusCode::UNAUTHORIZED);
                return Ok(req.into_response(response).map_into_right_body());
            };

            let allow_expired = settings.allows_expired(&req);
            let rejection = match validator.validate_token(&token, allow_expired).await {
                Ok(validated) if validated.kind == TokenKind::Access => {
                    req.extensions_mut().insert(AuthContext {
                        user_id: validated.user_id,
                        access_token: token,
                    });
                    None
                }
                Ok(_) => Some(unauthorized()),
                // Logging out a session that is already gone succeeds
                Err(DomainError::Token(TokenError::NotFound)) if allow_expired => {
                    tracing::debug!("Logout with an already revoked access token");
                    Some(HttpResponse::Ok().json(MessageResponse::new("Logout success")))
                }
                Err(DomainError::Token(TokenError::Expired)) => Some(
                    HttpResponse::Unauthorized()
                        .insert_header((WWW_AUTHENTICATE, settings.challenge()))
                        .json(ErrorResponse::new("token_expired", "Access token expired")),
                ),
                Err(DomainError::Token(e)) => {
                    tracing::debug!("Rejected token: {}", e);
                    Some(unauthorized())
                }
                Err(e) => Some(handle_domain_error(&e)),
            };

            if let Some(response) = rejection {
                return Ok(req.into_response(response).map_into_right_body());
            }

            service
                .call(req)
                .await
                .map(|res| res.map_into_left_body())
        })
    }
}

fn unauthorized() -> HttpResponse {
    ErrorResponse::new("unauthorized", "Invalid or revoked token").to_response(StatusCode::UNAUTHORIZED)
}

/// Extracts Bearer token from Authorization header
pub fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

/// Extractor for required authentication
impl FromRequest for AuthContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let result = req
            .extensions()
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(|| ErrorUnauthorized("Authentication required"));

        ready(result)
    }
}
