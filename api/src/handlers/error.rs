//! Mapping of domain errors onto HTTP responses

use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use gw_core::errors::{AuthError, DomainError, TokenError};
use validator::ValidationErrors;

use crate::dto::ErrorResponse;

/// Convert a domain error into its HTTP response.
///
/// Token failures other than expiry share one body so that callers cannot
/// tell a forged token from a revoked one.
pub fn handle_domain_error(error: &DomainError) -> HttpResponse {
    let (status, code, message) = match error {
        DomainError::Token(TokenError::Expired) => {
            (StatusCode::UNAUTHORIZED, "token_expired", "Token expired".to_string())
        }
        DomainError::Token(TokenError::GenerationFailed | TokenError::Duplicate) => {
            tracing::error!("Token issuance failed: {}", error);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "An internal error occurred".to_string(),
            )
        }
        DomainError::Token(_) => (
            StatusCode::UNAUTHORIZED,
            "unauthorized",
            "Invalid or revoked token".to_string(),
        ),
        DomainError::Auth(AuthError::InvalidCredentials) => (
            StatusCode::UNAUTHORIZED,
            "invalid_credentials",
            error.to_string(),
        ),
        DomainError::Auth(AuthError::UserAlreadyExists) => {
            (StatusCode::CONFLICT, "user_exists", error.to_string())
        }
        DomainError::Auth(AuthError::HashingFailed) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal_error",
            "An internal error occurred".to_string(),
        ),
        DomainError::Validation { message } => {
            (StatusCode::BAD_REQUEST, "validation_error", message.clone())
        }
        DomainError::StoreUnavailable { message } => {
            tracing::error!("Store unavailable: {}", message);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "service_unavailable",
                "Service temporarily unavailable".to_string(),
            )
        }
        DomainError::Internal { message } => {
            tracing::error!("Internal error: {}", message);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "An internal error occurred".to_string(),
            )
        }
    };

    ErrorResponse::new(code, message).to_response(status)
}

/// 400 response for a request body that failed validation
pub fn handle_validation_error(errors: &ValidationErrors) -> HttpResponse {
    let mut fields: Vec<&str> = errors.field_errors().keys().copied().collect();
    fields.sort_unstable();

    ErrorResponse::new(
        "validation_error",
        format!("Invalid fields: {}", fields.join(", ")),
    )
    .to_response(StatusCode::BAD_REQUEST)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gw_core::errors::CodecError;

    #[test]
    fn test_status_codes() {
        let cases = [
            (DomainError::from(TokenError::Expired), StatusCode::UNAUTHORIZED),
            (DomainError::from(TokenError::NotFound), StatusCode::UNAUTHORIZED),
            (DomainError::from(TokenError::Duplicate), StatusCode::INTERNAL_SERVER_ERROR),
            (DomainError::from(TokenError::GenerationFailed), StatusCode::INTERNAL_SERVER_ERROR),
            (DomainError::from(CodecError::Malformed), StatusCode::UNAUTHORIZED),
            (DomainError::from(AuthError::InvalidCredentials), StatusCode::UNAUTHORIZED),
            (DomainError::from(AuthError::UserAlreadyExists), StatusCode::CONFLICT),
            (DomainError::store_unavailable("down"), StatusCode::SERVICE_UNAVAILABLE),
            (DomainError::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR),
            (
                DomainError::Validation {
                    message: "bad".to_string(),
                },
                StatusCode::BAD_REQUEST,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(handle_domain_error(&error).status(), expected, "{:?}", error);
        }
    }
}
