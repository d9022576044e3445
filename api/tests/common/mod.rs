//! Shared fixtures for the HTTP tests

#![allow(dead_code)]

use std::sync::Arc;

use actix_web::dev::ServiceResponse;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{test, web};
use chrono::Duration;

use gw_api::routes::auth::REFRESH_AUTHORIZATION;
use gw_api::routes::AppState;
use gw_core::repositories::{InMemoryAuthenticator, InMemoryTokenStore};
use gw_core::services::{AuthService, ManualClock, TokenService, TokenServiceConfig};

pub const ACCESS_TTL_SECONDS: i64 = 900;
pub const REFRESH_TTL_SECONDS: i64 = 3600;
pub const PASSWORD: &str = "correct-horse";

pub type TestState = AppState<InMemoryTokenStore, InMemoryAuthenticator>;

/// In-memory services on a manual clock
pub struct TestContext {
    pub state: web::Data<TestState>,
    pub clock: Arc<ManualClock>,
    pub store: Arc<InMemoryTokenStore>,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_secret("http-test-secret")
    }

    pub fn with_secret(secret: &str) -> Self {
        let clock = Arc::new(ManualClock::at_epoch_seconds(1_700_000_000));
        let store = Arc::new(InMemoryTokenStore::new());
        let authenticator = Arc::new(InMemoryAuthenticator::with_cost(4));
        let config = TokenServiceConfig::new(
            secret,
            Duration::seconds(ACCESS_TTL_SECONDS),
            Duration::seconds(REFRESH_TTL_SECONDS),
        );
        let token_service = Arc::new(TokenService::with_clock(
            Arc::clone(&store),
            Arc::clone(&authenticator),
            config,
            clock.clone(),
        ));
        let auth_service = Arc::new(AuthService::new(authenticator, token_service));

        Self {
            state: web::Data::new(AppState::new(auth_service, "gateway-test")),
            clock,
            store,
        }
    }

    pub fn advance(&self, seconds: i64) {
        self.clock.advance(Duration::seconds(seconds));
    }
}

pub fn credentials(uri: &str, email: &str, password: &str) -> test::TestRequest {
    test::TestRequest::post()
        .uri(uri)
        .insert_header(("User-Agent", "http-tests/1.0"))
        .set_json(serde_json::json!({
            "email": email,
            "password": password,
        }))
}

pub fn register_request(email: &str) -> test::TestRequest {
    credentials("/api/v1/auth/register", email, PASSWORD)
}

pub fn login_request(email: &str) -> test::TestRequest {
    credentials("/api/v1/auth/login", email, PASSWORD)
}

pub fn bearer(method: test::TestRequest, token: &str) -> test::TestRequest {
    method.insert_header((AUTHORIZATION, format!("Bearer {}", token)))
}

/// Access and refresh token from the response headers
pub fn tokens<B>(resp: &ServiceResponse<B>) -> (String, String) {
    let access = resp
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .expect("access token header")
        .to_string();
    let refresh = resp
        .headers()
        .get(REFRESH_AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .expect("refresh token header")
        .to_string();
    (access, refresh)
}
