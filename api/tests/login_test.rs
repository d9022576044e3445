mod common;

use actix_web::http::header::AUTHORIZATION;
use actix_web::http::StatusCode;
use actix_web::test;
use serde_json::Value;

use common::*;
use gw_api::app::create_app;
use gw_api::routes::auth::REFRESH_AUTHORIZATION;

#[actix_web::test]
async fn test_register_returns_tokens_in_headers_only() {
    let ctx = TestContext::new();
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let resp = test::call_service(&app, register_request("alice@example.com").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key(AUTHORIZATION));
    assert!(resp.headers().contains_key(REFRESH_AUTHORIZATION));

    let (access, refresh) = tokens(&resp);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, serde_json::json!({ "message": "Register success" }));
    assert!(!body.to_string().contains(&access));
    assert!(!body.to_string().contains(&refresh));

    assert_eq!(ctx.store.refresh_count().await, 1);
    assert_eq!(ctx.store.access_count().await, 1);
}

#[actix_web::test]
async fn test_register_duplicate_email_conflicts() {
    let ctx = TestContext::new();
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let first = test::call_service(&app, register_request("bob@example.com").to_request()).await;
    assert_eq!(first.status(), StatusCode::OK);

    let second = test::call_service(&app, register_request("BOB@example.com").to_request()).await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
    assert!(!second.headers().contains_key(AUTHORIZATION));

    let body: Value = test::read_body_json(second).await;
    assert_eq!(body["error"], "user_exists");
}

#[actix_web::test]
async fn test_register_rejects_invalid_body() {
    let ctx = TestContext::new();
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = credentials("/api/v1/auth/register", "not-an-email", PASSWORD).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = credentials("/api/v1/auth/register", "carol@example.com", "123").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "validation_error");
    assert_eq!(ctx.store.refresh_count().await, 0);
}

#[actix_web::test]
async fn test_login_opens_new_session() {
    let ctx = TestContext::new();
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let registered = test::call_service(&app, register_request("dave@example.com").to_request()).await;
    let (registered_access, _) = tokens(&registered);

    let resp = test::call_service(&app, login_request("dave@example.com").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let (access, _) = tokens(&resp);
    assert_ne!(access, registered_access);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Login success");
    assert_eq!(ctx.store.refresh_count().await, 2);

    let me = bearer(test::TestRequest::get().uri("/api/v1/users/me"), &access).to_request();
    let resp = test::call_service(&app, me).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["user_id"], 1);
}

#[actix_web::test]
async fn test_login_wrong_password_is_unauthorized() {
    let ctx = TestContext::new();
    let app = test::init_service(create_app(ctx.state.clone())).await;

    test::call_service(&app, register_request("erin@example.com").to_request()).await;

    let req = credentials("/api/v1/auth/login", "erin@example.com", "wrong-password").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(!resp.headers().contains_key(REFRESH_AUTHORIZATION));

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "invalid_credentials");

    let unknown = login_request("nobody@example.com").to_request();
    let resp = test::call_service(&app, unknown).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
