mod common;

use actix_web::http::header::WWW_AUTHENTICATE;
use actix_web::http::StatusCode;
use actix_web::test;
use serde_json::Value;

use common::*;
use gw_api::app::create_app;

fn logout_request(token: &str) -> test::TestRequest {
    bearer(test::TestRequest::post().uri("/api/v1/auth/logout"), token)
}

fn refresh_request(token: &str) -> test::TestRequest {
    bearer(test::TestRequest::post().uri("/api/v1/auth/refresh"), token)
}

#[actix_web::test]
async fn test_logout_revokes_whole_session() {
    let ctx = TestContext::new();
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let resp = test::call_service(&app, register_request("kim@example.com").to_request()).await;
    let (access, refresh) = tokens(&resp);

    let resp = test::call_service(&app, logout_request(&access).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Logout success");

    let resp = test::call_service(&app, refresh_request(&refresh).to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    assert_eq!(ctx.store.refresh_count().await, 0);
    assert_eq!(ctx.store.access_count().await, 0);
}

#[actix_web::test]
async fn test_logout_accepts_expired_access_token() {
    let ctx = TestContext::new();
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let resp = test::call_service(&app, register_request("leo@example.com").to_request()).await;
    let (access, _) = tokens(&resp);

    ctx.advance(ACCESS_TTL_SECONDS + 1);

    let me = bearer(test::TestRequest::get().uri("/api/v1/users/me"), &access).to_request();
    let resp = test::call_service(&app, me).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        resp.headers().get(WWW_AUTHENTICATE).unwrap(),
        "Bearer realm=\"gateway-test\",error=\"access_token_expired\""
    );
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "token_expired");

    let resp = test::call_service(&app, logout_request(&access).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(ctx.store.refresh_count().await, 0);
}

#[actix_web::test]
async fn test_double_logout_succeeds() {
    let ctx = TestContext::new();
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let resp = test::call_service(&app, register_request("mia@example.com").to_request()).await;
    let (access, _) = tokens(&resp);

    let first = test::call_service(&app, logout_request(&access).to_request()).await;
    assert_eq!(first.status(), StatusCode::OK);

    let second = test::call_service(&app, logout_request(&access).to_request()).await;
    assert_eq!(second.status(), StatusCode::OK);
    let body: Value = test::read_body_json(second).await;
    assert_eq!(body["message"], "Logout success");

    // Only logout treats a revoked token as success
    let me = bearer(test::TestRequest::get().uri("/api/v1/users/me"), &access).to_request();
    let resp = test::call_service(&app, me).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_logout_after_expiry_and_revocation_succeeds() {
    let ctx = TestContext::new();
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let resp = test::call_service(&app, register_request("max@example.com").to_request()).await;
    let (access, refresh) = tokens(&resp);

    let resp = test::call_service(&app, refresh_request(&refresh).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    ctx.advance(ACCESS_TTL_SECONDS + 1);
    let resp = test::call_service(&app, logout_request(&access).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    // The rotated session is untouched
    assert_eq!(ctx.store.refresh_count().await, 1);
}

#[actix_web::test]
async fn test_logout_with_forged_token_is_unauthorized() {
    let issuer = TestContext::with_secret("someone-else");
    let issuer_app = test::init_service(create_app(issuer.state.clone())).await;
    let resp = test::call_service(&issuer_app, register_request("una@example.com").to_request()).await;
    let (forged, _) = tokens(&resp);

    let ctx = TestContext::new();
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let resp = test::call_service(&app, logout_request(&forged).to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = test::call_service(&app, logout_request("not.a.token").to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_logout_leaves_other_sessions() {
    let ctx = TestContext::new();
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let resp = test::call_service(&app, register_request("ned@example.com").to_request()).await;
    let (laptop_access, _) = tokens(&resp);
    let resp = test::call_service(&app, login_request("ned@example.com").to_request()).await;
    let (_, phone_refresh) = tokens(&resp);

    let resp = test::call_service(&app, logout_request(&laptop_access).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(&app, refresh_request(&phone_refresh).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_logout_all_revokes_every_session() {
    let ctx = TestContext::new();
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let resp = test::call_service(&app, register_request("olga@example.com").to_request()).await;
    let (access, first_refresh) = tokens(&resp);
    let resp = test::call_service(&app, login_request("olga@example.com").to_request()).await;
    let (_, second_refresh) = tokens(&resp);

    // Another user's session must survive
    let resp = test::call_service(&app, register_request("pat@example.com").to_request()).await;
    let (_, other_refresh) = tokens(&resp);

    let req = bearer(test::TestRequest::post().uri("/api/v1/auth/logout-all"), &access).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["sessions_revoked"], 2);

    for refresh in [&first_refresh, &second_refresh] {
        let resp = test::call_service(&app, refresh_request(refresh).to_request()).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    let resp = test::call_service(&app, refresh_request(&other_refresh).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_logout_all_rejects_expired_access_token() {
    let ctx = TestContext::new();
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let resp = test::call_service(&app, register_request("quinn@example.com").to_request()).await;
    let (access, _) = tokens(&resp);

    ctx.advance(ACCESS_TTL_SECONDS);

    let req = bearer(test::TestRequest::post().uri("/api/v1/auth/logout-all"), &access).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(resp.headers().contains_key(WWW_AUTHENTICATE));
    assert_eq!(ctx.store.refresh_count().await, 1);
}
