//! Application factory
//!
//! Builds the Actix-web application around an already wired `AppState`.
//! Request tracing is added by the caller so that tests can build the same
//! app without installing a subscriber.

use std::sync::Arc;

use actix_web::{
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    web, App, Error, HttpResponse,
};

use gw_core::repositories::{Authenticator, TokenStore};

use crate::middleware::auth::{JwtAuth, TokenValidator};
use crate::routes::auth::{login, logout, logout_all, refresh, register, AppState, LOGOUT_PATH};
use crate::routes::users::me;

/// Create and configure the application with all dependencies
pub fn create_app<S, A>(
    app_state: web::Data<AppState<S, A>>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = Error,
        InitError = (),
    >,
>
where
    S: TokenStore + 'static,
    A: Authenticator + 'static,
{
    let validator: Arc<dyn TokenValidator> = app_state.token_service.clone();
    let validator = web::Data::from(validator);
    let realm = app_state.realm.clone();

    App::new()
        .app_data(app_state)
        .app_data(validator)
        .route("/health", web::get().to(health_check))
        .route("/ping", web::get().to(ping))
        .service(
            web::scope("/api/v1")
                .service(
                    web::scope("/auth")
                        .route("/register", web::post().to(register::<S, A>))
                        .route("/login", web::post().to(login::<S, A>))
                        .route("/refresh", web::post().to(refresh::<S, A>))
                        .service(
                            web::resource("/logout")
                                .route(web::post().to(logout::<S, A>))
                                .wrap(JwtAuth::new(realm.clone()).with_logout_path(LOGOUT_PATH)),
                        )
                        .service(
                            web::resource("/logout-all")
                                .route(web::post().to(logout_all::<S, A>))
                                .wrap(JwtAuth::new(realm.clone())),
                        ),
                )
                .service(
                    web::resource("/users/me")
                        .route(web::get().to(me))
                        .wrap(JwtAuth::new(realm)),
                ),
        )
        .default_service(web::route().to(not_found))
}

/// Health check endpoint handler
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "gateway-api",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

async fn ping() -> HttpResponse {
    HttpResponse::Ok().body("pong")
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "error": "not_found",
        "message": "The requested resource was not found"
    }))
}
