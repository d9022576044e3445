use std::sync::Arc;

use actix_web::{web, HttpServer};
use anyhow::Context;
use tracing::{info, warn};
use tracing_actix_web::TracingLogger;

use gw_api::app::create_app;
use gw_api::routes::AppState;
use gw_api::telemetry;
use gw_core::repositories::{Authenticator, InMemoryAuthenticator, InMemoryTokenStore, TokenStore};
use gw_core::services::{
    AuthService, TokenCleanupConfig, TokenCleanupService, TokenService, TokenServiceConfig,
};
use gw_infra::{DatabasePool, MySqlTokenStore, MySqlUserStore};
use gw_shared::{AppConfig, StorageBackend};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("failed to load configuration")?;
    telemetry::init_tracing(&config.logging);

    info!(
        environment = ?config.environment,
        storage = %config.server.storage,
        "Starting gateway API server"
    );
    if config.auth.jwt.is_using_default_secret() {
        warn!("JWT_SECRET is not set, using the development secret");
    }

    match config.server.storage {
        StorageBackend::Memory => {
            warn!("Using in-memory storage, sessions and accounts are lost on restart");
            let store = Arc::new(InMemoryTokenStore::new());
            let authenticator = Arc::new(InMemoryAuthenticator::new());
            run_server(config, store, authenticator).await
        }
        StorageBackend::Mysql => {
            let pool = DatabasePool::new(&config.database)
                .await
                .context("failed to connect to the database")?;
            if config.database.run_migrations {
                pool.run_migrations()
                    .await
                    .context("failed to run database migrations")?;
            }
            info!("{}", pool.get_statistics());

            let store = Arc::new(MySqlTokenStore::new(pool.get_pool().clone()));
            let authenticator = Arc::new(MySqlUserStore::new(pool.get_pool().clone()));
            let result = run_server(config, store, authenticator).await;
            pool.close().await;
            result
        }
    }
}

/// Wire the services over the chosen stores and serve until shutdown
async fn run_server<S, A>(config: AppConfig, store: Arc<S>, authenticator: Arc<A>) -> anyhow::Result<()>
where
    S: TokenStore + 'static,
    A: Authenticator + 'static,
{
    let token_service = Arc::new(TokenService::new(
        store,
        Arc::clone(&authenticator),
        TokenServiceConfig::from(&config.auth.jwt),
    ));
    let auth_service = Arc::new(AuthService::new(authenticator, Arc::clone(&token_service)));

    let cleanup = Arc::new(TokenCleanupService::new(
        Arc::clone(&token_service),
        TokenCleanupConfig::every(config.auth.cleanup_interval),
    ));
    let cleanup_task = cleanup.start_background_task();

    let state = web::Data::new(AppState::new(auth_service, config.auth.realm.clone()));
    let bind_address = config.server.bind_address();
    info!("Server will bind to: {}", bind_address);

    let mut server = HttpServer::new(move || create_app(state.clone()).wrap(TracingLogger::default()));
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server
        .bind(&bind_address)
        .with_context(|| format!("failed to bind {}", bind_address))?
        .run()
        .await
        .context("server terminated with an error")?;

    if let Some(handle) = cleanup_task {
        handle.abort();
    }
    info!("Server stopped");
    Ok(())
}
