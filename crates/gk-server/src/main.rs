//! Gatekeeper Server
//!
//! HTTP API guarded by the configured authentication policy.

use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gk_core::config::AppConfig;
use gk_db::{Database, DatabaseConfig};

mod error;
mod gate;
mod handlers;
mod health;
mod state;

use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured logging
    init_tracing();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        host = %config.server.host,
        port = config.server.port,
        auth_type = %config.auth.auth_type,
        "Starting Gatekeeper"
    );

    // Connect to database when configured
    let database = match DatabaseConfig::from_settings(&config.database) {
        Some(db_config) => {
            let db = Database::connect(&db_config).await?;
            db.ensure_schema().await?;
            info!("Connected to database");
            Some(db)
        }
        None => {
            info!("DATABASE_URL not set, using in-memory stores");
            None
        }
    };

    let addr = config.server_addr();
    let state = Arc::new(AppState::from_database(config, database));
    let app = build_router(state);

    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Initialize tracing/logging
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "info,gk_server=debug,gk_auth=debug,tower_http=debug".into()
            }),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_line_number(true),
        )
        .init();
}

/// Build the application router
fn build_router(state: Arc<AppState>) -> Router {
    // Health check routes (never gated)
    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .with_state(state.clone());

    // API v1 routes, behind the authentication gate
    let api_routes = Router::new()
        .route("/api/v1/status", get(handlers::status))
        .route("/api/v1/status/", get(handlers::status))
        .route("/api/v1/unauthorized", get(handlers::unauthorized))
        .route("/api/v1/unauthorized/", get(handlers::unauthorized))
        .route("/api/v1/forbidden", get(handlers::forbidden))
        .route("/api/v1/forbidden/", get(handlers::forbidden))
        .route("/api/v1/auth_session/login", post(handlers::login))
        .route("/api/v1/auth_session/login/", post(handlers::login))
        .route("/api/v1/auth_session/logout", delete(handlers::logout))
        .route("/api/v1/auth_session/logout/", delete(handlers::logout))
        .route("/api/v1/users", get(handlers::list_users).post(handlers::create_user))
        .route("/api/v1/users/:user_id", get(handlers::get_user))
        .fallback(handlers::not_found)
        .layer(middleware::from_fn_with_state(state.clone(), gate::auth_gate))
        .with_state(state);

    Router::new()
        .merge(health_routes)
        .merge(api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
