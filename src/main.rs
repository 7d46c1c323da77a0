//! Minitube backend entry point.
//!
//! Wires configuration, the Postgres pool, the Firebase validator, and
//! the live fan-out registry into the HTTP router, then serves until
//! interrupted.

use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderValue;
use axum::routing::get;
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use minitube::adapters::auth::{FirebaseConfig, FirebaseSessionValidator};
use minitube::adapters::http::comment::{comment_routes, CommentAppState};
use minitube::adapters::http::middleware::{auth_middleware, AuthState};
use minitube::adapters::postgres::PostgresCommentRepository;
use minitube::adapters::websocket::{live_comments_router, HubRegistry, LiveCommentsState};
use minitube::config::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.server.log_level))
        .init();

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .acquire_timeout(Duration::from_secs(config.database.acquire_timeout_secs))
        .connect(&config.database.url)
        .await?;
    tracing::info!("connected to Postgres");

    sqlx::migrate!("./migrations").run(&pool).await?;

    let validator: AuthState = Arc::new(FirebaseSessionValidator::new(
        FirebaseConfig::new(config.auth.firebase_project_id.clone())
            .with_cache_duration(Duration::from_secs(config.auth.jwks_cache_secs)),
    )?);

    let registry = Arc::new(HubRegistry::new(config.websocket.clone()));
    let repository = Arc::new(PostgresCommentRepository::new(pool));

    let comment_state = CommentAppState {
        repository,
        publisher: registry.clone(),
    };
    let ws_state = LiveCommentsState::new(registry, validator.clone());

    let app = Router::new()
        .merge(
            comment_routes(comment_state).layer(axum::middleware::from_fn_with_state(
                validator,
                auth_middleware,
            )),
        )
        .merge(live_comments_router(ws_state))
        .route("/healthz", get(|| async { "ok" }))
        .layer(cors_layer(&config))
        .layer(TraceLayer::new_for_http());

    let addr = config.server.socket_addr()?;
    tracing::info!(%addr, "minitube backend listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutdown signal received");
        })
        .await?;

    Ok(())
}

/// CORS from configured origins; permissive when none are configured,
/// since the deployment platform fronts TLS and origins.
fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    if origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
