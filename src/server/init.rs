//! Server initialization and main run loop
//!
//! Contains the main `run()` function that starts all server components,
//! plus the router assembly shared with the integration tests.

use anyhow::{Context, Result};
use axum::http::{header, HeaderValue, Method};
use axum::{routing::get, Extension, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

use garage_core::auth::{TokenConfig, TokenService};
use garage_core::store::Database;

use super::config::AppConfig;
use super::loader::load_config;
use super::validation::validate_config;
use crate::middleware::rate_limit::RateLimitLayer;

/// Run the server
pub async fn run() -> Result<()> {
    info!(
        "Starting Bob's Garage backend v{}",
        env!("CARGO_PKG_VERSION")
    );

    let config = load_config().context("Failed to load configuration")?;
    validate_config(&config)?;
    info!("Configuration loaded");

    let db = Database::connect(&config.database.url)
        .await
        .context("Failed to open database")?;

    if db.count_admins().await? == 0 {
        warn!("No active admin account exists; run 'garage create-admin'");
    }

    let rate_limit_layer = RateLimitLayer::new(&config.rate_limit);
    if config.rate_limit.enabled {
        rate_limit_layer.state().spawn_cleanup();
        info!(
            "Rate limiting ENABLED ({}/{}s api, {}/{}s auth)",
            config.rate_limit.api_max,
            config.rate_limit.api_window_secs,
            config.rate_limit.auth_max,
            config.rate_limit.auth_window_secs
        );
    } else {
        info!("Rate limiting DISABLED");
    }

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    let app = build_router(&config, db, rate_limit_layer)?;

    info!("HTTP server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("HTTP server error")?;

    info!("Garage shutdown complete");
    Ok(())
}

/// Build the main router with all endpoints and layers.
///
/// Pulled out of `run()` so the integration tests can drive the exact
/// production stack against an in-memory database.
pub fn build_router(
    config: &AppConfig,
    db: Database,
    rate_limit_layer: RateLimitLayer,
) -> Result<Router> {
    let token_config = TokenConfig::parse(&config.auth.access_ttl, &config.auth.refresh_ttl)
        .context("Invalid token lifetimes")?;
    let tokens = Arc::new(TokenService::new(&config.auth.secret, token_config));

    let cors = match &config.cors.allowed_origin {
        Some(origin) => {
            let origin: HeaderValue = origin.parse().context("Invalid cors.allowed_origin")?;
            // Credentials (the refresh cookie) require an exact origin.
            CorsLayer::new()
                .allow_origin(origin)
                .allow_credentials(true)
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
                .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        }
        None => CorsLayer::permissive(),
    };

    let app = Router::new()
        // Health endpoints (/health public for LB, /health/detailed admin only)
        .merge(crate::api::health_routes())
        // API documentation (Swagger UI at /docs)
        .merge(crate::api::docs_routes())
        // API routes (auth applied per-handler via extractors)
        .merge(crate::api::api_router())
        .route("/", get(|| async { "Bob's Garage API" }))
        // Layers (applied to all routes)
        .layer(Extension(db))
        .layer(Extension(tokens))
        .layer(Extension(Arc::new(config.clone())))
        .layer(TraceLayer::new_for_http())
        .layer(rate_limit_layer)
        .layer(cors);

    Ok(app)
}

/// Resolve on SIGINT or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
