//! Sterling Contractors API server.
//!
//! Serves the public REST API for the storefront: project portfolio,
//! hardware catalog, orders, deposits, inquiries, AI advisory endpoints, and
//! payments.
//!
//! # Storage
//!
//! With `DATABASE_URL` set, data lives in `PostgreSQL` and sessions in the
//! `sessions` table. Without it, the server runs entirely in memory with
//! seed data, which is the local development mode.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use secrecy::ExposeSecret;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sterling_api::ai::OpenAiAdvisor;
use sterling_api::config::AppConfig;
use sterling_api::middleware::{create_memory_session_layer, create_session_layer};
use sterling_api::payments::StripeGateway;
use sterling_api::state::AppState;
use sterling_api::storage::{self, MemoryStorage, PgStorage};

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &AppConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    // Load configuration from environment (needed for Sentry init)
    let config = AppConfig::from_env().expect("Failed to load configuration");

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Initialize tracing with EnvFilter and Sentry integration
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "sterling_api=info,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let advisor = Arc::new(OpenAiAdvisor::new(&config.openai));
    let payments = Arc::new(StripeGateway::new(&config.stripe));

    let app = if let Some(database_url) = &config.database_url {
        let pool = storage::create_pool(database_url.expose_secret())
            .await
            .expect("Failed to create database pool");
        tracing::info!("Database pool created");

        // NOTE: Migrations are NOT run automatically on startup.
        // Run them explicitly via: cargo run -p sterling-cli -- migrate

        let state = AppState::new(Arc::new(PgStorage::new(pool.clone())), advisor, payments);
        let session_layer = create_session_layer(&pool);

        let ready_pool = pool.clone();
        sterling_api::app(state, session_layer).route(
            "/health/ready",
            get(move || {
                let pool = ready_pool.clone();
                async move { readiness(&pool).await }
            }),
        )
    } else {
        tracing::info!("Running with in-memory storage and seed data");

        let state = AppState::new(
            Arc::new(MemoryStorage::with_seed_data()),
            advisor,
            payments,
        );
        sterling_api::app(state, create_memory_session_layer())
    };

    let app: Router = app
        .route("/health", get(health))
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    // Start server
    let addr = config.socket_addr();
    tracing::info!("api listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies database connectivity before returning OK.
async fn readiness(pool: &sqlx::PgPool) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(pool).await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
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
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
