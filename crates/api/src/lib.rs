//! Sterling Contractors API library.
//!
//! This crate provides the API server functionality as a library, allowing
//! it to be exercised end-to-end in tests without binding a socket.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod ai;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod payments;
pub mod routes;
pub mod state;
pub mod storage;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tower_sessions::{SessionManagerLayer, SessionStore};

use state::AppState;

/// Build the application router with the given state and session layer.
///
/// Shared between the binary (Postgres-backed sessions) and tests
/// (in-memory sessions).
pub fn app<Store: SessionStore + Clone>(
    state: AppState,
    session_layer: SessionManagerLayer<Store>,
) -> Router {
    Router::new()
        .nest("/api", routes::api_routes())
        .layer(session_layer)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
