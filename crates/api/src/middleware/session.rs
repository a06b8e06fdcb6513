//! Session middleware configuration.
//!
//! Sessions live in `PostgreSQL` via tower-sessions when a database is
//! configured, or in process memory alongside the in-memory storage backend.

use sqlx::PgPool;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};
use tower_sessions_sqlx_store::PostgresStore;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "sc_session";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

fn configure<Store: tower_sessions::SessionStore>(
    store: Store,
) -> SessionManagerLayer<Store> {
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        // TLS terminates at the edge proxy; the app itself serves plain HTTP.
        .with_secure(false)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

/// Create the session layer with `PostgreSQL` store.
///
/// The sessions table must be created via migration before serving.
#[must_use]
pub fn create_session_layer(pool: &PgPool) -> SessionManagerLayer<PostgresStore> {
    configure(PostgresStore::new(pool.clone()))
}

/// Create a session layer backed by process memory, for database-less runs.
#[must_use]
pub fn create_memory_session_layer() -> SessionManagerLayer<MemoryStore> {
    configure(MemoryStore::default())
}
