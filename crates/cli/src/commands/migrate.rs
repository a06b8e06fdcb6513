//! Database migration command.
//!
//! Runs the API schema migrations and then creates the session table used by
//! tower-sessions.

use tower_sessions_sqlx_store::PostgresStore;

use super::{CommandError, connect};

/// Run all database migrations.
///
/// # Errors
///
/// Returns an error if `DATABASE_URL` is unset, the connection fails, or a
/// migration fails.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;

    tracing::info!("Running API migrations...");
    sqlx::migrate!("../api/migrations").run(&pool).await?;

    tracing::info!("Creating session table...");
    PostgresStore::new(pool).migrate().await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
