//! Session auth route handlers.
//!
//! Token verification happens at the identity provider in front of this
//! service; `login` receives the already-verified claims, syncs the user
//! record, and opens a cookie session.

use axum::{Json, extract::State};
use serde_json::{Value, json};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::auth::{sign_in, sign_out};
use crate::middleware::RequireUser;
use crate::models::{UpsertUser, User};
use crate::state::AppState;

/// POST /api/auth/login
///
/// Upserts the user from identity claims and stores the user id in the
/// session.
#[instrument(skip(state, session, claims), fields(user_id = %claims.id))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(claims): Json<UpsertUser>,
) -> Result<Json<User>> {
    if claims.id.as_str().trim().is_empty() {
        return Err(AppError::BadRequest("id is required".to_owned()));
    }

    let user = state.storage().upsert_user(claims).await?;

    sign_in(&session, &user.id)
        .await
        .map_err(|e| AppError::Internal(format!("failed to persist session: {e}")))?;
    set_sentry_user(&user.id, user.email.as_ref().map(sterling_core::Email::as_str));

    Ok(Json(user))
}

/// POST /api/auth/logout
pub async fn logout(session: Session) -> Result<Json<Value>> {
    sign_out(&session)
        .await
        .map_err(|e| AppError::Internal(format!("failed to clear session: {e}")))?;
    clear_sentry_user();

    Ok(Json(json!({ "success": true })))
}

/// GET /api/auth/user
pub async fn current_user(
    State(state): State<AppState>,
    RequireUser(user_id): RequireUser,
) -> Result<Json<User>> {
    let user = state
        .storage()
        .get_user(&user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_owned()))?;

    Ok(Json(user))
}
