//! Deposit route handlers.
//!
//! Recording a deposit is public so that walk-in clients can pay before
//! creating an account; the handler attaches the session user when one
//! exists. Reading deposits requires a signed-in user and is scoped to them.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::instrument;

use sterling_core::{DepositId, ProjectId, UserId};

use crate::error::{AppError, Result};
use crate::middleware::{OptionalUser, RequireUser};
use crate::models::{Deposit, DepositPatch, NewDeposit};
use crate::state::AppState;
use crate::storage::DepositFilter;

/// Query parameters for the deposit listing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    #[serde(default)]
    pub project_id: Option<ProjectId>,
}

/// POST /api/deposits
#[instrument(skip(state, new_deposit))]
pub async fn create(
    State(state): State<AppState>,
    OptionalUser(user_id): OptionalUser,
    Json(mut new_deposit): Json<NewDeposit>,
) -> Result<(StatusCode, Json<Deposit>)> {
    new_deposit.validate().map_err(AppError::BadRequest)?;
    new_deposit.user_id = user_id;

    if let Some(project_id) = new_deposit.project_id {
        state
            .storage()
            .get_project(project_id)
            .await?
            .ok_or_else(|| AppError::BadRequest(format!("Unknown project: {project_id}")))?;
    }

    let deposit = state.storage().create_deposit(new_deposit).await?;

    Ok((StatusCode::CREATED, Json(deposit)))
}

/// GET /api/deposits
pub async fn list(
    State(state): State<AppState>,
    RequireUser(user_id): RequireUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Deposit>>> {
    let deposits = state
        .storage()
        .get_deposits(DepositFilter {
            user_id: Some(user_id),
            project_id: query.project_id,
        })
        .await?;

    Ok(Json(deposits))
}

/// GET /api/deposits/{id}
pub async fn detail(
    State(state): State<AppState>,
    RequireUser(user_id): RequireUser,
    Path(id): Path<DepositId>,
) -> Result<Json<Deposit>> {
    let deposit = owned_deposit(&state, id, &user_id).await?;

    Ok(Json(deposit))
}

/// PUT /api/deposits/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireUser(user_id): RequireUser,
    Path(id): Path<DepositId>,
    Json(patch): Json<DepositPatch>,
) -> Result<Json<Deposit>> {
    owned_deposit(&state, id, &user_id).await?;
    let deposit = state.storage().update_deposit(id, patch).await?;

    Ok(Json(deposit))
}

/// Fetch a deposit, responding 404 whether it is missing or owned by someone
/// else.
async fn owned_deposit(state: &AppState, id: DepositId, user_id: &UserId) -> Result<Deposit> {
    let deposit = state
        .storage()
        .get_deposit(id)
        .await?
        .filter(|deposit| deposit.user_id.as_ref() == Some(user_id))
        .ok_or_else(|| AppError::NotFound("Deposit not found".to_owned()))?;

    Ok(deposit)
}
