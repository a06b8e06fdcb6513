//! Project portfolio route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::instrument;

use sterling_core::ProjectId;

use crate::error::{AppError, Result};
use crate::middleware::RequireUser;
use crate::models::{NewProject, Project, ProjectPatch};
use crate::state::AppState;
use crate::storage::ProjectFilter;

/// Query parameters for the project listing.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub featured: Option<bool>,
    #[serde(default)]
    pub limit: Option<i64>,
}

/// GET /api/projects
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Project>>> {
    let projects = state
        .storage()
        .get_projects(ProjectFilter {
            featured: query.featured,
            limit: query.limit,
        })
        .await?;

    Ok(Json(projects))
}

/// GET /api/projects/{id}
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<ProjectId>,
) -> Result<Json<Project>> {
    let project = state
        .storage()
        .get_project(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".to_owned()))?;

    Ok(Json(project))
}

/// POST /api/projects
#[instrument(skip(state, new_project), fields(user_id = %user_id))]
pub async fn create(
    State(state): State<AppState>,
    RequireUser(user_id): RequireUser,
    Json(mut new_project): Json<NewProject>,
) -> Result<(StatusCode, Json<Project>)> {
    new_project.validate().map_err(AppError::BadRequest)?;
    new_project.user_id = Some(user_id);

    let project = state.storage().create_project(new_project).await?;

    Ok((StatusCode::CREATED, Json(project)))
}

/// PUT /api/projects/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireUser(_user_id): RequireUser,
    Path(id): Path<ProjectId>,
    Json(patch): Json<ProjectPatch>,
) -> Result<Json<Project>> {
    let project = state.storage().update_project(id, patch).await?;

    Ok(Json(project))
}

/// DELETE /api/projects/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireUser(_user_id): RequireUser,
    Path(id): Path<ProjectId>,
) -> Result<StatusCode> {
    state.storage().delete_project(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
