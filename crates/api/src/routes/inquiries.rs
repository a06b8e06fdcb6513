//! Contact-form inquiry route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::instrument;

use sterling_core::{InquiryId, InquiryStatus};

use crate::error::{AppError, Result};
use crate::middleware::{OptionalUser, RequireUser};
use crate::models::{Inquiry, InquiryPatch, NewInquiry};
use crate::state::AppState;
use crate::storage::InquiryFilter;

/// Query parameters for the inquiry listing.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub status: Option<InquiryStatus>,
}

/// POST /api/inquiries
#[instrument(skip(state, new_inquiry), fields(email = %new_inquiry.email))]
pub async fn create(
    State(state): State<AppState>,
    OptionalUser(user_id): OptionalUser,
    Json(mut new_inquiry): Json<NewInquiry>,
) -> Result<(StatusCode, Json<Inquiry>)> {
    new_inquiry.validate().map_err(AppError::BadRequest)?;
    new_inquiry.user_id = user_id;

    let inquiry = state.storage().create_inquiry(new_inquiry).await?;

    Ok((StatusCode::CREATED, Json(inquiry)))
}

/// GET /api/inquiries
pub async fn list(
    State(state): State<AppState>,
    RequireUser(user_id): RequireUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Inquiry>>> {
    let inquiries = state
        .storage()
        .get_inquiries(InquiryFilter {
            user_id: Some(user_id),
            status: query.status,
        })
        .await?;

    Ok(Json(inquiries))
}

/// PUT /api/inquiries/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireUser(_user_id): RequireUser,
    Path(id): Path<InquiryId>,
    Json(patch): Json<InquiryPatch>,
) -> Result<Json<Inquiry>> {
    let inquiry = state.storage().update_inquiry(id, patch).await?;

    Ok(Json(inquiry))
}
