//! AI advisory route handlers.
//!
//! Estimates, recommendations, and chat pass through to the advisor. The
//! deposit calculator is the exception: advisor failures degrade to a
//! rule-based plan instead of an error, because the checkout flow depends on
//! always getting a number back.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use sterling_core::percentage_of;

use crate::ai::{
    ChatTurn, DepositCalcRequest, DepositPlan, EstimateRequest, ProductRecommendations,
    ProjectEstimate, RecommendationRequest,
};
use crate::error::{AppError, Result};
use crate::middleware::OptionalUser;
use crate::models::{ChatEntry, NewChatEntry};
use crate::state::AppState;
use crate::storage::ChatFilter;

/// Deposit percentage for commercial projects when the advisor is down.
const COMMERCIAL_DEPOSIT_PERCENTAGE: u32 = 30;
/// Deposit percentage for all other project types.
const STANDARD_DEPOSIT_PERCENTAGE: u32 = 25;

/// POST /api/ai/estimate
pub async fn estimate(
    State(state): State<AppState>,
    Json(request): Json<EstimateRequest>,
) -> Result<Json<ProjectEstimate>> {
    if request.description.trim().is_empty() {
        return Err(AppError::BadRequest("description is required".to_owned()));
    }

    let estimate = state.advisor().project_estimate(request).await?;

    Ok(Json(estimate))
}

/// POST /api/ai/recommendations
pub async fn recommendations(
    State(state): State<AppState>,
    Json(request): Json<RecommendationRequest>,
) -> Result<Json<ProductRecommendations>> {
    let recommendations = state.advisor().product_recommendations(request).await?;

    Ok(Json(recommendations))
}

/// Request body for the chat assistant.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: String,
    pub session_id: String,
}

/// Response from the chat assistant.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub response: String,
    pub session_id: String,
}

/// POST /api/ai/chat
#[instrument(skip(state, request), fields(session_id = %request.session_id))]
pub async fn chat(
    State(state): State<AppState>,
    OptionalUser(user_id): OptionalUser,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>> {
    if request.message.trim().is_empty() {
        return Err(AppError::BadRequest("message is required".to_owned()));
    }
    if request.session_id.trim().is_empty() {
        return Err(AppError::BadRequest("sessionId is required".to_owned()));
    }

    let history: Vec<ChatTurn> = state
        .storage()
        .get_chat_history(ChatFilter {
            user_id: None,
            session_id: Some(request.session_id.clone()),
        })
        .await?
        .into_iter()
        .map(|entry| ChatTurn {
            message: entry.message,
            response: entry.response,
        })
        .collect();

    let response = state
        .advisor()
        .chat_reply(&request.message, &history)
        .await?;

    state
        .storage()
        .create_chat_entry(NewChatEntry {
            user_id,
            session_id: request.session_id.clone(),
            message: request.message,
            response: response.clone(),
            message_type: "general".to_owned(),
        })
        .await?;

    Ok(Json(ChatResponse {
        response,
        session_id: request.session_id,
    }))
}

/// GET /api/ai/chat/{session_id}
pub async fn chat_history(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<Vec<ChatEntry>>> {
    let history = state
        .storage()
        .get_chat_history(ChatFilter {
            user_id: None,
            session_id: Some(session_id),
        })
        .await?;

    Ok(Json(history))
}

/// POST /api/ai/deposit-calculator
///
/// Asks the advisor for a plan; on any advisor failure, falls back to the
/// house rule of 30% for commercial projects and 25% otherwise.
#[instrument(skip(state, request), fields(project_type = %request.project_type))]
pub async fn calculate_deposit(
    State(state): State<AppState>,
    Json(request): Json<DepositCalcRequest>,
) -> Result<Json<DepositPlan>> {
    if request.budget <= rust_decimal::Decimal::ZERO {
        return Err(AppError::BadRequest("budget must be positive".to_owned()));
    }

    match state.advisor().deposit_plan(request.clone()).await {
        Ok(plan) => Ok(Json(plan)),
        Err(err) => {
            tracing::warn!(error = %err, "advisor unavailable, using rule-based deposit plan");
            Ok(Json(fallback_deposit_plan(&request)))
        }
    }
}

fn fallback_deposit_plan(request: &DepositCalcRequest) -> DepositPlan {
    let percentage = if request.project_type.eq_ignore_ascii_case("commercial") {
        COMMERCIAL_DEPOSIT_PERCENTAGE
    } else {
        STANDARD_DEPOSIT_PERCENTAGE
    };

    DepositPlan {
        recommended_deposit: percentage_of(request.budget, percentage),
        percentage,
        reasoning: format!(
            "Standard deposit of {percentage}% for {} projects.",
            request.project_type
        ),
        payment_schedule: Vec::new(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_commercial_fallback_is_thirty_percent() {
        let plan = fallback_deposit_plan(&DepositCalcRequest {
            project_type: "commercial".to_owned(),
            budget: Decimal::from(100_000),
            complexity: None,
            timeline: None,
        });
        assert_eq!(plan.percentage, 30);
        assert_eq!(plan.recommended_deposit.to_string(), "30000");
        assert!(!plan.reasoning.is_empty());
        assert!(plan.payment_schedule.is_empty());
    }

    #[test]
    fn test_residential_fallback_is_twenty_five_percent() {
        let plan = fallback_deposit_plan(&DepositCalcRequest {
            project_type: "residential".to_owned(),
            budget: Decimal::from(100_000),
            complexity: None,
            timeline: None,
        });
        assert_eq!(plan.percentage, 25);
        assert_eq!(plan.recommended_deposit.to_string(), "25000");
    }
}
