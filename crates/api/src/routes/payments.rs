//! Payment route handlers.

use axum::{Json, extract::State};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::payments::PaymentIntent;
use crate::state::AppState;

fn default_currency() -> String {
    "usd".to_owned()
}

/// Request body for creating a payment intent.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentIntentRequest {
    pub amount: Decimal,
    #[serde(default = "default_currency")]
    pub currency: String,
}

/// POST /api/create-payment-intent
#[instrument(skip(state))]
pub async fn create_payment_intent(
    State(state): State<AppState>,
    Json(request): Json<CreatePaymentIntentRequest>,
) -> Result<Json<PaymentIntent>> {
    if request.amount <= Decimal::ZERO {
        return Err(AppError::BadRequest("amount must be positive".to_owned()));
    }

    let intent = state
        .payments()
        .create_payment_intent(request.amount, &request.currency.to_lowercase())
        .await?;

    Ok(Json(intent))
}

/// POST /api/mobile-money/webhook
///
/// Mobile money is reconciled out-of-band by the provider; the webhook is
/// logged and acknowledged so the provider stops retrying.
pub async fn mobile_money_webhook(Json(payload): Json<Value>) -> Json<Value> {
    tracing::info!(payload = %payload, "mobile money webhook received");

    Json(json!({ "received": true }))
}
