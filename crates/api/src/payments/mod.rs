//! Payment gateway integration.
//!
//! Card payments create a payment intent with the gateway and hand the
//! client secret back to the frontend, which completes the charge. Mobile
//! money is reconciled out-of-band; the API only records references and
//! acknowledges webhooks.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Serialize;

pub mod stripe;

pub use stripe::StripeGateway;

/// Errors from the payment gateway.
#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    /// Transport-level failure talking to the gateway.
    #[error("request to payment gateway failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The gateway returned a structured error.
    #[error("payment gateway error: {0}")]
    Api(String),

    /// The amount cannot be represented in the gateway's minor units.
    #[error("amount {0} cannot be charged")]
    InvalidAmount(Decimal),
}

/// A created payment intent, as returned to the frontend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntent {
    pub id: String,
    /// Client secret the frontend uses to confirm the payment.
    pub client_secret: String,
}

/// Card payment operations.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a payment intent for the given amount.
    ///
    /// `currency` is a lowercase ISO 4217 code, e.g. `usd`.
    async fn create_payment_intent(
        &self,
        amount: Decimal,
        currency: &str,
    ) -> Result<PaymentIntent, PaymentError>;
}
