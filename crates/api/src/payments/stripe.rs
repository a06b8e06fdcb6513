//! Stripe-backed [`PaymentGateway`].
//!
//! Talks directly to the Payment Intents endpoint with form-encoded bodies,
//! which is all this service needs from the Stripe surface.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use rust_decimal::Decimal;
use secrecy::ExposeSecret;
use serde::Deserialize;
use tracing::instrument;

use crate::config::StripeConfig;
use sterling_core::to_minor_units;

use super::{PaymentError, PaymentGateway, PaymentIntent};

const STRIPE_API_URL: &str = "https://api.stripe.com/v1/payment_intents";

/// Stripe Payment Intents client.
#[derive(Clone)]
pub struct StripeGateway {
    inner: Arc<StripeGatewayInner>,
}

struct StripeGatewayInner {
    client: reqwest::Client,
}

#[derive(Deserialize)]
struct PaymentIntentResponse {
    id: String,
    client_secret: String,
}

#[derive(Deserialize)]
struct StripeErrorResponse {
    error: StripeErrorBody,
}

#[derive(Deserialize)]
struct StripeErrorBody {
    message: String,
}

impl StripeGateway {
    /// Create a new client.
    ///
    /// # Panics
    ///
    /// Panics if the secret key contains invalid header characters.
    #[must_use]
    pub fn new(config: &StripeConfig) -> Self {
        let secret_key = config.secret_key.expose_secret();

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {secret_key}"))
                .expect("Invalid secret key for header"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            inner: Arc::new(StripeGatewayInner { client }),
        }
    }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    #[instrument(skip(self))]
    async fn create_payment_intent(
        &self,
        amount: Decimal,
        currency: &str,
    ) -> Result<PaymentIntent, PaymentError> {
        let minor_units =
            to_minor_units(amount).ok_or(PaymentError::InvalidAmount(amount))?;
        if minor_units <= 0 {
            return Err(PaymentError::InvalidAmount(amount));
        }

        let params = [
            ("amount", minor_units.to_string()),
            ("currency", currency.to_owned()),
            ("automatic_payment_methods[enabled]", "true".to_owned()),
        ];

        let response = self
            .inner
            .client
            .post(STRIPE_API_URL)
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<StripeErrorResponse>(&body)
                .map_or(body, |e| e.error.message);
            return Err(PaymentError::Api(message));
        }

        let intent: PaymentIntentResponse = serde_json::from_str(&body)
            .map_err(|e| PaymentError::Api(format!("unexpected response shape: {e}")))?;

        Ok(PaymentIntent {
            id: intent.id,
            client_secret: intent.client_secret,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_is_clone_send_sync() {
        fn assert_clone<T: Clone>() {}
        fn assert_send_sync<T: Send + Sync>() {}
        assert_clone::<StripeGateway>();
        assert_send_sync::<StripeGateway>();
    }
}
