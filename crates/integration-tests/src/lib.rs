//! Test harness for driving the API in-process.
//!
//! Builds the real router over the in-memory storage backend with stub
//! advisor and payment implementations, then issues requests through
//! `tower::ServiceExt::oneshot`. No sockets, no database, no external
//! services.

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use serde_json::{Value, json};
use tower::util::ServiceExt;

use sterling_api::ai::{
    Advisor, AiError, ChatTurn, CostLine, DepositCalcRequest, DepositPlan, EstimateRequest,
    ProductRecommendations, ProductSuggestion, ProjectEstimate, RecommendationRequest,
    ScheduleEntry,
};
use sterling_api::middleware::create_memory_session_layer;
use sterling_api::payments::{PaymentError, PaymentGateway, PaymentIntent};
use sterling_api::state::AppState;
use sterling_api::storage::MemoryStorage;

/// Advisor stub with canned answers, or hard failures when `fail` is set.
pub struct StubAdvisor {
    pub fail: bool,
}

#[async_trait]
impl Advisor for StubAdvisor {
    async fn project_estimate(
        &self,
        _request: EstimateRequest,
    ) -> Result<ProjectEstimate, AiError> {
        if self.fail {
            return Err(AiError::Parse("stub failure".to_owned()));
        }
        Ok(ProjectEstimate {
            estimated_cost: Decimal::from(45_000),
            breakdown: vec![CostLine {
                item: "Foundation".to_owned(),
                cost: Decimal::from(12_000),
            }],
            confidence: 0.8,
            timeline: "6-8 weeks".to_owned(),
            recommendations: vec!["Schedule groundwork before the rains.".to_owned()],
        })
    }

    async fn product_recommendations(
        &self,
        _request: RecommendationRequest,
    ) -> Result<ProductRecommendations, AiError> {
        if self.fail {
            return Err(AiError::Parse("stub failure".to_owned()));
        }
        Ok(ProductRecommendations {
            recommendations: vec![ProductSuggestion {
                name: "Premium Drill Kit".to_owned(),
                reason: Some("Handles masonry and timber alike.".to_owned()),
            }],
            total_estimated_cost: Decimal::new(24_999, 2),
        })
    }

    async fn chat_reply(&self, message: &str, history: &[ChatTurn]) -> Result<String, AiError> {
        if self.fail {
            return Err(AiError::Parse("stub failure".to_owned()));
        }
        Ok(format!(
            "You asked: {message} (after {} earlier turns)",
            history.len()
        ))
    }

    async fn deposit_plan(&self, request: DepositCalcRequest) -> Result<DepositPlan, AiError> {
        if self.fail {
            return Err(AiError::Parse("stub failure".to_owned()));
        }
        Ok(DepositPlan {
            recommended_deposit: request.budget * Decimal::new(4, 1),
            percentage: 40,
            reasoning: "Stubbed plan".to_owned(),
            payment_schedule: vec![ScheduleEntry {
                milestone: "Signing".to_owned(),
                amount: request.budget * Decimal::new(4, 1),
            }],
        })
    }
}

/// Gateway stub that always succeeds.
pub struct StubGateway;

#[async_trait]
impl PaymentGateway for StubGateway {
    async fn create_payment_intent(
        &self,
        _amount: Decimal,
        _currency: &str,
    ) -> Result<PaymentIntent, PaymentError> {
        Ok(PaymentIntent {
            id: "pi_test".to_owned(),
            client_secret: "pi_test_secret".to_owned(),
        })
    }
}

/// Build the app with seed data and a working stub advisor.
#[must_use]
pub fn test_app() -> Router {
    test_app_with(Arc::new(StubAdvisor { fail: false }))
}

/// Build the app with seed data and an advisor that fails every call.
#[must_use]
pub fn test_app_failing_ai() -> Router {
    test_app_with(Arc::new(StubAdvisor { fail: true }))
}

/// Build the app with seed data and the given advisor.
#[must_use]
pub fn test_app_with(advisor: Arc<dyn Advisor>) -> Router {
    let state = AppState::new(
        Arc::new(MemoryStorage::with_seed_data()),
        advisor,
        Arc::new(StubGateway),
    );
    sterling_api::app(state, create_memory_session_layer())
}

/// A decoded response: status, session cookie (if set), JSON body.
pub struct TestResponse {
    pub status: StatusCode,
    pub cookie: Option<String>,
    pub body: Value,
}

/// Issue a request against the app and decode the response.
///
/// # Panics
///
/// Panics if the request cannot be built or the body is not valid JSON when
/// non-empty.
pub async fn request(
    app: Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
    cookie: Option<&str>,
) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }

    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("failed to build request");

    let response = app.oneshot(request).await.expect("infallible");

    let status = response.status();
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::to_owned);

    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("failed to read body")
        .to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("body was not JSON")
    };

    TestResponse {
        status,
        cookie,
        body,
    }
}

/// Log in as the given user and return the session cookie.
///
/// # Panics
///
/// Panics if login does not succeed or no session cookie is set.
pub async fn login(app: Router, user_id: &str) -> String {
    let response = request(
        app,
        "POST",
        "/api/auth/login",
        Some(json!({
            "id": user_id,
            "email": format!("{user_id}@example.com"),
            "firstName": "Test",
            "lastName": "User",
        })),
        None,
    )
    .await;

    assert_eq!(response.status, StatusCode::OK, "login failed: {}", response.body);
    response.cookie.expect("login did not set a session cookie")
}
