//! Integration tests for the AI advisory and payment endpoints.
//!
//! The stub advisor returns canned answers; the failing variant errors on
//! every call so the rule-based deposit fallback can be observed end to end.

use axum::http::StatusCode;
use serde_json::json;

use sterling_integration_tests::{request, test_app, test_app_failing_ai};

#[tokio::test]
async fn test_estimate_passes_through_advisor() {
    let app = test_app();
    let response = request(
        app,
        "POST",
        "/api/ai/estimate",
        Some(json!({
            "projectType": "residential",
            "description": "Three-bedroom house on a quarter acre"
        })),
        None,
    )
    .await;
    assert_eq!(response.status, StatusCode::OK, "{}", response.body);
    assert_eq!(response.body["estimatedCost"], json!("45000"));
    assert_eq!(response.body["timeline"], "6-8 weeks");
    assert_eq!(response.body["breakdown"][0]["item"], "Foundation");
}

#[tokio::test]
async fn test_estimate_requires_description() {
    let app = test_app();
    let response = request(
        app,
        "POST",
        "/api/ai/estimate",
        Some(json!({ "projectType": "residential", "description": "  " })),
        None,
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_estimate_advisor_failure_is_bad_gateway() {
    let app = test_app_failing_ai();
    let response = request(
        app,
        "POST",
        "/api/ai/estimate",
        Some(json!({ "projectType": "residential", "description": "A boundary wall" })),
        None,
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_recommendations_pass_through_advisor() {
    let app = test_app();
    let response = request(
        app,
        "POST",
        "/api/ai/recommendations",
        Some(json!({ "projectType": "renovation", "budget": "500.00" })),
        None,
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body["recommendations"][0]["name"],
        "Premium Drill Kit"
    );
}

#[tokio::test]
async fn test_chat_keeps_per_session_history() {
    let app = test_app();

    let first = request(
        app.clone(),
        "POST",
        "/api/ai/chat",
        Some(json!({ "message": "What cement grade do I need?", "sessionId": "sess-1" })),
        None,
    )
    .await;
    assert_eq!(first.status, StatusCode::OK, "{}", first.body);
    assert_eq!(first.body["sessionId"], "sess-1");
    assert_eq!(
        first.body["response"],
        "You asked: What cement grade do I need? (after 0 earlier turns)"
    );

    let second = request(
        app.clone(),
        "POST",
        "/api/ai/chat",
        Some(json!({ "message": "And how many bags?", "sessionId": "sess-1" })),
        None,
    )
    .await;
    assert_eq!(
        second.body["response"],
        "You asked: And how many bags? (after 1 earlier turns)"
    );

    // A different session starts with an empty history.
    let other = request(
        app.clone(),
        "POST",
        "/api/ai/chat",
        Some(json!({ "message": "Hello", "sessionId": "sess-2" })),
        None,
    )
    .await;
    assert_eq!(
        other.body["response"],
        "You asked: Hello (after 0 earlier turns)"
    );

    let history = request(app, "GET", "/api/ai/chat/sess-1", None, None).await;
    assert_eq!(history.status, StatusCode::OK);
    let entries = history.body.as_array().expect("array");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["message"], "What cement grade do I need?");
    assert_eq!(entries[1]["message"], "And how many bags?");
    assert_eq!(entries[0]["messageType"], "general");
}

#[tokio::test]
async fn test_chat_requires_message_and_session() {
    let app = test_app();

    let no_message = request(
        app.clone(),
        "POST",
        "/api/ai/chat",
        Some(json!({ "message": "", "sessionId": "sess-1" })),
        None,
    )
    .await;
    assert_eq!(no_message.status, StatusCode::BAD_REQUEST);

    let no_session = request(
        app,
        "POST",
        "/api/ai/chat",
        Some(json!({ "message": "Hello", "sessionId": " " })),
        None,
    )
    .await;
    assert_eq!(no_session.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_deposit_calculation_uses_advisor_when_available() {
    let app = test_app();
    let response = request(
        app,
        "POST",
        "/api/ai/deposit-calculator",
        Some(json!({ "type": "commercial", "budget": "100000" })),
        None,
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    // The stub recommends 40%, which must not be replaced by the fallback.
    assert_eq!(response.body["percentage"], 40);
    assert_eq!(response.body["recommendedDeposit"], json!("40000.0"));
    assert_eq!(response.body["paymentSchedule"][0]["milestone"], "Signing");
}

#[tokio::test]
async fn test_commercial_deposit_fallback_is_thirty_percent() {
    let app = test_app_failing_ai();
    let response = request(
        app,
        "POST",
        "/api/ai/deposit-calculator",
        Some(json!({ "type": "commercial", "budget": "100000" })),
        None,
    )
    .await;
    assert_eq!(response.status, StatusCode::OK, "{}", response.body);
    assert_eq!(response.body["percentage"], 30);
    assert_eq!(response.body["recommendedDeposit"], json!("30000"));
    assert!(
        !response.body["reasoning"]
            .as_str()
            .expect("reasoning")
            .is_empty()
    );
    assert!(
        response.body["paymentSchedule"]
            .as_array()
            .expect("array")
            .is_empty()
    );
}

#[tokio::test]
async fn test_residential_deposit_fallback_is_twenty_five_percent() {
    let app = test_app_failing_ai();
    let response = request(
        app,
        "POST",
        "/api/ai/deposit-calculator",
        Some(json!({ "type": "residential", "budget": "100000" })),
        None,
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["percentage"], 25);
    assert_eq!(response.body["recommendedDeposit"], json!("25000"));
}

#[tokio::test]
async fn test_deposit_calculation_rejects_non_positive_budget() {
    let app = test_app_failing_ai();
    let response = request(
        app,
        "POST",
        "/api/ai/deposit-calculator",
        Some(json!({ "type": "residential", "budget": "0" })),
        None,
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_payment_intent_creation() {
    let app = test_app();
    let response = request(
        app,
        "POST",
        "/api/create-payment-intent",
        Some(json!({ "amount": "429.97" })),
        None,
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["id"], "pi_test");
    assert_eq!(response.body["clientSecret"], "pi_test_secret");
}

#[tokio::test]
async fn test_payment_intent_rejects_non_positive_amount() {
    let app = test_app();
    let response = request(
        app,
        "POST",
        "/api/create-payment-intent",
        Some(json!({ "amount": "-1" })),
        None,
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_mobile_money_webhook_acknowledges() {
    let app = test_app();
    let response = request(
        app,
        "POST",
        "/api/mobile-money/webhook",
        Some(json!({ "reference": "MM-12345", "status": "SUCCESS" })),
        None,
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["received"], true);
}
