//! Integration tests for order creation and deposit recording.

use axum::http::StatusCode;
use serde_json::json;

use sterling_integration_tests::{login, request, test_app};

#[tokio::test]
async fn test_order_total_is_recomputed_from_catalog_prices() {
    let app = test_app();
    let cookie = login(app.clone(), "user-1").await;

    // Client-supplied prices are ignored; the catalog is authoritative.
    let created = request(
        app.clone(),
        "POST",
        "/api/orders",
        Some(json!({
            "items": [
                { "productId": 1, "quantity": 2, "price": "0.01" },
                { "productId": 2, "quantity": 1, "price": "0.01" }
            ],
            "shippingAddress": "Plot 14, Kampala Road"
        })),
        Some(&cookie),
    )
    .await;
    assert_eq!(created.status, StatusCode::CREATED, "{}", created.body);

    // 2 x 89.99 + 1 x 249.99
    assert_eq!(created.body["order"]["totalAmount"], json!("429.97"));
    assert_eq!(created.body["order"]["status"], "pending");
    assert_eq!(created.body["order"]["userId"], "user-1");

    let items = created.body["items"].as_array().expect("items");
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["price"], json!("89.99"));
    assert_eq!(items[1]["price"], json!("249.99"));
}

#[tokio::test]
async fn test_order_with_unknown_product_is_rejected() {
    let app = test_app();
    let cookie = login(app.clone(), "user-1").await;

    let created = request(
        app,
        "POST",
        "/api/orders",
        Some(json!({ "items": [{ "productId": 999999, "quantity": 1 }] })),
        Some(&cookie),
    )
    .await;
    assert_eq!(created.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_empty_order_is_rejected() {
    let app = test_app();
    let cookie = login(app.clone(), "user-1").await;

    let created = request(
        app,
        "POST",
        "/api/orders",
        Some(json!({ "items": [] })),
        Some(&cookie),
    )
    .await;
    assert_eq!(created.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_orders_are_scoped_to_their_owner() {
    let app = test_app();
    let alice = login(app.clone(), "alice").await;
    let bob = login(app.clone(), "bob").await;

    let created = request(
        app.clone(),
        "POST",
        "/api/orders",
        Some(json!({ "items": [{ "productId": 1, "quantity": 1 }] })),
        Some(&alice),
    )
    .await;
    assert_eq!(created.status, StatusCode::CREATED);
    let order_id = created.body["order"]["id"].as_i64().expect("id");

    // Alice sees her order; Bob sees an empty list and 404s on her id.
    let mine = request(app.clone(), "GET", "/api/orders", None, Some(&alice)).await;
    assert_eq!(mine.body.as_array().expect("array").len(), 1);

    let theirs = request(app.clone(), "GET", "/api/orders", None, Some(&bob)).await;
    assert!(theirs.body.as_array().expect("array").is_empty());

    let probe = request(
        app.clone(),
        "GET",
        &format!("/api/orders/{order_id}"),
        None,
        Some(&bob),
    )
    .await;
    assert_eq!(probe.status, StatusCode::NOT_FOUND);

    let items = request(
        app,
        "GET",
        &format!("/api/orders/{order_id}/items"),
        None,
        Some(&alice),
    )
    .await;
    assert_eq!(items.status, StatusCode::OK);
    assert_eq!(items.body.as_array().expect("array").len(), 1);
}

#[tokio::test]
async fn test_order_status_update() {
    let app = test_app();
    let cookie = login(app.clone(), "user-1").await;

    let created = request(
        app.clone(),
        "POST",
        "/api/orders",
        Some(json!({ "items": [{ "productId": 2, "quantity": 1 }] })),
        Some(&cookie),
    )
    .await;
    let order_id = created.body["order"]["id"].as_i64().expect("id");

    let updated = request(
        app,
        "PUT",
        &format!("/api/orders/{order_id}"),
        Some(json!({ "status": "completed" })),
        Some(&cookie),
    )
    .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["status"], "completed");
    assert_eq!(updated.body["totalAmount"], json!("249.99"));
}

#[tokio::test]
async fn test_anonymous_deposit_is_recorded() {
    let app = test_app();

    let created = request(
        app,
        "POST",
        "/api/deposits",
        Some(json!({ "amount": "5000.00", "paymentMethod": "mobile_money" })),
        None,
    )
    .await;
    assert_eq!(created.status, StatusCode::CREATED, "{}", created.body);
    assert_eq!(created.body["status"], "pending");
    assert_eq!(created.body["amount"], json!("5000.00"));
    assert_eq!(created.body["userId"], json!(null));
}

#[tokio::test]
async fn test_deposit_against_unknown_project_is_rejected() {
    let app = test_app();

    let created = request(
        app,
        "POST",
        "/api/deposits",
        Some(json!({ "amount": "5000.00", "projectId": 999999 })),
        None,
    )
    .await;
    assert_eq!(created.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_deposit_listing_filters_by_project() {
    let app = test_app();
    let cookie = login(app.clone(), "user-1").await;

    for project_id in [1, 1, 2] {
        let created = request(
            app.clone(),
            "POST",
            "/api/deposits",
            Some(json!({ "amount": "1000.00", "projectId": project_id })),
            Some(&cookie),
        )
        .await;
        assert_eq!(created.status, StatusCode::CREATED);
    }

    let all = request(app.clone(), "GET", "/api/deposits", None, Some(&cookie)).await;
    assert_eq!(all.body.as_array().expect("array").len(), 3);

    let scoped = request(
        app,
        "GET",
        "/api/deposits?projectId=1",
        None,
        Some(&cookie),
    )
    .await;
    assert_eq!(scoped.body.as_array().expect("array").len(), 2);
}

#[tokio::test]
async fn test_foreign_deposit_reads_as_missing() {
    let app = test_app();
    let alice = login(app.clone(), "alice").await;
    let bob = login(app.clone(), "bob").await;

    let created = request(
        app.clone(),
        "POST",
        "/api/deposits",
        Some(json!({ "amount": "750.00" })),
        Some(&alice),
    )
    .await;
    let deposit_id = created.body["id"].as_i64().expect("id");

    let probe = request(
        app.clone(),
        "GET",
        &format!("/api/deposits/{deposit_id}"),
        None,
        Some(&bob),
    )
    .await;
    assert_eq!(probe.status, StatusCode::NOT_FOUND);

    let updated = request(
        app,
        "PUT",
        &format!("/api/deposits/{deposit_id}"),
        Some(json!({ "status": "completed" })),
        Some(&alice),
    )
    .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["status"], "completed");
}
