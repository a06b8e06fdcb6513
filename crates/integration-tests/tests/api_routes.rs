//! Integration tests for the catalog, portfolio, inquiry, and auth routes.
//!
//! All tests run against the real router over in-memory storage; no
//! database or external services are needed.

use axum::http::StatusCode;
use serde_json::json;

use sterling_integration_tests::{login, request, test_app};

#[tokio::test]
async fn test_health() {
    let app = test_app();
    let response = request(app, "GET", "/api/health", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
    // RFC 3339, e.g. "2026-08-23T10:15:30.123456789+00:00".
    let timestamp = response.body["timestamp"].as_str().expect("timestamp");
    assert!(timestamp.contains('T'), "not a timestamp: {timestamp}");
}

#[tokio::test]
async fn test_products_listing_and_detail_agree() {
    let app = test_app();

    let list = request(app.clone(), "GET", "/api/products", None, None).await;
    assert_eq!(list.status, StatusCode::OK);
    let products = list.body.as_array().expect("array");
    assert_eq!(products.len(), 2);

    let id = products[0]["id"].as_i64().expect("id");
    let detail = request(app, "GET", &format!("/api/products/{id}"), None, None).await;
    assert_eq!(detail.status, StatusCode::OK);
    assert_eq!(detail.body, products[0]);
}

#[tokio::test]
async fn test_unknown_product_is_404() {
    let app = test_app();
    let response = request(app, "GET", "/api/products/999999", None, None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["message"], "Product not found");
}

#[tokio::test]
async fn test_product_search_matches_drill() {
    let app = test_app();
    let response = request(app, "GET", "/api/products/search/drill", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    let hits = response.body.as_array().expect("array");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["name"], "Premium Drill Kit");
}

#[tokio::test]
async fn test_listing_search_param_filters_catalog() {
    let app = test_app();
    let response = request(app, "GET", "/api/products?search=drill", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    let hits = response.body.as_array().expect("array");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["name"], "Premium Drill Kit");
}

#[tokio::test]
async fn test_featured_filter_excludes_unfeatured() {
    let app = test_app();
    let cookie = login(app.clone(), "user-1").await;

    let created = request(
        app.clone(),
        "POST",
        "/api/products",
        Some(json!({ "name": "Plain Wheelbarrow", "price": "45.00", "featured": false })),
        Some(&cookie),
    )
    .await;
    assert_eq!(created.status, StatusCode::CREATED);

    let featured = request(app.clone(), "GET", "/api/products?featured=true", None, None).await;
    let names: Vec<&str> = featured
        .body
        .as_array()
        .expect("array")
        .iter()
        .map(|p| p["name"].as_str().expect("name"))
        .collect();
    assert!(!names.contains(&"Plain Wheelbarrow"));

    let all = request(app, "GET", "/api/products", None, None).await;
    assert_eq!(all.body.as_array().expect("array").len(), 3);
}

#[tokio::test]
async fn test_product_prices_are_json_strings() {
    let app = test_app();
    let response = request(app, "GET", "/api/products/2", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["price"], json!("249.99"));
}

#[tokio::test]
async fn test_created_ids_are_monotonic() {
    let app = test_app();
    let cookie = login(app.clone(), "user-1").await;

    let mut last_id = 0;
    for name in ["Wood Chisel", "Spirit Level", "Tape Measure"] {
        let created = request(
            app.clone(),
            "POST",
            "/api/products",
            Some(json!({ "name": name, "price": "10.00" })),
            Some(&cookie),
        )
        .await;
        assert_eq!(created.status, StatusCode::CREATED);
        let id = created.body["id"].as_i64().expect("id");
        assert!(id > last_id, "expected {id} > {last_id}");
        last_id = id;
    }
}

#[tokio::test]
async fn test_project_create_requires_auth() {
    let app = test_app();
    let response = request(
        app,
        "POST",
        "/api/projects",
        Some(json!({ "title": "Depot Refit" })),
        None,
    )
    .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_project_partial_update_preserves_other_fields() {
    let app = test_app();
    let cookie = login(app.clone(), "user-1").await;

    let created = request(
        app.clone(),
        "POST",
        "/api/projects",
        Some(json!({ "title": "Depot Refit", "category": "commercial" })),
        Some(&cookie),
    )
    .await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.body["status"], "planning");
    assert_eq!(created.body["userId"], "user-1");
    let id = created.body["id"].as_i64().expect("id");

    let updated = request(
        app.clone(),
        "PUT",
        &format!("/api/projects/{id}"),
        Some(json!({ "status": "in_progress" })),
        Some(&cookie),
    )
    .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["status"], "in_progress");
    assert_eq!(updated.body["title"], "Depot Refit");
    assert_eq!(updated.body["category"], "commercial");
}

#[tokio::test]
async fn test_update_missing_project_is_404() {
    let app = test_app();
    let cookie = login(app.clone(), "user-1").await;

    let response = request(
        app,
        "PUT",
        "/api/projects/999999",
        Some(json!({ "status": "completed" })),
        Some(&cookie),
    )
    .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_inquiry_validation_rejects_short_message() {
    let app = test_app();
    let response = request(
        app,
        "POST",
        "/api/inquiries",
        Some(json!({
            "firstName": "Grace",
            "lastName": "Okello",
            "email": "grace@example.com",
            "phone": "+256700123456",
            "projectType": "residential",
            "message": "too short"
        })),
        None,
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_inquiry_accepted_anonymously_and_listed_per_user() {
    let app = test_app();

    let anonymous = request(
        app.clone(),
        "POST",
        "/api/inquiries",
        Some(json!({
            "firstName": "Grace",
            "lastName": "Okello",
            "email": "grace@example.com",
            "phone": "+256700123456",
            "projectType": "residential",
            "message": "We need a quote for a three-bedroom build."
        })),
        None,
    )
    .await;
    assert_eq!(anonymous.status, StatusCode::CREATED);
    assert_eq!(anonymous.body["status"], "new");
    assert_eq!(anonymous.body["userId"], json!(null));

    // A signed-in user only sees their own inquiries, not the anonymous one.
    let cookie = login(app.clone(), "user-1").await;
    let listed = request(app, "GET", "/api/inquiries", None, Some(&cookie)).await;
    assert_eq!(listed.status, StatusCode::OK);
    assert!(listed.body.as_array().expect("array").is_empty());
}

#[tokio::test]
async fn test_login_sets_session_and_user_is_returned() {
    let app = test_app();
    let cookie = login(app.clone(), "user-42").await;

    let me = request(app.clone(), "GET", "/api/auth/user", None, Some(&cookie)).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["id"], "user-42");
    assert_eq!(me.body["email"], "user-42@example.com");

    let anonymous = request(app, "GET", "/api/auth/user", None, None).await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_invalidates_session() {
    let app = test_app();
    let cookie = login(app.clone(), "user-1").await;

    let logout = request(app.clone(), "POST", "/api/auth/logout", None, Some(&cookie)).await;
    assert_eq!(logout.status, StatusCode::OK);

    let me = request(app, "GET", "/api/auth/user", None, Some(&cookie)).await;
    assert_eq!(me.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_upsert_preserves_created_record() {
    let app = test_app();

    let first = request(
        app.clone(),
        "POST",
        "/api/auth/login",
        Some(json!({ "id": "user-9", "firstName": "Asha" })),
        None,
    )
    .await;
    assert_eq!(first.status, StatusCode::OK);

    let second = request(
        app.clone(),
        "POST",
        "/api/auth/login",
        Some(json!({ "id": "user-9", "firstName": "Aisha" })),
        None,
    )
    .await;
    assert_eq!(second.status, StatusCode::OK);
    assert_eq!(second.body["firstName"], "Aisha");
    assert_eq!(second.body["createdAt"], first.body["createdAt"]);
}
