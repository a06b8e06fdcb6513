//! HTTP route handlers for the public API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /api/health                          - Health check
//!
//! # Auth
//! POST /api/auth/login                      - Sync identity claims, open a session
//! POST /api/auth/logout                     - Close the session
//! GET  /api/auth/user                       - Current user (requires auth)
//!
//! # Projects
//! GET    /api/projects                      - List (?featured=&limit=)
//! GET    /api/projects/{id}                 - Detail
//! POST   /api/projects                      - Create (requires auth)
//! PUT    /api/projects/{id}                 - Partial update (requires auth)
//! DELETE /api/projects/{id}                 - Delete (requires auth)
//!
//! # Products
//! GET    /api/products                      - List (?category=&featured=&search=&limit=)
//! GET    /api/products/search/{query}       - Search by name/description/category
//! GET    /api/products/{id}                 - Detail
//! POST   /api/products                      - Create (requires auth)
//! PUT    /api/products/{id}                 - Partial update (requires auth)
//! DELETE /api/products/{id}                 - Delete (requires auth)
//!
//! # Orders (all require auth, scoped to the signed-in user)
//! GET  /api/orders                          - List own orders
//! GET  /api/orders/{id}                     - Detail
//! GET  /api/orders/{id}/items               - Order lines
//! POST /api/orders                          - Create with lines
//! PUT  /api/orders/{id}                     - Partial update
//!
//! # Deposits
//! POST /api/deposits                        - Record a deposit (public)
//! GET  /api/deposits                        - List own deposits (?projectId=, requires auth)
//! GET  /api/deposits/{id}                   - Detail (requires auth)
//! PUT  /api/deposits/{id}                   - Partial update (requires auth)
//!
//! # Inquiries
//! POST /api/inquiries                       - Submit contact form (public)
//! GET  /api/inquiries                       - List own inquiries (?status=, requires auth)
//! PUT  /api/inquiries/{id}                  - Triage update (requires auth)
//!
//! # AI advisory
//! POST /api/ai/estimate                     - Project cost estimate
//! POST /api/ai/recommendations              - Product recommendations
//! POST /api/ai/chat                         - Chat assistant
//! GET  /api/ai/chat/{session_id}            - Chat transcript for a session
//! POST /api/ai/deposit-calculator           - Deposit plan (rule-based fallback)
//!
//! # Payments
//! POST /api/create-payment-intent           - Card payment intent
//! POST /api/mobile-money/webhook            - Mobile money acknowledgement
//! ```

pub mod ai;
pub mod auth;
pub mod deposits;
pub mod health;
pub mod inquiries;
pub mod orders;
pub mod payments;
pub mod products;
pub mod projects;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

/// Create the full `/api` router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        // Auth
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/user", get(auth::current_user))
        // Projects
        .route("/projects", get(projects::list).post(projects::create))
        .route(
            "/projects/{id}",
            get(projects::detail)
                .put(projects::update)
                .delete(projects::delete),
        )
        // Products
        .route("/products", get(products::list).post(products::create))
        .route("/products/search/{query}", get(products::search))
        .route(
            "/products/{id}",
            get(products::detail)
                .put(products::update)
                .delete(products::delete),
        )
        // Orders
        .route("/orders", get(orders::list).post(orders::create))
        .route("/orders/{id}", get(orders::detail).put(orders::update))
        .route("/orders/{id}/items", get(orders::items))
        // Deposits
        .route("/deposits", get(deposits::list).post(deposits::create))
        .route("/deposits/{id}", get(deposits::detail).put(deposits::update))
        // Inquiries
        .route("/inquiries", get(inquiries::list).post(inquiries::create))
        .route("/inquiries/{id}", put(inquiries::update))
        // AI advisory
        .route("/ai/estimate", post(ai::estimate))
        .route("/ai/recommendations", post(ai::recommendations))
        .route("/ai/chat", post(ai::chat))
        .route("/ai/chat/{session_id}", get(ai::chat_history))
        .route("/ai/deposit-calculator", post(ai::calculate_deposit))
        // Payments
        .route(
            "/create-payment-intent",
            post(payments::create_payment_intent),
        )
        .route(
            "/mobile-money/webhook",
            post(payments::mobile_money_webhook),
        )
}
