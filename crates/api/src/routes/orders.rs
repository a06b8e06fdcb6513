//! Order route handlers.
//!
//! Everything here requires a signed-in user and is scoped to that user.
//! Unit prices are snapshotted from the catalog at creation time and the
//! order total is always recomputed from the lines, so a tampered client
//! cannot set its own prices.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use sterling_core::{OrderId, UserId};

use crate::error::{AppError, Result};
use crate::middleware::RequireUser;
use crate::models::{NewOrder, NewOrderItem, Order, OrderItem, OrderPatch};
use crate::state::AppState;

/// Request body for creating an order.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub items: Vec<NewOrderItem>,
    #[serde(default)]
    pub shipping_address: Option<String>,
    #[serde(default)]
    pub payment_method: Option<String>,
}

/// Response for a created order: the header plus its lines.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedOrder {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// GET /api/orders
pub async fn list(
    State(state): State<AppState>,
    RequireUser(user_id): RequireUser,
) -> Result<Json<Vec<Order>>> {
    let orders = state.storage().get_orders(Some(&user_id)).await?;

    Ok(Json(orders))
}

/// GET /api/orders/{id}
pub async fn detail(
    State(state): State<AppState>,
    RequireUser(user_id): RequireUser,
    Path(id): Path<OrderId>,
) -> Result<Json<Order>> {
    let order = owned_order(&state, id, &user_id).await?;

    Ok(Json(order))
}

/// GET /api/orders/{id}/items
pub async fn items(
    State(state): State<AppState>,
    RequireUser(user_id): RequireUser,
    Path(id): Path<OrderId>,
) -> Result<Json<Vec<OrderItem>>> {
    let order = owned_order(&state, id, &user_id).await?;
    let items = state.storage().get_order_items(order.id).await?;

    Ok(Json(items))
}

/// POST /api/orders
#[instrument(skip(state, request), fields(user_id = %user_id, items = request.items.len()))]
pub async fn create(
    State(state): State<AppState>,
    RequireUser(user_id): RequireUser,
    Json(request): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<CreatedOrder>)> {
    if request.items.is_empty() {
        return Err(AppError::BadRequest("order must have at least one item".to_owned()));
    }

    let mut lines = Vec::with_capacity(request.items.len());
    let mut total = Decimal::ZERO;
    for mut item in request.items {
        item.validate().map_err(AppError::BadRequest)?;

        let product = state
            .storage()
            .get_product(item.product_id)
            .await?
            .ok_or_else(|| {
                AppError::BadRequest(format!("Unknown product: {}", item.product_id))
            })?;

        item.price = product.price;
        total += item.subtotal();
        lines.push(item);
    }

    let (order, items) = state
        .storage()
        .create_order(
            NewOrder {
                user_id: Some(user_id),
                status: sterling_core::OrderStatus::Pending,
                total_amount: total,
                shipping_address: request.shipping_address,
                payment_method: request.payment_method,
                payment_intent_id: None,
                stripe_session_id: None,
            },
            lines,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(CreatedOrder { order, items })))
}

/// PUT /api/orders/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireUser(user_id): RequireUser,
    Path(id): Path<OrderId>,
    Json(patch): Json<OrderPatch>,
) -> Result<Json<Order>> {
    owned_order(&state, id, &user_id).await?;
    let order = state.storage().update_order(id, patch).await?;

    Ok(Json(order))
}

/// Fetch an order, responding 404 whether it is missing or owned by someone
/// else, so ids cannot be probed.
async fn owned_order(state: &AppState, id: OrderId, user_id: &UserId) -> Result<Order> {
    let order = state
        .storage()
        .get_order(id)
        .await?
        .filter(|order| order.user_id.as_ref() == Some(user_id))
        .ok_or_else(|| AppError::NotFound("Order not found".to_owned()))?;

    Ok(order)
}
