//! Order and order-line entities.
//!
//! An order and its lines are created together in one storage call; the
//! total is always recomputed server-side from the lines, never trusted from
//! the client.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use sterling_core::{OrderId, OrderItemId, OrderStatus, ProductId, UserId};

/// A placed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub user_id: Option<UserId>,
    pub status: OrderStatus,
    pub total_amount: Decimal,
    pub shipping_address: Option<String>,
    pub payment_method: Option<String>,
    pub payment_intent_id: Option<String>,
    pub stripe_session_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert shape for an order header.
///
/// `user_id` and `total_amount` are filled in by the handler, not the body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    #[serde(skip)]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(skip)]
    pub total_amount: Decimal,
    #[serde(default)]
    pub shipping_address: Option<String>,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub payment_intent_id: Option<String>,
    #[serde(default)]
    pub stripe_session_id: Option<String>,
}

/// A single line on an order, with the unit price snapshotted at purchase
/// time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub quantity: i32,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Insert shape for an order line.
///
/// `price` is snapshotted from the catalog by the handler; a client-supplied
/// price is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrderItem {
    pub product_id: ProductId,
    pub quantity: i32,
    #[serde(skip)]
    pub price: Decimal,
}

impl NewOrderItem {
    /// Structural validation of client-supplied fields.
    ///
    /// # Errors
    ///
    /// Returns a human-readable message when a field is unacceptable.
    pub fn validate(&self) -> Result<(), String> {
        if self.quantity <= 0 {
            return Err("quantity must be positive".to_owned());
        }
        Ok(())
    }

    /// Line subtotal (unit price times quantity).
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Partial-update shape for an order header.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPatch {
    #[serde(default)]
    pub status: Option<OrderStatus>,
    #[serde(default)]
    pub shipping_address: Option<String>,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub payment_intent_id: Option<String>,
    #[serde(default)]
    pub stripe_session_id: Option<String>,
}

impl OrderPatch {
    /// Merge this patch onto an existing record, bumping `updated_at`.
    pub fn apply_to(self, order: &mut Order, now: DateTime<Utc>) {
        if let Some(status) = self.status {
            order.status = status;
        }
        if let Some(shipping_address) = self.shipping_address {
            order.shipping_address = Some(shipping_address);
        }
        if let Some(payment_method) = self.payment_method {
            order.payment_method = Some(payment_method);
        }
        if let Some(payment_intent_id) = self.payment_intent_id {
            order.payment_intent_id = Some(payment_intent_id);
        }
        if let Some(stripe_session_id) = self.stripe_session_id {
            order.stripe_session_id = Some(stripe_session_id);
        }
        order.updated_at = now;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_item_price_not_deserialized_from_body() {
        let item: NewOrderItem =
            serde_json::from_str(r#"{"productId":2,"quantity":3,"price":"0.01"}"#).unwrap();
        assert_eq!(item.price, Decimal::ZERO);
        assert_eq!(item.quantity, 3);
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let item = NewOrderItem {
            product_id: ProductId::new(1),
            quantity: 0,
            price: Decimal::ONE,
        };
        assert!(item.validate().is_err());
    }

    #[test]
    fn test_subtotal() {
        let item = NewOrderItem {
            product_id: ProductId::new(1),
            quantity: 3,
            price: Decimal::new(24999, 2),
        };
        assert_eq!(item.subtotal(), Decimal::new(74997, 2));
    }
}
