//! Catalog product entity.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use sterling_core::ProductId;

/// A product in the hardware catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: Decimal,
    pub stock_quantity: i32,
    pub image_url: Option<String>,
    pub featured: bool,
    /// Display rating out of 5, two decimal places.
    pub rating: Decimal,
    /// Free-form specification document, stored as JSON.
    pub specifications: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert shape for a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    pub price: Decimal,
    #[serde(default)]
    pub stock_quantity: i32,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default = "default_rating")]
    pub rating: Decimal,
    #[serde(default)]
    pub specifications: Option<serde_json::Value>,
}

fn default_rating() -> Decimal {
    Decimal::new(500, 2)
}

impl NewProduct {
    /// Structural validation of client-supplied fields.
    ///
    /// # Errors
    ///
    /// Returns a human-readable message when a field is unacceptable.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name is required".to_owned());
        }
        if self.price.is_sign_negative() {
            return Err("price cannot be negative".to_owned());
        }
        if self.stock_quantity < 0 {
            return Err("stockQuantity cannot be negative".to_owned());
        }
        if self.rating.is_sign_negative() || self.rating > Decimal::new(500, 2) {
            return Err("rating must be between 0 and 5".to_owned());
        }
        Ok(())
    }
}

/// Partial-update shape: only supplied fields are merged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub stock_quantity: Option<i32>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub featured: Option<bool>,
    #[serde(default)]
    pub rating: Option<Decimal>,
    #[serde(default)]
    pub specifications: Option<serde_json::Value>,
}

impl ProductPatch {
    /// Merge this patch onto an existing record, bumping `updated_at`.
    pub fn apply_to(self, product: &mut Product, now: DateTime<Utc>) {
        if let Some(name) = self.name {
            product.name = name;
        }
        if let Some(description) = self.description {
            product.description = Some(description);
        }
        if let Some(category) = self.category {
            product.category = Some(category);
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(stock_quantity) = self.stock_quantity {
            product.stock_quantity = stock_quantity;
        }
        if let Some(image_url) = self.image_url {
            product.image_url = Some(image_url);
        }
        if let Some(featured) = self.featured {
            product.featured = featured;
        }
        if let Some(rating) = self.rating {
            product.rating = rating;
        }
        if let Some(specifications) = self.specifications {
            product.specifications = Some(specifications);
        }
        product.updated_at = now;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_price_serializes_as_string() {
        let product = Product {
            id: ProductId::new(1),
            name: "Claw Hammer".to_owned(),
            description: None,
            category: Some("tools".to_owned()),
            price: Decimal::new(8999, 2),
            stock_quantity: 12,
            image_url: None,
            featured: false,
            rating: default_rating(),
            specifications: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["price"], serde_json::json!("89.99"));
        assert_eq!(json["rating"], serde_json::json!("5.00"));
    }

    #[test]
    fn test_new_product_accepts_numeric_price() {
        let new: NewProduct =
            serde_json::from_str(r#"{"name":"Drill","price":249.99}"#).unwrap();
        assert_eq!(new.price, Decimal::new(24999, 2));
        assert_eq!(new.rating, default_rating());
        assert!(new.validate().is_ok());
    }

    #[test]
    fn test_negative_price_rejected() {
        let new: NewProduct =
            serde_json::from_str(r#"{"name":"Drill","price":"-1.00"}"#).unwrap();
        assert!(new.validate().is_err());
    }
}
