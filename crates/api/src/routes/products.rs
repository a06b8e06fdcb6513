//! Product catalog route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::instrument;

use sterling_core::ProductId;

use crate::error::{AppError, Result};
use crate::middleware::RequireUser;
use crate::models::{NewProduct, Product, ProductPatch};
use crate::state::AppState;
use crate::storage::ProductFilter;

/// Query parameters for the product listing.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub featured: Option<bool>,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub limit: Option<i64>,
}

/// GET /api/products
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Product>>> {
    let products = state
        .storage()
        .get_products(ProductFilter {
            category: query.category,
            featured: query.featured,
            search: query.search,
            limit: query.limit,
        })
        .await?;

    Ok(Json(products))
}

/// GET /api/products/search/{query}
pub async fn search(
    State(state): State<AppState>,
    Path(query): Path<String>,
) -> Result<Json<Vec<Product>>> {
    if query.trim().is_empty() {
        return Err(AppError::BadRequest("Search query is required".to_owned()));
    }

    let products = state.storage().search_products(query.trim()).await?;

    Ok(Json(products))
}

/// GET /api/products/{id}
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>> {
    let product = state
        .storage()
        .get_product(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_owned()))?;

    Ok(Json(product))
}

/// POST /api/products
#[instrument(skip(state, new_product), fields(user_id = %user_id))]
pub async fn create(
    State(state): State<AppState>,
    RequireUser(user_id): RequireUser,
    Json(new_product): Json<NewProduct>,
) -> Result<(StatusCode, Json<Product>)> {
    new_product.validate().map_err(AppError::BadRequest)?;

    let product = state.storage().create_product(new_product).await?;

    Ok((StatusCode::CREATED, Json(product)))
}

/// PUT /api/products/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireUser(_user_id): RequireUser,
    Path(id): Path<ProductId>,
    Json(patch): Json<ProductPatch>,
) -> Result<Json<Product>> {
    let product = state.storage().update_product(id, patch).await?;

    Ok(Json(product))
}

/// DELETE /api/products/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireUser(_user_id): RequireUser,
    Path(id): Path<ProductId>,
) -> Result<StatusCode> {
    state.storage().delete_product(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
