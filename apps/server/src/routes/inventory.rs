//! # Inventory Routes
//!
//! Listing, the stock-mutation endpoint, and the audit trail read side.

use axum::extract::{Path, Query, State};
use axum::routing::{get, put};
use axum::{Json, Router};
use serde::Deserialize;
use tracing::info;

use tally_core::{InventoryChange, Product};

use crate::error::ApiError;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_inventory))
        .route("/:product_id/stock", put(update_stock))
        .route("/:product_id/changes", get(list_changes))
}

#[derive(Debug, Deserialize)]
pub struct InventoryQuery {
    /// When given, restricts the listing to products with stock at or under
    /// this value.
    pub low_stock_threshold: Option<i64>,
}

/// `GET /inventory?low_stock_threshold=N`
///
/// Lists products, newest first.
async fn list_inventory(
    State(state): State<AppState>,
    Query(query): Query<InventoryQuery>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let products = state.db.products().list(query.low_stock_threshold).await?;
    Ok(Json(products))
}

#[derive(Debug, Deserialize)]
pub struct UpdateStockRequest {
    pub new_stock: i64,
}

/// `PUT /inventory/{product_id}/stock`
///
/// Sets the product's stock to an absolute value and records the change in
/// the audit trail, atomically. 404 when the product doesn't exist; any
/// integer value is accepted, including ones that drive stock negative.
async fn update_stock(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
    Json(body): Json<UpdateStockRequest>,
) -> Result<Json<Product>, ApiError> {
    let product = state
        .db
        .inventory()
        .update_stock(product_id, body.new_stock)
        .await?;

    info!(product_id, new_stock = product.stock, "Stock updated");

    Ok(Json(product))
}

/// `GET /inventory/{product_id}/changes`
///
/// Full change history for a product, newest first. Empty list when the
/// product has no recorded mutations.
async fn list_changes(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
) -> Result<Json<Vec<InventoryChange>>, ApiError> {
    let changes = state.db.inventory().changes_for_product(product_id).await?;
    Ok(Json(changes))
}
