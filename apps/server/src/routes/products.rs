//! # Product Routes
//!
//! Catalog entry creation.

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::info;

use tally_core::{validation, NewProduct, Product};

use crate::error::ApiError;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(create_product))
}

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub category: String,
    pub price_cents: i64,
    pub stock: i64,
}

/// `POST /products`
///
/// Creates a catalog entry. Name must be non-empty, price non-negative,
/// and initial stock non-negative.
async fn create_product(
    State(state): State<AppState>,
    Json(body): Json<CreateProductRequest>,
) -> Result<Json<Product>, ApiError> {
    validation::validate_product_name(&body.name)?;
    validation::validate_category(&body.category)?;
    validation::validate_price_cents(body.price_cents)?;
    validation::validate_initial_stock(body.stock)?;

    let product = state
        .db
        .products()
        .insert(&NewProduct {
            name: body.name.trim().to_string(),
            category: body.category,
            price_cents: body.price_cents,
            stock: body.stock,
        })
        .await?;

    info!(product_id = product.id, name = %product.name, "Product created");

    Ok(Json(product))
}
