//! # Routes Module
//!
//! One module per API surface, mirroring the system's components:
//!
//! - [`products`] - catalog entry creation
//! - [`inventory`] - listing, stock mutation, audit trail
//! - [`sales`] - sales ledger and revenue reporting

pub mod inventory;
pub mod products;
pub mod sales;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use crate::AppState;

/// Builds the full application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/products", products::router())
        .nest("/inventory", inventory::router())
        .nest("/sales", sales::router())
        .with_state(state)
}

/// `GET /health`
///
/// Liveness probe: verifies the database answers queries.
async fn health(State(state): State<AppState>) -> impl IntoResponse {
    if state.db.health_check().await {
        (StatusCode::OK, Json(json!({ "status": "ok" })))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "unavailable" })),
        )
    }
}
