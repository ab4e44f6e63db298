//! # Sales Routes
//!
//! The sales ledger (record, filtered listing) and revenue reporting
//! (period buckets, two-period comparison).

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use tally_core::{
    validation, NewSale, Period, RevenueComparison, Sale, DEFAULT_SALES_PAGE_SIZE,
};
use tally_db::SaleFilter;

use crate::error::ApiError;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_sales).post(record_sale))
        .route("/revenue/:period", get(revenue_by_period))
        .route("/compare/revenue", get(compare_revenue))
}

// =============================================================================
// Ledger
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct RecordSaleRequest {
    pub product_id: i64,
    pub quantity: i64,
    pub total_price_cents: i64,
    /// ISO-8601 date or date-time; defaults to now when unset.
    pub sale_date: Option<String>,
}

/// `POST /sales`
///
/// Appends a sale to the ledger. Quantity must be positive; the total is
/// stored as given (a point-in-time snapshot). Stock is NOT decremented -
/// stock mutations are their own operation with their own audit trail.
async fn record_sale(
    State(state): State<AppState>,
    Json(body): Json<RecordSaleRequest>,
) -> Result<Json<Sale>, ApiError> {
    validation::validate_quantity(body.quantity)?;
    if body.total_price_cents < 0 {
        return Err(ApiError::validation("total_price_cents must be non-negative"));
    }

    let sale_date = body
        .sale_date
        .as_deref()
        .map(|s| validation::parse_start_bound("sale_date", s))
        .transpose()?;

    // Referential pre-check so a missing product reads as 404, not as a
    // constraint failure
    state
        .db
        .products()
        .get_by_id(body.product_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", body.product_id))?;

    let sale = state
        .db
        .sales()
        .insert(&NewSale {
            product_id: body.product_id,
            quantity: body.quantity,
            total_price_cents: body.total_price_cents,
            sale_date,
        })
        .await?;

    info!(sale_id = sale.id, product_id = sale.product_id, "Sale recorded");

    Ok(Json(sale))
}

#[derive(Debug, Deserialize)]
pub struct ListSalesQuery {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub product_id: Option<i64>,
    pub category: Option<String>,
}

/// `GET /sales`
///
/// Filtered, paginated listing in insertion order. Filters are conjunctive;
/// date bounds are inclusive on `sale_date`.
async fn list_sales(
    State(state): State<AppState>,
    Query(query): Query<ListSalesQuery>,
) -> Result<Json<Vec<Sale>>, ApiError> {
    let filter = SaleFilter {
        skip: query.skip.unwrap_or(0).max(0),
        limit: query.limit.unwrap_or(DEFAULT_SALES_PAGE_SIZE).max(0),
        start_date: query
            .start_date
            .as_deref()
            .map(|s| validation::parse_start_bound("start_date", s))
            .transpose()?,
        end_date: query
            .end_date
            .as_deref()
            .map(|s| validation::parse_end_bound("end_date", s))
            .transpose()?,
        product_id: query.product_id,
        category: query.category,
    };

    let sales = state.db.sales().list(&filter).await?;
    Ok(Json(sales))
}

// =============================================================================
// Revenue Reporting
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct RevenueQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RevenueBucketResponse {
    pub period: String,
    pub total_revenue_cents: i64,
}

/// `GET /sales/revenue/{period}`
///
/// Revenue bucketed by `daily`, `weekly`, `monthly`, or `annual`, ordered
/// chronologically. An unrecognized period yields a 400 with a structured
/// error body, never a partial result.
async fn revenue_by_period(
    State(state): State<AppState>,
    Path(period): Path<String>,
    Query(query): Query<RevenueQuery>,
) -> Result<Json<Vec<RevenueBucketResponse>>, ApiError> {
    let period: Period = period.parse()?;

    let start_date = query
        .start_date
        .as_deref()
        .map(|s| validation::parse_start_bound("start_date", s))
        .transpose()?;
    let end_date = query
        .end_date
        .as_deref()
        .map(|s| validation::parse_end_bound("end_date", s))
        .transpose()?;

    let buckets = state
        .db
        .revenue()
        .revenue_by_period(period, start_date, end_date)
        .await?;

    Ok(Json(
        buckets
            .into_iter()
            .map(|b| RevenueBucketResponse {
                period: b.period,
                total_revenue_cents: b.total_revenue.cents(),
            })
            .collect(),
    ))
}

#[derive(Debug, Deserialize)]
pub struct CompareQuery {
    pub start1: String,
    pub end1: String,
    pub start2: String,
    pub end2: String,
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PeriodSummaryResponse {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub revenue_cents: i64,
}

#[derive(Debug, Serialize)]
pub struct CompareResponse {
    pub period1: PeriodSummaryResponse,
    pub period2: PeriodSummaryResponse,
    /// Signed: period2 minus period1.
    pub difference_cents: i64,
    pub category: Option<String>,
}

impl From<RevenueComparison> for CompareResponse {
    fn from(cmp: RevenueComparison) -> Self {
        CompareResponse {
            period1: PeriodSummaryResponse {
                start: cmp.period1.start,
                end: cmp.period1.end,
                revenue_cents: cmp.period1.revenue.cents(),
            },
            period2: PeriodSummaryResponse {
                start: cmp.period2.start,
                end: cmp.period2.end,
                revenue_cents: cmp.period2.revenue.cents(),
            },
            difference_cents: cmp.difference.cents(),
            category: cmp.category,
        }
    }
}

/// `GET /sales/compare/revenue`
///
/// Two independent revenue sums over inclusive date ranges, optionally
/// restricted to a category. A range with no sales sums to 0.
async fn compare_revenue(
    State(state): State<AppState>,
    Query(query): Query<CompareQuery>,
) -> Result<Json<CompareResponse>, ApiError> {
    let start1 = validation::parse_start_bound("start1", &query.start1)?;
    let end1 = validation::parse_end_bound("end1", &query.end1)?;
    let start2 = validation::parse_start_bound("start2", &query.start2)?;
    let end2 = validation::parse_end_bound("end2", &query.end2)?;

    let comparison = state
        .db
        .revenue()
        .compare(start1, end1, start2, end2, query.category.as_deref())
        .await?;

    Ok(Json(comparison.into()))
}
