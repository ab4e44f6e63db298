//! # Sale Repository
//!
//! Database operations for the append-only sales ledger.
//!
//! Sales are historical facts: recorded once, never updated or deleted, and
//! independent of current stock. Recording a sale does NOT decrement stock -
//! stock mutations are a separate operation with their own audit trail, and
//! the seed tool keeps the two consistent for demo data.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use tally_core::{NewSale, Sale, DEFAULT_SALES_PAGE_SIZE};

// =============================================================================
// Filter
// =============================================================================

/// Filters and pagination for sales listings. All filters are conjunctive.
#[derive(Debug, Clone)]
pub struct SaleFilter {
    /// Records to skip before applying the limit.
    pub skip: i64,

    /// Maximum records to return.
    pub limit: i64,

    /// Inclusive lower bound on `sale_date`.
    pub start_date: Option<DateTime<Utc>>,

    /// Inclusive upper bound on `sale_date`.
    pub end_date: Option<DateTime<Utc>>,

    /// Restrict to one product.
    pub product_id: Option<i64>,

    /// Restrict to products in this category (joins the catalog).
    pub category: Option<String>,
}

impl Default for SaleFilter {
    fn default() -> Self {
        SaleFilter {
            skip: 0,
            limit: DEFAULT_SALES_PAGE_SIZE,
            start_date: None,
            end_date: None,
            product_id: None,
            category: None,
        }
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for sale ledger operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Records a sale and returns it with its assigned id.
    ///
    /// ## Behavior
    /// - `sale_date` defaults to now when unset.
    /// - `total_price_cents` is stored as given: it is a point-in-time
    ///   snapshot, not derived from the product's current price.
    /// - Stock is NOT touched here.
    ///
    /// ## Errors
    /// * `DbError::ForeignKeyViolation` - `product_id` doesn't reference an
    ///   existing product
    pub async fn insert(&self, sale: &NewSale) -> DbResult<Sale> {
        let sale_date = sale.sale_date.unwrap_or_else(Utc::now);

        debug!(
            product_id = sale.product_id,
            quantity = sale.quantity,
            total_price_cents = sale.total_price_cents,
            "Recording sale"
        );

        let result = sqlx::query(
            r#"
            INSERT INTO sales (product_id, quantity, total_price_cents, sale_date)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(sale.product_id)
        .bind(sale.quantity)
        .bind(sale.total_price_cents)
        .bind(sale_date)
        .execute(&self.pool)
        .await?;

        Ok(Sale {
            id: result.last_insert_rowid(),
            product_id: sale.product_id,
            quantity: sale.quantity,
            total_price_cents: sale.total_price_cents,
            sale_date,
        })
    }

    /// Lists sales matching the filter, in insertion (id) order.
    ///
    /// The category filter joins the catalog: a sale matches when its
    /// product's category equals the filter value, independent of any date
    /// bounds.
    pub async fn list(&self, filter: &SaleFilter) -> DbResult<Vec<Sale>> {
        debug!(?filter, "Listing sales");

        let sales = sqlx::query_as::<_, Sale>(
            r#"
            SELECT s.id, s.product_id, s.quantity, s.total_price_cents, s.sale_date
            FROM sales s
            INNER JOIN products p ON p.id = s.product_id
            WHERE (?1 IS NULL OR s.sale_date >= ?1)
              AND (?2 IS NULL OR s.sale_date <= ?2)
              AND (?3 IS NULL OR s.product_id = ?3)
              AND (?4 IS NULL OR p.category = ?4)
            ORDER BY s.id
            LIMIT ?5 OFFSET ?6
            "#,
        )
        .bind(filter.start_date)
        .bind(filter.end_date)
        .bind(filter.product_id)
        .bind(filter.category.as_deref())
        .bind(filter.limit)
        .bind(filter.skip)
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
