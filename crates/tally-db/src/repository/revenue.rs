//! # Revenue Repository
//!
//! Read-side revenue reporting over the sales ledger.
//!
//! ## Division of Labor
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Revenue Reporting                                    │
//! │                                                                         │
//! │  revenue_by_period:                                                     │
//! │    SQL fetches the date-filtered sales ──► tally_core::period buckets  │
//! │    them (pure, fully unit-tested ISO-week math)                         │
//! │                                                                         │
//! │  compare:                                                               │
//! │    two independent SUM queries, one per range ──► signed difference    │
//! │    computed in tally-core (period2 minus period1)                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use tally_core::{
    period, Money, Period, PeriodRevenue, PeriodSummary, RevenueComparison, Sale,
};

/// Repository for revenue aggregation queries.
#[derive(Debug, Clone)]
pub struct RevenueRepository {
    pool: SqlitePool,
}

impl RevenueRepository {
    /// Creates a new RevenueRepository.
    pub fn new(pool: SqlitePool) -> Self {
        RevenueRepository { pool }
    }

    /// Revenue grouped by period label, ordered chronologically.
    ///
    /// ## Arguments
    /// * `period` - Bucket granularity (daily/weekly/monthly/annual)
    /// * `start_date` / `end_date` - Optional inclusive bounds on `sale_date`,
    ///   applied before bucketing
    pub async fn revenue_by_period(
        &self,
        period: Period,
        start_date: Option<DateTime<Utc>>,
        end_date: Option<DateTime<Utc>>,
    ) -> DbResult<Vec<PeriodRevenue>> {
        debug!(%period, ?start_date, ?end_date, "Aggregating revenue by period");

        let sales = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, product_id, quantity, total_price_cents, sale_date
            FROM sales
            WHERE (?1 IS NULL OR sale_date >= ?1)
              AND (?2 IS NULL OR sale_date <= ?2)
            ORDER BY sale_date
            "#,
        )
        .bind(start_date)
        .bind(end_date)
        .fetch_all(&self.pool)
        .await?;

        Ok(period::revenue_by_period(period, &sales))
    }

    /// Compares revenue across two date ranges, optionally restricted to a
    /// category.
    ///
    /// Each range is summed independently; a range with no matching sales
    /// contributes 0 (never null or an error). The difference is signed,
    /// period2 minus period1.
    pub async fn compare(
        &self,
        start1: DateTime<Utc>,
        end1: DateTime<Utc>,
        start2: DateTime<Utc>,
        end2: DateTime<Utc>,
        category: Option<&str>,
    ) -> DbResult<RevenueComparison> {
        debug!(?start1, ?end1, ?start2, ?end2, ?category, "Comparing revenue");

        let revenue1 = self.sum_range(start1, end1, category).await?;
        let revenue2 = self.sum_range(start2, end2, category).await?;

        Ok(RevenueComparison::new(
            PeriodSummary {
                start: start1,
                end: end1,
                revenue: revenue1,
            },
            PeriodSummary {
                start: start2,
                end: end2,
                revenue: revenue2,
            },
            category.map(str::to_string),
        ))
    }

    /// Sums sale totals over one inclusive date range.
    async fn sum_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        category: Option<&str>,
    ) -> DbResult<Money> {
        let cents: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(s.total_price_cents), 0)
            FROM sales s
            INNER JOIN products p ON p.id = s.product_id
            WHERE s.sale_date >= ?1
              AND s.sale_date <= ?2
              AND (?3 IS NULL OR p.category = ?3)
            "#,
        )
        .bind(start)
        .bind(end)
        .bind(category)
        .fetch_one(&self.pool)
        .await?;

        Ok(Money::from_cents(cents))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::TimeZone;
    use tally_core::{NewProduct, NewSale};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn seed_product(db: &Database, name: &str, category: &str) -> i64 {
        db.products()
            .insert(&NewProduct {
                name: name.to_string(),
                category: category.to_string(),
                price_cents: 1000,
                stock: 100,
            })
            .await
            .unwrap()
            .id
    }

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    async fn seed_sale(db: &Database, product_id: i64, date: DateTime<Utc>, total_cents: i64) {
        db.sales()
            .insert(&NewSale {
                product_id,
                quantity: 1,
                total_price_cents: total_cents,
                sale_date: Some(date),
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_daily_revenue_buckets() {
        let db = test_db().await;
        let product_id = seed_product(&db, "Blender", "Home Appliances").await;

        seed_sale(&db, product_id, at(2024, 1, 1), 1000).await;
        seed_sale(&db, product_id, at(2024, 1, 1), 500).await;
        seed_sale(&db, product_id, at(2024, 1, 2), 2000).await;

        let buckets = db
            .revenue()
            .revenue_by_period(Period::Daily, None, None)
            .await
            .unwrap();

        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].period, "2024-01-01");
        assert_eq!(buckets[0].total_revenue.cents(), 1500);
        assert_eq!(buckets[1].period, "2024-01-02");
        assert_eq!(buckets[1].total_revenue.cents(), 2000);
    }

    #[tokio::test]
    async fn test_revenue_date_filter_applies_before_bucketing() {
        let db = test_db().await;
        let product_id = seed_product(&db, "Blender", "Home Appliances").await;

        seed_sale(&db, product_id, at(2024, 1, 1), 1000).await;
        seed_sale(&db, product_id, at(2024, 2, 1), 2000).await;

        let buckets = db
            .revenue()
            .revenue_by_period(Period::Monthly, Some(at(2024, 1, 1)), Some(at(2024, 1, 31)))
            .await
            .unwrap();

        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].period, "2024-01");
        assert_eq!(buckets[0].total_revenue.cents(), 1000);
    }

    #[tokio::test]
    async fn test_weekly_buckets_cross_year_boundary() {
        let db = test_db().await;
        let product_id = seed_product(&db, "Blender", "Home Appliances").await;

        // Both dates land in ISO week 2025-W01 despite differing years
        seed_sale(&db, product_id, at(2024, 12, 30), 700).await;
        seed_sale(&db, product_id, at(2025, 1, 1), 300).await;

        let buckets = db
            .revenue()
            .revenue_by_period(Period::Weekly, None, None)
            .await
            .unwrap();

        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].period, "2025-W01");
        assert_eq!(buckets[0].total_revenue.cents(), 1000);
    }

    #[tokio::test]
    async fn test_compare_empty_period_sums_to_zero() {
        let db = test_db().await;
        let product_id = seed_product(&db, "Samsung TV", "Electronics").await;

        // Sales only in the second range
        seed_sale(&db, product_id, at(2024, 2, 10), 10000).await;

        let cmp = db
            .revenue()
            .compare(
                at(2024, 1, 1),
                at(2024, 1, 31),
                at(2024, 2, 1),
                at(2024, 2, 29),
                None,
            )
            .await
            .unwrap();

        assert_eq!(cmp.period1.revenue.cents(), 0);
        assert_eq!(cmp.period2.revenue.cents(), 10000);
        assert_eq!(cmp.difference.cents(), 10000);
    }

    #[tokio::test]
    async fn test_compare_difference_sign_reflects_decline() {
        let db = test_db().await;
        let product_id = seed_product(&db, "Samsung TV", "Electronics").await;

        seed_sale(&db, product_id, at(2024, 1, 10), 50000).await;
        seed_sale(&db, product_id, at(2024, 2, 10), 20000).await;

        let cmp = db
            .revenue()
            .compare(
                at(2024, 1, 1),
                at(2024, 1, 31),
                at(2024, 2, 1),
                at(2024, 2, 29),
                None,
            )
            .await
            .unwrap();

        assert_eq!(cmp.difference.cents(), -30000);
        assert!(cmp.difference.is_negative());
    }

    #[tokio::test]
    async fn test_compare_category_filter() {
        let db = test_db().await;
        let tv = seed_product(&db, "Samsung TV", "Electronics").await;
        let blender = seed_product(&db, "Blender", "Home Appliances").await;

        seed_sale(&db, tv, at(2024, 1, 10), 49999).await;
        seed_sale(&db, blender, at(2024, 1, 10), 5999).await;
        seed_sale(&db, tv, at(2024, 2, 10), 49999).await;

        let cmp = db
            .revenue()
            .compare(
                at(2024, 1, 1),
                at(2024, 1, 31),
                at(2024, 2, 1),
                at(2024, 2, 29),
                Some("Electronics"),
            )
            .await
            .unwrap();

        // The blender sale is filtered out of period1
        assert_eq!(cmp.period1.revenue.cents(), 49999);
        assert_eq!(cmp.period2.revenue.cents(), 49999);
        assert_eq!(cmp.difference.cents(), 0);
        assert_eq!(cmp.category.as_deref(), Some("Electronics"));
    }
}
