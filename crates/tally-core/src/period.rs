//! # Period Module
//!
//! Revenue aggregation: period bucketing and two-period comparison.
//!
//! ## Bucketing
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Revenue Bucketing                                   │
//! │                                                                         │
//! │  Sales (sale_date, total)          Period::Monthly                     │
//! │  ──────────────────────            ────────────────                    │
//! │  2024-01-01  $10.00    ──┐                                             │
//! │  2024-01-15   $5.00    ──┼──►  "2024-01"  $15.00                       │
//! │  2024-02-02  $20.00    ──┼──►  "2024-02"  $20.00                       │
//! │                          │                                             │
//! │  Output ordered chronologically, one row per non-empty bucket.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Labels
//! - Daily:   `YYYY-MM-DD`
//! - Weekly:  `YYYY-Www` (ISO-8601 week; the year is the ISO week-year, so
//!   2024-12-30 labels as `2025-W01`)
//! - Monthly: `YYYY-MM`
//! - Annual:  `YYYY`
//!
//! Buckets are ordered by a numeric (year, sub-period) key rather than by
//! label text, so week ordering stays chronological across year boundaries.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::money::Money;
use crate::types::Sale;

// =============================================================================
// Period
// =============================================================================

/// Supported revenue aggregation periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Daily,
    Weekly,
    Monthly,
    Annual,
}

impl Period {
    /// Returns the canonical lowercase name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Period::Daily => "daily",
            Period::Weekly => "weekly",
            Period::Monthly => "monthly",
            Period::Annual => "annual",
        }
    }

    /// Returns the bucket label for a timestamp under this period.
    pub fn label(&self, at: DateTime<Utc>) -> String {
        match self {
            Period::Daily => at.format("%Y-%m-%d").to_string(),
            Period::Weekly => {
                let iso = at.iso_week();
                format!("{:04}-W{:02}", iso.year(), iso.week())
            }
            Period::Monthly => at.format("%Y-%m").to_string(),
            Period::Annual => at.format("%Y").to_string(),
        }
    }

    /// Returns a numeric sort key that orders buckets chronologically.
    ///
    /// For weekly buckets the key is (ISO week-year, week number); a plain
    /// string sort would be equivalent here, but the key makes the ordering
    /// contract independent of label formatting.
    fn sort_key(&self, at: DateTime<Utc>) -> (i32, u32, u32) {
        match self {
            Period::Daily => (at.year(), at.month(), at.day()),
            Period::Weekly => {
                let iso = at.iso_week();
                (iso.year(), iso.week(), 0)
            }
            Period::Monthly => (at.year(), at.month(), 0),
            Period::Annual => (at.year(), 0, 0),
        }
    }
}

/// Parses a period name. Unrecognized values yield a structured
/// [`CoreError::InvalidPeriod`], never a partial result.
impl FromStr for Period {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Period::Daily),
            "weekly" => Ok(Period::Weekly),
            "monthly" => Ok(Period::Monthly),
            "annual" => Ok(Period::Annual),
            _ => Err(CoreError::InvalidPeriod(s.to_string())),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Bucketed Revenue
// =============================================================================

/// One revenue bucket: a period label and the revenue that fell into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodRevenue {
    /// Bucket label (e.g. "2024-03" for monthly).
    pub period: String,

    /// Sum of sale totals in this bucket.
    pub total_revenue: Money,
}

/// Buckets sales by period label and sums revenue per bucket.
///
/// ## Behavior
/// - Output contains one row per non-empty bucket, ordered chronologically.
/// - Empty input yields an empty vec.
/// - Any date filtering happens before this function; it aggregates exactly
///   the sales it is given.
///
/// ## Example
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use tally_core::period::{revenue_by_period, Period};
/// use tally_core::types::Sale;
///
/// let sales = vec![Sale {
///     id: 1,
///     product_id: 1,
///     quantity: 1,
///     total_price_cents: 1000,
///     sale_date: Utc.with_ymd_and_hms(2024, 1, 1, 9, 30, 0).unwrap(),
/// }];
///
/// let buckets = revenue_by_period(Period::Daily, &sales);
/// assert_eq!(buckets[0].period, "2024-01-01");
/// assert_eq!(buckets[0].total_revenue.cents(), 1000);
/// ```
pub fn revenue_by_period(period: Period, sales: &[Sale]) -> Vec<PeriodRevenue> {
    let mut buckets: BTreeMap<(i32, u32, u32), (String, Money)> = BTreeMap::new();

    for sale in sales {
        let key = period.sort_key(sale.sale_date);
        let entry = buckets
            .entry(key)
            .or_insert_with(|| (period.label(sale.sale_date), Money::zero()));
        entry.1 += sale.total_price();
    }

    buckets
        .into_values()
        .map(|(period, total_revenue)| PeriodRevenue {
            period,
            total_revenue,
        })
        .collect()
}

// =============================================================================
// Two-Period Comparison
// =============================================================================

/// Revenue over one inclusive date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodSummary {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub revenue: Money,
}

/// The result of comparing revenue across two date ranges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevenueComparison {
    pub period1: PeriodSummary,
    pub period2: PeriodSummary,

    /// Always `period2.revenue - period1.revenue`; callers rely on the sign
    /// to distinguish growth from decline.
    pub difference: Money,

    /// Category filter the comparison was restricted to, if any.
    pub category: Option<String>,
}

impl RevenueComparison {
    /// Builds a comparison, computing the signed difference (period2 minus
    /// period1).
    pub fn new(period1: PeriodSummary, period2: PeriodSummary, category: Option<String>) -> Self {
        let difference = period2.revenue - period1.revenue;
        RevenueComparison {
            period1,
            period2,
            difference,
            category,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sale(id: i64, date: DateTime<Utc>, total_cents: i64) -> Sale {
        Sale {
            id,
            product_id: 1,
            quantity: 1,
            total_price_cents: total_cents,
            sale_date: date,
        }
    }

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_parse_period() {
        assert_eq!("daily".parse::<Period>().unwrap(), Period::Daily);
        assert_eq!("Weekly".parse::<Period>().unwrap(), Period::Weekly);
        assert_eq!(" monthly ".parse::<Period>().unwrap(), Period::Monthly);
        assert_eq!("annual".parse::<Period>().unwrap(), Period::Annual);

        let err = "quarterly".parse::<Period>().unwrap_err();
        assert!(matches!(err, CoreError::InvalidPeriod(ref s) if s == "quarterly"));
    }

    #[test]
    fn test_labels() {
        let date = at(2024, 3, 5);
        assert_eq!(Period::Daily.label(date), "2024-03-05");
        assert_eq!(Period::Weekly.label(date), "2024-W10");
        assert_eq!(Period::Monthly.label(date), "2024-03");
        assert_eq!(Period::Annual.label(date), "2024");
    }

    #[test]
    fn test_weekly_label_uses_iso_week_year() {
        // 2024-12-30 is the Monday of ISO week 1 of 2025.
        assert_eq!(Period::Weekly.label(at(2024, 12, 30)), "2025-W01");
        assert_eq!(Period::Weekly.label(at(2025, 1, 1)), "2025-W01");
        // 2021-01-01 falls in the last ISO week of 2020.
        assert_eq!(Period::Weekly.label(at(2021, 1, 1)), "2020-W53");
    }

    #[test]
    fn test_daily_bucketing_sums_and_orders() {
        let sales = vec![
            sale(1, at(2024, 1, 1), 1000),
            sale(2, at(2024, 1, 1), 500),
            sale(3, at(2024, 1, 2), 2000),
        ];

        let buckets = revenue_by_period(Period::Daily, &sales);
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].period, "2024-01-01");
        assert_eq!(buckets[0].total_revenue.cents(), 1500);
        assert_eq!(buckets[1].period, "2024-01-02");
        assert_eq!(buckets[1].total_revenue.cents(), 2000);
    }

    #[test]
    fn test_weekly_bucketing_across_year_boundary() {
        // Dec 30 2024 and Jan 1 2025 share ISO week 2025-W01 even though the
        // calendar years differ; Dec 23 2024 is the week before.
        let sales = vec![
            sale(1, at(2025, 1, 1), 300),
            sale(2, at(2024, 12, 30), 700),
            sale(3, at(2024, 12, 23), 100),
        ];

        let buckets = revenue_by_period(Period::Weekly, &sales);
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].period, "2024-W52");
        assert_eq!(buckets[0].total_revenue.cents(), 100);
        assert_eq!(buckets[1].period, "2025-W01");
        assert_eq!(buckets[1].total_revenue.cents(), 1000);
    }

    #[test]
    fn test_monthly_and_annual_bucketing() {
        let sales = vec![
            sale(1, at(2023, 12, 31), 100),
            sale(2, at(2024, 1, 1), 200),
            sale(3, at(2024, 2, 1), 400),
        ];

        let monthly = revenue_by_period(Period::Monthly, &sales);
        assert_eq!(
            monthly
                .iter()
                .map(|b| b.period.as_str())
                .collect::<Vec<_>>(),
            vec!["2023-12", "2024-01", "2024-02"]
        );

        let annual = revenue_by_period(Period::Annual, &sales);
        assert_eq!(annual.len(), 2);
        assert_eq!(annual[0].period, "2023");
        assert_eq!(annual[0].total_revenue.cents(), 100);
        assert_eq!(annual[1].period, "2024");
        assert_eq!(annual[1].total_revenue.cents(), 600);
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        assert!(revenue_by_period(Period::Daily, &[]).is_empty());
    }

    #[test]
    fn test_comparison_difference_is_period2_minus_period1() {
        let p1 = PeriodSummary {
            start: at(2024, 1, 1),
            end: at(2024, 1, 31),
            revenue: Money::from_cents(0),
        };
        let p2 = PeriodSummary {
            start: at(2024, 2, 1),
            end: at(2024, 2, 29),
            revenue: Money::from_cents(10000),
        };

        let cmp = RevenueComparison::new(p1.clone(), p2.clone(), None);
        assert_eq!(cmp.difference.cents(), 10000);

        // Reversed order flips the sign.
        let cmp = RevenueComparison::new(p2, p1, Some("Electronics".to_string()));
        assert_eq!(cmp.difference.cents(), -10000);
        assert!(cmp.difference.is_negative());
        assert_eq!(cmp.category.as_deref(), Some("Electronics"));
    }
}
