//! # Domain Types
//!
//! Core domain types used throughout Tally.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Sale       │   │ InventoryChange │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  id             │       │
//! │  │  name           │   │  product_id(FK) │   │  product_id(FK) │       │
//! │  │  category       │   │  quantity       │   │  previous_stock │       │
//! │  │  price_cents    │   │  total_price    │   │  new_stock      │       │
//! │  │  stock          │   │  sale_date      │   │  change_amount  │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  Product is the mutable "present state"; Sale and InventoryChange      │
//! │  are append-only historical facts that reference it by foreign key.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Mutation Rules
//! - `Product.stock` is the only field that mutates after creation, and only
//!   through the stock-mutation operation (which writes the audit row in the
//!   same transaction).
//! - `Sale` and `InventoryChange` rows are never updated or deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A product in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (database-assigned).
    pub id: i64,

    /// Display name (non-empty).
    pub name: String,

    /// Category label, used as a grouping and filter key.
    pub category: String,

    /// Current price in cents (non-negative).
    pub price_cents: i64,

    /// Current on-hand quantity. May be driven negative by stock mutations.
    pub stock: i64,
}

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Checks whether the product falls at or under a low-stock threshold.
    #[inline]
    pub fn is_low_stock(&self, threshold: i64) -> bool {
        self.stock <= threshold
    }
}

/// Input for creating a product. The id is assigned by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub category: String,
    pub price_cents: i64,
    pub stock: i64,
}

// =============================================================================
// Sale
// =============================================================================

/// A completed sales transaction. Append-only; immutable once recorded.
///
/// `total_price_cents` is a point-in-time snapshot, independent of the
/// product's current price at read time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Sale {
    pub id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub total_price_cents: i64,
    pub sale_date: DateTime<Utc>,
}

impl Sale {
    /// Returns the sale total as Money.
    #[inline]
    pub fn total_price(&self) -> Money {
        Money::from_cents(self.total_price_cents)
    }
}

/// Input for recording a sale.
///
/// `sale_date` defaults to the time of recording when unset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSale {
    pub product_id: i64,
    pub quantity: i64,
    pub total_price_cents: i64,
    pub sale_date: Option<DateTime<Utc>>,
}

// =============================================================================
// Inventory Change
// =============================================================================

/// An audit entry documenting one stock mutation. Append-only; immutable.
///
/// Every stock mutation writes exactly one of these in the same transaction
/// as the `Product.stock` update, so the trail for a product - newest first -
/// reconstructs the full stock history, ending at the current stock value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct InventoryChange {
    pub id: i64,
    pub product_id: i64,
    /// Stock level immediately before the mutation.
    pub previous_stock: i64,
    /// Stock level immediately after the mutation.
    pub new_stock: i64,
    /// Signed delta: always `new_stock - previous_stock`.
    pub change_amount: i64,
    pub timestamp: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_price_as_money() {
        let product = Product {
            id: 1,
            name: "Blender".to_string(),
            category: "Home Appliances".to_string(),
            price_cents: 5999,
            stock: 100,
        };
        assert_eq!(product.price(), Money::from_cents(5999));
    }

    #[test]
    fn test_low_stock_threshold_is_inclusive() {
        let product = Product {
            id: 1,
            name: "Samsung TV".to_string(),
            category: "Electronics".to_string(),
            price_cents: 49999,
            stock: 20,
        };
        assert!(product.is_low_stock(20));
        assert!(product.is_low_stock(25));
        assert!(!product.is_low_stock(19));
    }

    #[test]
    fn test_sale_total_as_money() {
        let sale = Sale {
            id: 7,
            product_id: 1,
            quantity: 3,
            total_price_cents: 2997,
            sale_date: Utc::now(),
        };
        assert_eq!(sale.total_price().cents(), 2997);
    }
}
