//! # Inventory Repository
//!
//! The stock-mutation transaction and the audit trail read side.
//!
//! ## The Audit-Writing Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  update_stock(product_id, new_stock)                    │
//! │                                                                         │
//! │  BEGIN TRANSACTION                                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SELECT product  ──── missing? ──► rollback, NotFound                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  UPDATE products SET stock = new_stock                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  INSERT INTO inventory_changes (previous, new, delta, timestamp)        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  COMMIT ── both rows land, or neither does                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! This is the single place in the system where a multi-row invariant must
//! hold under failure: no stock mutation without its audit row, no audit row
//! without its mutation. SQLite serializes write transactions, so the stock
//! value read here cannot be overwritten by a concurrent mutation before the
//! commit - the audit trail's previous/new chain stays contiguous.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use tally_core::{InventoryChange, Product};

/// Repository for stock mutations and the inventory audit trail.
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    pool: SqlitePool,
}

impl InventoryRepository {
    /// Creates a new InventoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        InventoryRepository { pool }
    }

    /// Sets a product's stock to an absolute value, recording the change.
    ///
    /// ## Behavior
    /// - The stock update and its audit row commit together or not at all.
    /// - Any integer is accepted, including values that make stock negative;
    ///   this operation does not validate against sales history.
    ///
    /// ## Arguments
    /// * `product_id` - Product to mutate
    /// * `new_stock` - Absolute stock level to set
    ///
    /// ## Returns
    /// * `Ok(Product)` - The product with its updated stock
    /// * `Err(DbError::NotFound)` - No such product; nothing was written
    pub async fn update_stock(&self, product_id: i64, new_stock: i64) -> DbResult<Product> {
        debug!(product_id, new_stock, "Updating stock");

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, category, price_cents, stock
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(product_id)
        .fetch_optional(&mut *tx)
        .await?;

        // Dropping the transaction without commit rolls it back
        let Some(product) = product else {
            return Err(DbError::not_found("Product", product_id));
        };

        let previous_stock = product.stock;
        let change_amount = new_stock - previous_stock;
        let now = Utc::now();

        sqlx::query(
            r#"
            UPDATE products
            SET stock = ?2
            WHERE id = ?1
            "#,
        )
        .bind(product_id)
        .bind(new_stock)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO inventory_changes (
                product_id, previous_stock, new_stock, change_amount, timestamp
            ) VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(product_id)
        .bind(previous_stock)
        .bind(new_stock)
        .bind(change_amount)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        debug!(
            product_id,
            previous_stock, new_stock, change_amount, "Stock updated"
        );

        Ok(Product {
            stock: new_stock,
            ..product
        })
    }

    /// Returns the full change history for a product, newest first.
    ///
    /// A product with no recorded mutations yields an empty vec, not an
    /// error - including ids that don't exist in the catalog at all.
    pub async fn changes_for_product(&self, product_id: i64) -> DbResult<Vec<InventoryChange>> {
        let changes = sqlx::query_as::<_, InventoryChange>(
            r#"
            SELECT id, product_id, previous_stock, new_stock, change_amount, timestamp
            FROM inventory_changes
            WHERE product_id = ?1
            ORDER BY timestamp DESC, id DESC
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(changes)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use tally_core::NewProduct;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn seed_product(db: &Database, stock: i64) -> Product {
        db.products()
            .insert(&NewProduct {
                name: "Samsung TV".to_string(),
                category: "Electronics".to_string(),
                price_cents: 49999,
                stock,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_update_stock_writes_audit_row() {
        let db = test_db().await;
        let product = seed_product(&db, 50).await;

        let updated = db.inventory().update_stock(product.id, 45).await.unwrap();
        assert_eq!(updated.stock, 45);

        // Catalog row reflects the mutation
        let fetched = db.products().get_by_id(product.id).await.unwrap().unwrap();
        assert_eq!(fetched.stock, 45);

        // Exactly one audit row, with the full before/after picture
        let changes = db.inventory().changes_for_product(product.id).await.unwrap();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].previous_stock, 50);
        assert_eq!(changes[0].new_stock, 45);
        assert_eq!(changes[0].change_amount, -5);
    }

    #[tokio::test]
    async fn test_audit_trail_reconstructs_stock_history() {
        let db = test_db().await;
        let product = seed_product(&db, 50).await;
        let inventory = db.inventory();

        for &stock in &[45, 60, 0, 7] {
            inventory.update_stock(product.id, stock).await.unwrap();
        }

        let changes = inventory.changes_for_product(product.id).await.unwrap();
        assert_eq!(changes.len(), 4);

        // Newest first: the head of the trail matches current stock
        let current = db.products().get_by_id(product.id).await.unwrap().unwrap();
        assert_eq!(changes[0].new_stock, current.stock);

        // Replayed oldest-to-newest, the chain is contiguous: each entry
        // starts where the previous one ended, beginning at the initial stock
        let mut expected_previous = 50;
        for change in changes.iter().rev() {
            assert_eq!(change.previous_stock, expected_previous);
            assert_eq!(change.change_amount, change.new_stock - change.previous_stock);
            expected_previous = change.new_stock;
        }
        assert_eq!(expected_previous, 7);
    }

    #[tokio::test]
    async fn test_update_stock_missing_product_writes_nothing() {
        let db = test_db().await;
        let product = seed_product(&db, 50).await;

        let err = db.inventory().update_stock(9999, 10).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { id: 9999, .. }));

        // No audit row appeared anywhere, and existing stock is untouched
        assert!(db.inventory().changes_for_product(9999).await.unwrap().is_empty());
        let fetched = db.products().get_by_id(product.id).await.unwrap().unwrap();
        assert_eq!(fetched.stock, 50);
        assert!(db.inventory().changes_for_product(product.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_negative_stock_is_permitted() {
        // No component rejects a stock value below zero; the mutation is
        // absolute and the audit row records the swing faithfully.
        let db = test_db().await;
        let product = seed_product(&db, 3).await;

        let updated = db.inventory().update_stock(product.id, -2).await.unwrap();
        assert_eq!(updated.stock, -2);

        let changes = db.inventory().changes_for_product(product.id).await.unwrap();
        assert_eq!(changes[0].previous_stock, 3);
        assert_eq!(changes[0].new_stock, -2);
        assert_eq!(changes[0].change_amount, -5);
    }

    #[tokio::test]
    async fn test_no_mutations_yields_empty_history() {
        let db = test_db().await;
        let product = seed_product(&db, 50).await;

        let changes = db.inventory().changes_for_product(product.id).await.unwrap();
        assert!(changes.is_empty());
    }

    #[tokio::test]
    async fn test_setting_same_stock_still_audits() {
        // A mutation to the current value is a legitimate event: it lands in
        // the trail with change_amount 0.
        let db = test_db().await;
        let product = seed_product(&db, 50).await;

        db.inventory().update_stock(product.id, 50).await.unwrap();

        let changes = db.inventory().changes_for_product(product.id).await.unwrap();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].change_amount, 0);
    }
}
