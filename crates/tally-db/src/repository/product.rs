//! # Product Repository
//!
//! Database operations for the product catalog.
//!
//! The catalog is the mutable "present state" of the system: one row per
//! product, holding its current attributes and current stock level. Stock
//! is never written here - all stock mutations go through
//! [`crate::repository::inventory::InventoryRepository`], which pairs the
//! update with its audit row.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use tally_core::{NewProduct, Product};

/// Repository for product catalog operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// let product = repo.insert(&new_product).await?;
/// let low = repo.list(Some(10)).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Inserts a new product and returns it with its assigned id.
    ///
    /// ## Arguments
    /// * `product` - Product attributes; the id is assigned by the database
    pub async fn insert(&self, product: &NewProduct) -> DbResult<Product> {
        debug!(name = %product.name, category = %product.category, "Inserting product");

        let result = sqlx::query(
            r#"
            INSERT INTO products (name, category, price_cents, stock)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&product.name)
        .bind(&product.category)
        .bind(product.price_cents)
        .bind(product.stock)
        .execute(&self.pool)
        .await?;

        Ok(Product {
            id: result.last_insert_rowid(),
            name: product.name.clone(),
            category: product.category.clone(),
            price_cents: product.price_cents,
            stock: product.stock,
        })
    }

    /// Gets a product by its id.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, category, price_cents, stock
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Lists products, newest first (id descending).
    ///
    /// ## Arguments
    /// * `low_stock_threshold` - When given, restricts the listing to
    ///   products with `stock <= threshold` (inclusive bound)
    pub async fn list(&self, low_stock_threshold: Option<i64>) -> DbResult<Vec<Product>> {
        debug!(threshold = ?low_stock_threshold, "Listing products");

        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, category, price_cents, stock
            FROM products
            WHERE (?1 IS NULL OR stock <= ?1)
            ORDER BY id DESC
            "#,
        )
        .bind(low_stock_threshold)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Counts total products (for diagnostics and the seed tool).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn new_product(name: &str, category: &str, price_cents: i64, stock: i64) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            category: category.to_string(),
            price_cents,
            stock,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = test_db().await;
        let repo = db.products();

        let created = repo
            .insert(&new_product("iPhone 14", "Electronics", 99999, 50))
            .await
            .unwrap();
        assert!(created.id > 0);

        let fetched = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.stock, 50);
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let db = test_db().await;

        let fetched = db.products().get_by_id(9999).await.unwrap();
        assert!(fetched.is_none());
    }

    #[tokio::test]
    async fn test_list_orders_newest_first() {
        let db = test_db().await;
        let repo = db.products();

        let first = repo
            .insert(&new_product("Samsung TV", "Electronics", 49999, 20))
            .await
            .unwrap();
        let second = repo
            .insert(&new_product("Blender", "Home Appliances", 5999, 100))
            .await
            .unwrap();

        let all = repo.list(None).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, second.id);
        assert_eq!(all[1].id, first.id);
    }

    #[tokio::test]
    async fn test_list_low_stock_threshold_is_inclusive() {
        let db = test_db().await;
        let repo = db.products();

        repo.insert(&new_product("Samsung TV", "Electronics", 49999, 20))
            .await
            .unwrap();
        repo.insert(&new_product("Blender", "Home Appliances", 5999, 100))
            .await
            .unwrap();

        let low = repo.list(Some(20)).await.unwrap();
        assert_eq!(low.len(), 1);
        assert_eq!(low[0].name, "Samsung TV");

        // Threshold below every stock level yields an empty list
        let none = repo.list(Some(5)).await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_count() {
        let db = test_db().await;
        let repo = db.products();

        assert_eq!(repo.count().await.unwrap(), 0);
        repo.insert(&new_product("Blender", "Home Appliances", 5999, 100))
            .await
            .unwrap();
        assert_eq!(repo.count().await.unwrap(), 1);
    }
}
