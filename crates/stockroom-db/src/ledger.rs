//! # Stock Ledger
//!
//! The only writer of `products.quantity` after a product is created.
//!
//! ## Guarded Write
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  apply_delta(product read at quantity = 6, delta = -4)                  │
//! │                                                                         │
//! │  1. stock::apply_delta → StockLevel { quantity: 2, status: LOW_STOCK }  │
//! │     (InsufficientStock if the result would go below zero)               │
//! │                                                                         │
//! │  2. UPDATE products                                                     │
//! │        SET quantity = 2, status = 'low_stock', updated_at = now         │
//! │      WHERE id = ? AND quantity = 6      ◄── the value we read           │
//! │                                                                         │
//! │  3. rows_affected == 0 → someone else moved the stock first            │
//! │     → DbError::WriteConflict (caller retries the whole operation)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `CHECK (quantity >= 0)` on the column backs this up at the storage
//! level.

use chrono::Utc;
use sqlx::{Executor, Sqlite};
use tracing::debug;

use crate::error::{DbError, DbResult};
use stockroom_core::stock::{self, StockLevel};
use stockroom_core::Product;

/// Persists stock movements.
#[derive(Debug, Clone, Copy, Default)]
pub struct StockLedger;

impl StockLedger {
    /// Applies `delta` to the stock of `product` and re-derives its status.
    ///
    /// `product` must be the row as read inside the same transaction: its
    /// quantity is the expected current value.
    ///
    /// ## Errors
    /// * `Domain(InsufficientStock)` - result would be negative, nothing written
    /// * `WriteConflict` - stock changed since `product` was read (or the
    ///   product vanished)
    pub async fn apply_delta<'e, E>(executor: E, product: &Product, delta: i64) -> DbResult<StockLevel>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let level = stock::apply_delta(product, delta)?;

        let result = sqlx::query(
            r#"
            UPDATE products
            SET quantity = ?1, status = ?2, updated_at = ?3
            WHERE id = ?4 AND quantity = ?5
            "#,
        )
        .bind(level.quantity)
        .bind(level.status)
        .bind(Utc::now())
        .bind(&product.id)
        .bind(product.quantity)
        .execute(executor)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::WriteConflict(format!(
                "stock of product {} changed concurrently",
                product.id
            )));
        }

        debug!(
            product_id = %product.id,
            delta,
            quantity = level.quantity,
            status = %level.status,
            "Stock updated"
        );

        Ok(level)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::repository::product::ProductRepository;
    use stockroom_core::input::NewProduct;
    use stockroom_core::{CoreError, ProductStatus};

    async fn seeded(quantity: i64, min_stock: i64) -> (Database, Product) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let product = NewProduct {
            name: "Cement".to_string(),
            category: "Building".to_string(),
            description: None,
            sku: "CEM-50".to_string(),
            quantity,
            min_stock,
            max_stock: None,
            unit: "bag".to_string(),
            price_per_unit_cents: 200,
            discontinued: false,
            location: None,
            supplier: None,
        }
        .build(uuid::Uuid::new_v4().to_string(), Utc::now())
        .unwrap();
        ProductRepository::insert(db.pool(), &product).await.unwrap();
        (db, product)
    }

    async fn reload(db: &Database, id: &str) -> Product {
        db.products().get_by_id(id).await.unwrap().unwrap()
    }

    #[tokio::test]
    async fn test_apply_delta_persists_quantity_and_status() {
        let (db, product) = seeded(5, 3).await;

        let level = StockLedger::apply_delta(db.pool(), &product, -3).await.unwrap();
        assert_eq!(level.status, ProductStatus::LowStock);

        let stored = reload(&db, &product.id).await;
        assert_eq!(stored.quantity, 2);
        assert_eq!(stored.status, ProductStatus::LowStock);

        StockLedger::apply_delta(db.pool(), &stored, -2).await.unwrap();
        let stored = reload(&db, &product.id).await;
        assert_eq!(stored.quantity, 0);
        assert_eq!(stored.status, ProductStatus::OutOfStock);
    }

    #[tokio::test]
    async fn test_insufficient_stock_writes_nothing() {
        let (db, product) = seeded(6, 3).await;

        let err = StockLedger::apply_delta(db.pool(), &product, -10).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Domain(CoreError::InsufficientStock {
                available: 6,
                requested: 10
            })
        ));
        assert_eq!(reload(&db, &product.id).await.quantity, 6);
    }

    #[tokio::test]
    async fn test_stale_read_is_a_conflict() {
        let (db, product) = seeded(10, 3).await;

        // another writer takes 4 first
        StockLedger::apply_delta(db.pool(), &product, -4).await.unwrap();

        // the stale copy still says 10
        let err = StockLedger::apply_delta(db.pool(), &product, -8).await.unwrap_err();
        assert!(err.is_retryable());
        assert_eq!(reload(&db, &product.id).await.quantity, 6);
    }
}
