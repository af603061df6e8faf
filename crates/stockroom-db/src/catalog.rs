//! # Product Catalog
//!
//! Product maintenance. Creating and deleting are plain writes; an update
//! that changes `quantity` becomes a stock-ledger movement inside the same
//! transaction, so it can never race a sale into negative stock.
//!
//! ```text
//! update_product(id, { quantity: 25, minStock: 5 })
//!     BEGIN
//!       read product (quantity 10)
//!       patch.apply  → details + delta = +15
//!       update_details (everything but quantity)
//!       StockLedger::apply_delta(+15)      WHERE quantity = 10
//!     COMMIT
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

use crate::coordinator::{with_retry, RetryPolicy};
use crate::error::{DbError, DbResult};
use crate::ledger::StockLedger;
use crate::repository::product::ProductRepository;
use stockroom_core::input::{NewProduct, ProductFilter, ProductPatch};
use stockroom_core::validation::validate_uuid;
use stockroom_core::Product;

#[derive(Debug, Clone)]
pub struct ProductCatalog {
    pool: SqlitePool,
    retry: RetryPolicy,
}

impl ProductCatalog {
    pub fn new(pool: SqlitePool) -> Self {
        ProductCatalog {
            pool,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Validates and stores a new product. The SKU is upper-cased and the
    /// status derived from the opening stock.
    ///
    /// ## Errors
    /// * `Domain(Validation)` - missing or malformed field
    /// * `UniqueViolation` - SKU already in use
    pub async fn create_product(&self, input: NewProduct) -> DbResult<Product> {
        let product = input.build(Uuid::new_v4().to_string(), Utc::now())?;

        ProductRepository::insert(&self.pool, &product).await?;

        info!(
            id = %product.id,
            sku = %product.sku,
            quantity = product.quantity,
            status = %product.status,
            "Product created"
        );
        Ok(product)
    }

    pub async fn get_product(&self, id: &str) -> DbResult<Product> {
        validate_uuid("id", id)?;

        ProductRepository::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    pub async fn list_products(&self, filter: &ProductFilter) -> DbResult<Vec<Product>> {
        ProductRepository::new(self.pool.clone()).list(filter).await
    }

    /// Products at or below their minimum stock, emptiest first.
    pub async fn low_stock_products(&self) -> DbResult<Vec<Product>> {
        ProductRepository::new(self.pool.clone()).low_stock().await
    }

    /// Applies a partial update.
    ///
    /// ## Errors
    /// * `NotFound` - no such product
    /// * `Domain(Validation)` - malformed field, negative quantity
    /// * `UniqueViolation` - new SKU already in use
    pub async fn update_product(&self, id: &str, patch: ProductPatch) -> DbResult<Product> {
        validate_uuid("id", id)?;
        let patch = &patch;

        let product = with_retry(self.retry, "update_product", move || {
            self.try_update_product(id, patch)
        })
        .await?;

        info!(
            id = %product.id,
            quantity = product.quantity,
            status = %product.status,
            "Product updated"
        );
        Ok(product)
    }

    async fn try_update_product(&self, id: &str, patch: &ProductPatch) -> DbResult<Product> {
        let mut tx = self.pool.begin().await?;

        let current = ProductRepository::find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))?;

        let patched = patch.apply(&current, Utc::now())?;

        ProductRepository::update_details(&mut *tx, &patched.product).await?;
        if patched.quantity_delta != 0 {
            StockLedger::apply_delta(&mut *tx, &patched.product, patched.quantity_delta).await?;
        }

        let updated = ProductRepository::find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Hard-deletes a product. Its sales stay on record.
    pub async fn delete_product(&self, id: &str) -> DbResult<()> {
        validate_uuid("id", id)?;

        if !ProductRepository::delete(&self.pool, id).await? {
            return Err(DbError::not_found("Product", id));
        }

        info!(id = %id, "Product deleted");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use stockroom_core::ProductStatus;

    fn cement(quantity: i64) -> NewProduct {
        NewProduct {
            name: "Cement".to_string(),
            category: "Building".to_string(),
            description: Some("50kg bag".to_string()),
            sku: "cem-50".to_string(),
            quantity,
            min_stock: 3,
            max_stock: Some(100),
            unit: "bag".to_string(),
            price_per_unit_cents: 200,
            discontinued: false,
            location: None,
            supplier: None,
        }
    }

    #[tokio::test]
    async fn test_create_normalizes_and_derives() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let product = db.catalog().create_product(cement(2)).await.unwrap();
        assert_eq!(product.sku, "CEM-50");
        assert_eq!(product.status, ProductStatus::LowStock);

        let fetched = db.catalog().get_product(&product.id).await.unwrap();
        assert_eq!(fetched.sku, "CEM-50");

        let err = db.catalog().create_product(cement(5)).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_update_quantity_goes_through_ledger() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let product = db.catalog().create_product(cement(10)).await.unwrap();

        let updated = db
            .catalog()
            .update_product(
                &product.id,
                ProductPatch {
                    quantity: Some(2),
                    name: Some("Portland Cement".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.quantity, 2);
        assert_eq!(updated.status, ProductStatus::LowStock);
        assert_eq!(updated.name, "Portland Cement");

        let updated = db
            .catalog()
            .update_product(
                &product.id,
                ProductPatch {
                    min_stock: Some(1),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.quantity, 2);
        assert_eq!(updated.status, ProductStatus::InStock);
    }

    #[tokio::test]
    async fn test_discontinue_and_reinstate() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let product = db.catalog().create_product(cement(10)).await.unwrap();

        let off = db
            .catalog()
            .update_product(
                &product.id,
                ProductPatch {
                    discontinued: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(off.status, ProductStatus::Discontinued);

        // restocking keeps it discontinued
        let restocked = db
            .catalog()
            .update_product(
                &product.id,
                ProductPatch {
                    quantity: Some(40),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(restocked.status, ProductStatus::Discontinued);

        let back = db
            .catalog()
            .update_product(
                &product.id,
                ProductPatch {
                    discontinued: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(back.status, ProductStatus::InStock);
    }

    #[tokio::test]
    async fn test_update_rejections() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let product = db.catalog().create_product(cement(10)).await.unwrap();

        let negative = ProductPatch {
            quantity: Some(-1),
            ..Default::default()
        };
        assert!(db.catalog().update_product(&product.id, negative).await.unwrap_err().is_domain());

        let missing = Uuid::new_v4().to_string();
        let err = db
            .catalog()
            .update_product(&missing, ProductPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));

        let mut other = cement(1);
        other.sku = "SND-1".to_string();
        db.catalog().create_product(other).await.unwrap();
        let taken = ProductPatch {
            sku: Some("snd-1".to_string()),
            ..Default::default()
        };
        let err = db.catalog().update_product(&product.id, taken).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));

        assert_eq!(db.catalog().get_product(&product.id).await.unwrap().quantity, 10);
    }

    #[tokio::test]
    async fn test_delete_product() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let product = db.catalog().create_product(cement(10)).await.unwrap();

        db.catalog().delete_product(&product.id).await.unwrap();
        assert!(matches!(
            db.catalog().get_product(&product.id).await,
            Err(DbError::NotFound { .. })
        ));
        assert!(matches!(
            db.catalog().delete_product(&product.id).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_list_and_low_stock() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.catalog().create_product(cement(10)).await.unwrap();
        let mut sand = cement(1);
        sand.name = "Sand".to_string();
        sand.sku = "SND-1".to_string();
        db.catalog().create_product(sand).await.unwrap();

        let filter = ProductFilter {
            search: Some("sand".to_string()),
            ..Default::default()
        };
        let found = db.catalog().list_products(&filter).await.unwrap();
        assert_eq!(found.len(), 1);

        let low = db.catalog().low_stock_products().await.unwrap();
        assert_eq!(low.len(), 1);
        assert_eq!(low[0].sku, "SND-1");
    }
}
