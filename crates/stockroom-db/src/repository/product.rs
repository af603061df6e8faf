//! # Product Repository
//!
//! Database operations for product rows.
//!
//! `quantity` is written here exactly once, on insert. Every later change
//! goes through [`StockLedger`](crate::ledger::StockLedger).

use sqlx::{Executor, QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::escape_like;
use stockroom_core::input::ProductFilter;
use stockroom_core::{Product, ProductStatus};

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
/// let product = repo.get_by_id(&id).await?;
///
/// // inside a transaction
/// let product = ProductRepository::find_by_id(&mut *tx, &id).await?;
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

    // =========================================================================
    // Executor-generic operations
    // =========================================================================

    /// Loads one product.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn find_by_id<'e, E>(executor: E, id: &str) -> DbResult<Option<Product>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = ?1")
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(product)
    }

    /// Loads every product whose id is in `ids`. Missing ids are skipped.
    pub async fn find_by_ids<'e, E>(executor: E, ids: &[String]) -> DbResult<Vec<Product>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut qb = QueryBuilder::<Sqlite>::new("SELECT * FROM products WHERE id IN (");
        let mut list = qb.separated(", ");
        for id in ids {
            list.push_bind(id.clone());
        }
        list.push_unseparated(")");

        let products = qb.build_query_as::<Product>().fetch_all(executor).await?;
        Ok(products)
    }

    /// Inserts a new product, including its opening quantity.
    ///
    /// ## Errors
    /// * `DbError::UniqueViolation` - SKU already exists
    pub async fn insert<'e, E>(executor: E, product: &Product) -> DbResult<()>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        debug!(sku = %product.sku, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, category, description, sku,
                quantity, min_stock, max_stock, unit, price_per_unit_cents,
                status, location, supplier, last_restocked,
                created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5,
                ?6, ?7, ?8, ?9, ?10,
                ?11, ?12, ?13, ?14,
                ?15, ?16
            )
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.category)
        .bind(&product.description)
        .bind(&product.sku)
        .bind(product.quantity)
        .bind(product.min_stock)
        .bind(product.max_stock)
        .bind(&product.unit)
        .bind(product.price_per_unit_cents)
        .bind(product.status)
        .bind(&product.location)
        .bind(&product.supplier)
        .bind(product.last_restocked)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(executor)
        .await
        .map_err(|e| DbError::from(e).with_duplicate_value(&product.sku))?;

        Ok(())
    }

    /// Writes every column except `quantity`.
    ///
    /// ## Errors
    /// * `DbError::NotFound` - Product doesn't exist
    /// * `DbError::UniqueViolation` - new SKU is taken
    pub async fn update_details<'e, E>(executor: E, product: &Product) -> DbResult<()>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        debug!(id = %product.id, "Updating product details");

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = ?2,
                category = ?3,
                description = ?4,
                sku = ?5,
                min_stock = ?6,
                max_stock = ?7,
                unit = ?8,
                price_per_unit_cents = ?9,
                status = ?10,
                location = ?11,
                supplier = ?12,
                last_restocked = ?13,
                updated_at = ?14
            WHERE id = ?1
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.category)
        .bind(&product.description)
        .bind(&product.sku)
        .bind(product.min_stock)
        .bind(product.max_stock)
        .bind(&product.unit)
        .bind(product.price_per_unit_cents)
        .bind(product.status)
        .bind(&product.location)
        .bind(&product.supplier)
        .bind(product.last_restocked)
        .bind(product.updated_at)
        .execute(executor)
        .await
        .map_err(|e| DbError::from(e).with_duplicate_value(&product.sku))?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", &product.id));
        }

        Ok(())
    }

    /// Hard-deletes a product. Sales referencing it are left alone.
    ///
    /// Returns `false` if no such product existed.
    pub async fn delete<'e, E>(executor: E, id: &str) -> DbResult<bool>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    // Pool conveniences
    // =========================================================================

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        Self::find_by_id(&self.pool, id).await
    }

    /// Lists products matching `filter`, newest first.
    ///
    /// `search` is a case-insensitive substring match over name, SKU,
    /// description and category.
    pub async fn list(&self, filter: &ProductFilter) -> DbResult<Vec<Product>> {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT * FROM products WHERE 1 = 1");

        if let Some(term) = filter.search_term() {
            let pattern = format!("%{}%", escape_like(&term));
            qb.push(" AND (");
            for (i, column) in ["name", "sku", "description", "category"].iter().enumerate() {
                if i > 0 {
                    qb.push(" OR ");
                }
                qb.push(*column)
                    .push(" LIKE ")
                    .push_bind(pattern.clone())
                    .push(" ESCAPE '\\'");
            }
            qb.push(")");
        }

        if let Some(category) = &filter.category {
            qb.push(" AND category = ").push_bind(category.clone());
        }

        if let Some(status) = filter.status {
            qb.push(" AND status = ").push_bind(status);
        }

        qb.push(" ORDER BY created_at DESC, id LIMIT ")
            .push_bind(filter.limit())
            .push(" OFFSET ")
            .push_bind(filter.skip());

        let products = qb.build_query_as::<Product>().fetch_all(&self.pool).await?;

        debug!(count = products.len(), "Listed products");
        Ok(products)
    }

    /// Products that need restocking (LOW_STOCK or OUT_OF_STOCK), emptiest
    /// first.
    pub async fn low_stock(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT * FROM products
            WHERE status IN (?1, ?2)
            ORDER BY quantity ASC, name ASC
            "#,
        )
        .bind(ProductStatus::LowStock)
        .bind(ProductStatus::OutOfStock)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::Utc;
    use stockroom_core::input::NewProduct;

    fn new_product(name: &str, sku: &str, category: &str, quantity: i64) -> Product {
        NewProduct {
            name: name.to_string(),
            category: category.to_string(),
            description: Some(format!("{name} for site work")),
            sku: sku.to_string(),
            quantity,
            min_stock: 3,
            max_stock: None,
            unit: "bag".to_string(),
            price_per_unit_cents: 200,
            discontinued: false,
            location: None,
            supplier: None,
        }
        .build(uuid::Uuid::new_v4().to_string(), Utc::now())
        .unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let product = new_product("Cement", "cem-50", "Building", 10);

        ProductRepository::insert(db.pool(), &product).await.unwrap();

        let found = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(found.name, product.name);
        assert_eq!(found.sku, "CEM-50");
        assert_eq!(found.quantity, 10);
        assert_eq!(found.status, ProductStatus::InStock);
        assert_eq!(found.max_stock, None);

        assert!(db.products().get_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_sku() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        ProductRepository::insert(db.pool(), &new_product("Cement", "CEM-50", "Building", 1))
            .await
            .unwrap();

        let err = ProductRepository::insert(db.pool(), &new_product("Other", "cem-50", "Building", 1))
            .await
            .unwrap_err();

        match err {
            DbError::UniqueViolation { field, value } => {
                assert_eq!(field, "sku");
                assert_eq!(value, "CEM-50");
            }
            other => panic!("expected UniqueViolation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_update_details_leaves_quantity() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut product = new_product("Cement", "CEM-50", "Building", 10);
        ProductRepository::insert(db.pool(), &product).await.unwrap();

        product.name = "Cement 50kg".to_string();
        product.quantity = 999;
        ProductRepository::update_details(db.pool(), &product).await.unwrap();

        let found = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(found.name, "Cement 50kg");
        assert_eq!(found.quantity, 10);

        product.id = "missing".to_string();
        assert!(matches!(
            ProductRepository::update_details(db.pool(), &product).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_list_filters() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        for (name, sku, category, qty) in [
            ("Cement", "CEM-50", "Building", 10),
            ("Sharp Sand", "SND-1", "Building", 2),
            ("Paint 100%", "PNT-1", "Finishing", 0),
        ] {
            ProductRepository::insert(db.pool(), &new_product(name, sku, category, qty))
                .await
                .unwrap();
        }
        let repo = db.products();

        let all = repo.list(&ProductFilter::default()).await.unwrap();
        assert_eq!(all.len(), 3);

        let search = ProductFilter {
            search: Some("SAND".to_string()),
            ..Default::default()
        };
        let found = repo.list(&search).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].sku, "SND-1");

        // '%' is matched literally
        let percent = ProductFilter {
            search: Some("100%".to_string()),
            ..Default::default()
        };
        assert_eq!(repo.list(&percent).await.unwrap().len(), 1);

        let building = ProductFilter {
            category: Some("Building".to_string()),
            status: Some(ProductStatus::LowStock),
            ..Default::default()
        };
        let found = repo.list(&building).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Sharp Sand");

        let paged = ProductFilter {
            skip: Some(2),
            limit: Some(2),
            ..Default::default()
        };
        assert_eq!(repo.list(&paged).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_low_stock_and_find_by_ids() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let healthy = new_product("Cement", "CEM-50", "Building", 10);
        let low = new_product("Sand", "SND-1", "Building", 2);
        let empty = new_product("Gravel", "GRV-1", "Building", 0);
        for p in [&healthy, &low, &empty] {
            ProductRepository::insert(db.pool(), p).await.unwrap();
        }

        let restock = db.products().low_stock().await.unwrap();
        let names: Vec<&str> = restock.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Gravel", "Sand"]);

        let ids = vec![healthy.id.clone(), "missing".to_string()];
        let found = ProductRepository::find_by_ids(db.pool(), &ids).await.unwrap();
        assert_eq!(found.len(), 1);
        assert!(ProductRepository::find_by_ids(db.pool(), &[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let product = new_product("Cement", "CEM-50", "Building", 10);
        ProductRepository::insert(db.pool(), &product).await.unwrap();

        assert!(ProductRepository::delete(db.pool(), &product.id).await.unwrap());
        assert!(!ProductRepository::delete(db.pool(), &product.id).await.unwrap());
    }
}
