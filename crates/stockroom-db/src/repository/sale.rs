//! # Sale Repository
//!
//! Database operations for sale rows.
//!
//! The store never touches stock. Keeping a sale and its stock movement in
//! step is the [`SaleCoordinator`](crate::coordinator::SaleCoordinator)'s job;
//! it calls these functions with its open transaction.

use sqlx::{Executor, QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use stockroom_core::dashboard::SaleTotals;
use stockroom_core::input::SaleQuery;
use stockroom_core::report::ReportWindow;
use stockroom_core::Sale;

#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    // =========================================================================
    // Executor-generic operations
    // =========================================================================

    pub async fn find_by_id<'e, E>(executor: E, id: &str) -> DbResult<Option<Sale>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let sale = sqlx::query_as::<_, Sale>("SELECT * FROM sales WHERE id = ?1")
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(sale)
    }

    pub async fn insert<'e, E>(executor: E, sale: &Sale) -> DbResult<()>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        debug!(id = %sale.id, product_id = %sale.product_id, quantity = sale.quantity, "Inserting sale");

        sqlx::query(
            r#"
            INSERT INTO sales (
                id, sale_date, staff_id, product_id,
                quantity, unit_price_cents, total_amount_cents,
                customer_name, customer_phone, notes, payment_method,
                created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4,
                ?5, ?6, ?7,
                ?8, ?9, ?10, ?11,
                ?12, ?13
            )
            "#,
        )
        .bind(&sale.id)
        .bind(sale.sale_date)
        .bind(&sale.staff_id)
        .bind(&sale.product_id)
        .bind(sale.quantity)
        .bind(sale.unit_price_cents)
        .bind(sale.total_amount_cents)
        .bind(&sale.customer_name)
        .bind(&sale.customer_phone)
        .bind(&sale.notes)
        .bind(sale.payment_method)
        .bind(sale.created_at)
        .bind(sale.updated_at)
        .execute(executor)
        .await?;

        Ok(())
    }

    /// Rewrites the mutable columns of a sale.
    ///
    /// `staff_id`, `product_id` and `created_at` are fixed at insert and not
    /// part of the statement.
    pub async fn update<'e, E>(executor: E, sale: &Sale) -> DbResult<()>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        debug!(id = %sale.id, quantity = sale.quantity, "Updating sale");

        let result = sqlx::query(
            r#"
            UPDATE sales SET
                sale_date = ?2,
                quantity = ?3,
                unit_price_cents = ?4,
                total_amount_cents = ?5,
                customer_name = ?6,
                customer_phone = ?7,
                notes = ?8,
                payment_method = ?9,
                updated_at = ?10
            WHERE id = ?1
            "#,
        )
        .bind(&sale.id)
        .bind(sale.sale_date)
        .bind(sale.quantity)
        .bind(sale.unit_price_cents)
        .bind(sale.total_amount_cents)
        .bind(&sale.customer_name)
        .bind(&sale.customer_phone)
        .bind(&sale.notes)
        .bind(sale.payment_method)
        .bind(sale.updated_at)
        .execute(executor)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Sale", &sale.id));
        }

        Ok(())
    }

    /// Returns `false` if no such sale existed.
    pub async fn delete<'e, E>(executor: E, id: &str) -> DbResult<bool>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        debug!(id = %id, "Deleting sale");

        let result = sqlx::query("DELETE FROM sales WHERE id = ?1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Filtered listing, newest sale first.
    ///
    /// ## Ordering
    /// `sale_date DESC`, then `created_at DESC`, then `id` so pages are
    /// stable even when timestamps collide.
    pub async fn find<'e, E>(executor: E, query: &SaleQuery) -> DbResult<Vec<Sale>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT * FROM sales WHERE 1 = 1");

        if let Some(from) = query.from {
            qb.push(" AND sale_date >= ").push_bind(from);
        }
        if let Some(until) = query.until {
            qb.push(" AND sale_date < ").push_bind(until);
        }
        if let Some(staff_id) = &query.staff_id {
            qb.push(" AND staff_id = ").push_bind(staff_id.clone());
        }
        if let Some(product_id) = &query.product_id {
            qb.push(" AND product_id = ").push_bind(product_id.clone());
        }
        if let Some(method) = query.payment_method {
            qb.push(" AND payment_method = ").push_bind(method);
        }

        qb.push(" ORDER BY sale_date DESC, created_at DESC, id LIMIT ")
            .push_bind(query.limit)
            .push(" OFFSET ")
            .push_bind(query.skip);

        let sales = qb.build_query_as::<Sale>().fetch_all(executor).await?;
        Ok(sales)
    }

    /// Every sale inside `window`, oldest first.
    pub async fn in_window<'e, E>(executor: E, window: &ReportWindow) -> DbResult<Vec<Sale>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let sales = sqlx::query_as::<_, Sale>(
            r#"
            SELECT * FROM sales
            WHERE sale_date >= ?1 AND sale_date < ?2
            ORDER BY sale_date ASC, created_at ASC, id
            "#,
        )
        .bind(window.from)
        .bind(window.until)
        .fetch_all(executor)
        .await?;

        Ok(sales)
    }

    /// Revenue and count inside `window`, or over all sales when `None`.
    pub async fn totals<'e, E>(executor: E, window: Option<&ReportWindow>) -> DbResult<SaleTotals>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let mut qb = QueryBuilder::<Sqlite>::new(
            "SELECT COALESCE(SUM(total_amount_cents), 0) AS revenue_cents, COUNT(*) AS count FROM sales",
        );

        if let Some(window) = window {
            qb.push(" WHERE sale_date >= ")
                .push_bind(window.from)
                .push(" AND sale_date < ")
                .push_bind(window.until);
        }

        let totals = qb.build_query_as::<SaleTotals>().fetch_one(executor).await?;
        Ok(totals)
    }

    // =========================================================================
    // Pool conveniences
    // =========================================================================

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Sale>> {
        Self::find_by_id(&self.pool, id).await
    }

    pub async fn list(&self, query: &SaleQuery) -> DbResult<Vec<Sale>> {
        Self::find(&self.pool, query).await
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
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
    use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
    use stockroom_core::input::SaleFilter;
    use stockroom_core::PaymentMethod;

    const STAFF_A: &str = "8d6b9f0c-3a41-4c1e-9e55-0f3b8a2f7c11";
    const STAFF_B: &str = "2a7c1e90-5d3b-4f6a-8c2e-9b1d0f4e7a35";
    const PRODUCT: &str = "1f0e4d2a-7b6c-4e8f-a1d3-5c9b2e7f4a60";

    fn sale(staff: &str, qty: i64, method: PaymentMethod, at: DateTime<Utc>) -> Sale {
        Sale {
            id: uuid::Uuid::new_v4().to_string(),
            sale_date: at,
            staff_id: staff.to_string(),
            product_id: PRODUCT.to_string(),
            quantity: qty,
            unit_price_cents: 200,
            total_amount_cents: qty * 200,
            customer_name: None,
            customer_phone: None,
            notes: None,
            payment_method: method,
            created_at: at,
            updated_at: at,
        }
    }

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, day, hour, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_insert_update_delete() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut s = sale(STAFF_A, 4, PaymentMethod::Cash, at(14, 10));

        SaleRepository::insert(db.pool(), &s).await.unwrap();
        let found = db.sales().get_by_id(&s.id).await.unwrap().unwrap();
        assert_eq!(found.total_amount_cents, 800);
        assert_eq!(found.payment_method, PaymentMethod::Cash);
        assert_eq!(found.sale_date, s.sale_date);

        s.quantity = 2;
        s.total_amount_cents = 400;
        s.notes = Some("partial return".to_string());
        SaleRepository::update(db.pool(), &s).await.unwrap();
        let found = db.sales().get_by_id(&s.id).await.unwrap().unwrap();
        assert_eq!(found.quantity, 2);
        assert_eq!(found.notes.as_deref(), Some("partial return"));

        assert!(SaleRepository::delete(db.pool(), &s.id).await.unwrap());
        assert!(db.sales().get_by_id(&s.id).await.unwrap().is_none());
        assert!(matches!(
            SaleRepository::update(db.pool(), &s).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_find_filters_and_order() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let rows = [
            sale(STAFF_A, 1, PaymentMethod::Cash, at(1, 9)),
            sale(STAFF_B, 2, PaymentMethod::Card, at(14, 9)),
            sale(STAFF_A, 3, PaymentMethod::Card, at(14, 23)),
            sale(STAFF_A, 4, PaymentMethod::Cash, at(15, 0)),
        ];
        for s in &rows {
            SaleRepository::insert(db.pool(), s).await.unwrap();
        }

        let all = db.sales().list(&SaleFilter::default().resolve().unwrap()).await.unwrap();
        let qtys: Vec<i64> = all.iter().map(|s| s.quantity).collect();
        assert_eq!(qtys, [4, 3, 2, 1]);

        // endDate covers the whole day, but not the next midnight
        let day = SaleFilter {
            start_date: NaiveDate::from_ymd_opt(2026, 3, 14),
            end_date: NaiveDate::from_ymd_opt(2026, 3, 14),
            ..Default::default()
        };
        let found = db.sales().list(&day.resolve().unwrap()).await.unwrap();
        assert_eq!(found.len(), 2);

        let staff_card = SaleFilter {
            staff_id: Some(STAFF_A.to_string()),
            payment_method: Some(PaymentMethod::Card),
            ..Default::default()
        };
        let found = db.sales().list(&staff_card.resolve().unwrap()).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].quantity, 3);

        let page = SaleFilter {
            skip: Some(1),
            limit: Some(2),
            ..Default::default()
        };
        let found = db.sales().list(&page.resolve().unwrap()).await.unwrap();
        let qtys: Vec<i64> = found.iter().map(|s| s.quantity).collect();
        assert_eq!(qtys, [3, 2]);
    }

    #[tokio::test]
    async fn test_window_queries() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let midnight = at(14, 0);
        for s in [
            sale(STAFF_A, 1, PaymentMethod::Cash, midnight - Duration::seconds(1)),
            sale(STAFF_A, 2, PaymentMethod::Cash, midnight),
            sale(STAFF_A, 3, PaymentMethod::Cash, midnight + Duration::hours(23)),
            sale(STAFF_A, 4, PaymentMethod::Cash, midnight + Duration::days(1)),
        ] {
            SaleRepository::insert(db.pool(), &s).await.unwrap();
        }

        let window = ReportWindow::day(NaiveDate::from_ymd_opt(2026, 3, 14).unwrap());
        let inside = SaleRepository::in_window(db.pool(), &window).await.unwrap();
        let qtys: Vec<i64> = inside.iter().map(|s| s.quantity).collect();
        assert_eq!(qtys, [2, 3]);

        let day = SaleRepository::totals(db.pool(), Some(&window)).await.unwrap();
        assert_eq!(day, SaleTotals { revenue_cents: 1000, count: 2 });

        let all = SaleRepository::totals(db.pool(), None).await.unwrap();
        assert_eq!(all, SaleTotals { revenue_cents: 2000, count: 4 });
        assert_eq!(db.sales().count().await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_totals_on_empty_table() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let totals = SaleRepository::totals(db.pool(), None).await.unwrap();
        assert_eq!(totals, SaleTotals::default());
    }
}
