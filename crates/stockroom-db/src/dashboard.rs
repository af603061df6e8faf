//! # Dashboard Aggregator
//!
//! Stock and revenue figures for the dashboard, read in one transaction so
//! every number comes from the same snapshot.

use chrono::{DateTime, Utc};
use sqlx::{Executor, Sqlite, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use crate::repository::sale::SaleRepository;
use stockroom_core::dashboard::{CatalogCounts, DashboardStats, StockSnapshot};
use stockroom_core::report::{self, ReportWindow};

#[derive(Debug, Clone)]
pub struct DashboardAggregator {
    pool: SqlitePool,
}

impl DashboardAggregator {
    pub fn new(pool: SqlitePool) -> Self {
        DashboardAggregator { pool }
    }

    /// Dashboard figures as of `now`.
    ///
    /// "Today" and "this month" are the UTC calendar day and month of `now`.
    pub async fn stats(&self, now: DateTime<Utc>) -> DbResult<DashboardStats> {
        let today = ReportWindow::day(now.date_naive());
        let (year, month) = report::year_month(now);
        let this_month = ReportWindow::month(year, month)?;

        let mut tx = self.pool.begin().await?;

        let stock = stock_snapshot(&mut *tx).await?;
        let catalog = catalog_counts(&mut *tx).await?;
        let daily = SaleRepository::totals(&mut *tx, Some(&today)).await?;
        let monthly = SaleRepository::totals(&mut *tx, Some(&this_month)).await?;
        let all_time = SaleRepository::totals(&mut *tx, None).await?;

        tx.commit().await?;

        debug!(
            products = catalog.total_products,
            sales = all_time.count,
            "Dashboard stats computed"
        );

        Ok(DashboardStats::compose(
            stock, catalog, daily, monthly, all_time, now,
        ))
    }
}

async fn stock_snapshot<'e, E>(executor: E) -> DbResult<StockSnapshot>
where
    E: Executor<'e, Database = Sqlite>,
{
    let snapshot = sqlx::query_as::<_, StockSnapshot>(
        r#"
        SELECT
            COALESCE(SUM(quantity * price_per_unit_cents), 0) AS total_stock_value_cents,
            COALESCE(SUM(quantity), 0) AS total_quantity,
            COALESCE(SUM(CASE WHEN status = 'low_stock' THEN 1 ELSE 0 END), 0) AS low_stock_count,
            COALESCE(SUM(CASE WHEN status = 'out_of_stock' THEN 1 ELSE 0 END), 0) AS out_of_stock_count,
            COALESCE(SUM(CASE WHEN status = 'in_stock' THEN 1 ELSE 0 END), 0) AS in_stock_count,
            COALESCE(SUM(CASE WHEN status = 'discontinued' THEN 1 ELSE 0 END), 0) AS discontinued_count
        FROM products
        "#,
    )
    .fetch_one(executor)
    .await?;

    Ok(snapshot)
}

async fn catalog_counts<'e, E>(executor: E) -> DbResult<CatalogCounts>
where
    E: Executor<'e, Database = Sqlite>,
{
    let counts = sqlx::query_as::<_, CatalogCounts>(
        "SELECT COUNT(*) AS total_products, COUNT(DISTINCT category) AS total_categories FROM products",
    )
    .fetch_one(executor)
    .await?;

    Ok(counts)
}

// =============================================================================
// Unit Tests
// =============================================================================
