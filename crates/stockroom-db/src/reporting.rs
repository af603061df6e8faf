//! # Reporting Aggregator
//!
//! Daily and monthly sales reports.
//!
//! ```text
//! daily_report(2026-03-14)
//!     window [03-14 00:00, 03-15 00:00) ──► sales ──► summarize_day
//!
//! monthly_report(2026, 3)
//!     BEGIN (one snapshot)
//!       window [03-01, 04-01) ──► sales
//!       product / staff names for the ids in those sales
//!     COMMIT ──► summarize_month (missing names → "Unknown")
//! ```

use chrono::NaiveDate;
use sqlx::SqlitePool;
use std::collections::HashMap;
use tracing::debug;

use crate::error::DbResult;
use crate::repository::product::ProductRepository;
use crate::repository::sale::SaleRepository;
use crate::repository::staff::StaffRepository;
use stockroom_core::report::{self, DailyReport, MonthlyReport, ReportWindow};
use stockroom_core::Sale;

#[derive(Debug, Clone)]
pub struct ReportingAggregator {
    pool: SqlitePool,
}

impl ReportingAggregator {
    pub fn new(pool: SqlitePool) -> Self {
        ReportingAggregator { pool }
    }

    /// Totals for one calendar day (UTC).
    pub async fn daily_report(&self, date: NaiveDate) -> DbResult<DailyReport> {
        let window = ReportWindow::day(date);
        let sales = SaleRepository::in_window(&self.pool, &window).await?;

        debug!(%date, sales = sales.len(), "Building daily report");
        Ok(report::summarize_day(date, &sales))
    }

    /// Totals and top sellers for one calendar month (UTC).
    ///
    /// ## Errors
    /// `Domain(Validation)` when `month` is not in `1..=12`.
    pub async fn monthly_report(&self, year: i32, month: u32) -> DbResult<MonthlyReport> {
        let window = ReportWindow::month(year, month)?;

        let mut tx = self.pool.begin().await?;

        let sales = SaleRepository::in_window(&mut *tx, &window).await?;

        let product_ids = distinct(&sales, |s| &s.product_id);
        let product_names: HashMap<String, String> =
            ProductRepository::find_by_ids(&mut *tx, &product_ids)
                .await?
                .into_iter()
                .map(|p| (p.id, p.name))
                .collect();

        let staff_ids = distinct(&sales, |s| &s.staff_id);
        let staff_names: HashMap<String, String> = StaffRepository::find_by_ids(&mut *tx, &staff_ids)
            .await?
            .into_iter()
            .map(|s| {
                let name = s.display_name();
                (s.id, name)
            })
            .collect();

        tx.commit().await?;

        debug!(year, month, sales = sales.len(), "Building monthly report");
        Ok(report::summarize_month(
            year,
            month,
            &sales,
            &product_names,
            &staff_names,
        ))
    }
}

fn distinct(sales: &[Sale], key: impl Fn(&Sale) -> &String) -> Vec<String> {
    let mut ids: Vec<String> = sales.iter().map(|s| key(s).clone()).collect();
    ids.sort();
    ids.dedup();
    ids
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::pool::{Database, DbConfig};
    use chrono::{TimeZone, Utc};
    use stockroom_core::input::{CreateSaleInput, NewProduct, NewStaff};
    use stockroom_core::{CoreError, PaymentMethod, Product, Staff, UNKNOWN_NAME};

    async fn product(db: &Database, sku: &str, name: &str) -> Product {
        db.catalog()
            .create_product(NewProduct {
                name: name.to_string(),
                category: "Building".to_string(),
                description: None,
                sku: sku.to_string(),
                quantity: 100,
                min_stock: 5,
                max_stock: None,
                unit: "bag".to_string(),
                price_per_unit_cents: 100,
                discontinued: false,
                location: None,
                supplier: None,
            })
            .await
            .unwrap()
    }

    async fn staff(db: &Database, employee_id: &str, first: &str) -> Staff {
        db.staff()
            .create(NewStaff {
                employee_id: employee_id.to_string(),
                first_name: first.to_string(),
                last_name: "Bello".to_string(),
                email: None,
                department: "Sales".to_string(),
                position: "Clerk".to_string(),
            })
            .await
            .unwrap()
    }

    async fn sell(
        db: &Database,
        product: &Product,
        staff: &Staff,
        quantity: i64,
        price: i64,
        method: PaymentMethod,
        day: u32,
    ) {
        db.coordinator()
            .create_sale(CreateSaleInput {
                staff_id: staff.id.clone(),
                product_id: product.id.clone(),
                quantity,
                unit_price_cents: price,
                payment_method: method,
                sale_date: Some(Utc.with_ymd_and_hms(2026, 3, day, 12, 0, 0).unwrap()),
                customer_name: None,
                customer_phone: None,
                notes: None,
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_daily_report_only_counts_that_day() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let cement = product(&db, "CEM", "Cement").await;
        let ada = staff(&db, "EMP-1", "Ada").await;

        sell(&db, &cement, &ada, 2, 500, PaymentMethod::Cash, 14).await;
        sell(&db, &cement, &ada, 1, 700, PaymentMethod::Card, 14).await;
        sell(&db, &cement, &ada, 9, 100, PaymentMethod::Cash, 15).await;

        let date = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        let report = db.reports().daily_report(date).await.unwrap();

        assert_eq!(report.date, "2026-03-14");
        assert_eq!(report.transaction_count, 2);
        assert_eq!(report.total_quantity, 3);
        assert_eq!(report.total_revenue_cents, 1700);
        assert_eq!(report.payment_method_breakdown.cash, 1000);
        assert_eq!(report.payment_method_breakdown.card, 700);
        assert_eq!(report.payment_method_breakdown.transfer, 0);
        assert_eq!(report.payment_method_breakdown.cheque, 0);
    }

    #[tokio::test]
    async fn test_daily_report_empty_day() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let date = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();

        let report = db.reports().daily_report(date).await.unwrap();
        assert_eq!(report.transaction_count, 0);
        assert_eq!(report.total_revenue_cents, 0);
    }

    #[tokio::test]
    async fn test_monthly_report_ranks_and_labels() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let cement = product(&db, "CEM", "Cement").await;
        let sand = product(&db, "SND", "Sand").await;
        let ada = staff(&db, "EMP-1", "Ada").await;
        let bola = staff(&db, "EMP-2", "Bola").await;

        sell(&db, &cement, &ada, 2, 500, PaymentMethod::Cash, 1).await;
        sell(&db, &sand, &bola, 10, 300, PaymentMethod::Transfer, 20).await;
        sell(&db, &sand, &ada, 1, 300, PaymentMethod::Cheque, 31).await;

        // sand is deleted after it sold; its rows stay in the report
        db.catalog().delete_product(&sand.id).await.unwrap();

        let report = db.reports().monthly_report(2026, 3).await.unwrap();

        assert_eq!(report.transaction_count, 3);
        assert_eq!(report.total_revenue_cents, 4300);
        assert_eq!(report.average_sale_amount_cents, 1433);
        assert_eq!(report.payment_method_breakdown.transfer, 3000);

        assert_eq!(report.top_products.len(), 2);
        assert_eq!(report.top_products[0].product_name, UNKNOWN_NAME);
        assert_eq!(report.top_products[0].total_quantity, 11);
        assert_eq!(report.top_products[1].product_name, "Cement");

        assert_eq!(report.top_staff[0].staff_name, "Bola Bello");
        assert_eq!(report.top_staff[1].staff_name, "Ada Bello");
        assert_eq!(report.top_staff[1].total_sales, 2);
    }

    #[tokio::test]
    async fn test_monthly_report_empty_and_invalid() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let report = db.reports().monthly_report(2026, 2).await.unwrap();
        assert_eq!(report.transaction_count, 0);
        assert_eq!(report.average_sale_amount_cents, 0);
        assert!(report.top_products.is_empty());

        let err = db.reports().monthly_report(2026, 13).await.unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::Validation(_))));
    }
}
