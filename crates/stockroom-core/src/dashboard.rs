//! # Dashboard Composition
//!
//! Folds the stock snapshot and three revenue windows into `DashboardStats`.
//!
//! ```text
//!   StockSnapshot ──┐
//!   CatalogCounts ──┤
//!   today   totals ─┼──► DashboardStats::compose(now)
//!   month   totals ─┤       ├── averageDailyRevenue   = month / day-of-month
//!   all-time totals ┘       └── averageMonthlyRevenue = total / month-number
//! ```

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

/// Aggregate view of current stock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StockSnapshot {
    /// Σ quantity × price per unit.
    pub total_stock_value_cents: i64,
    pub total_quantity: i64,
    pub low_stock_count: i64,
    pub out_of_stock_count: i64,
    pub in_stock_count: i64,
    pub discontinued_count: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct CatalogCounts {
    pub total_products: i64,
    pub total_categories: i64,
}

/// Revenue and sale count inside one window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleTotals {
    pub revenue_cents: i64,
    pub count: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RevenueStats {
    pub daily_cents: i64,
    pub monthly_cents: i64,
    pub total_cents: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SalesStats {
    pub total_count: i64,
    pub daily_count: i64,
    pub monthly_count: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SummaryStats {
    pub total_products: i64,
    pub total_categories: i64,
    pub average_daily_revenue_cents: i64,
    pub average_monthly_revenue_cents: i64,
}

/// Response of `GET /api/dashboard/stats`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub stock: StockSnapshot,
    pub revenue: RevenueStats,
    pub sales: SalesStats,
    pub summary: SummaryStats,
}

impl DashboardStats {
    /// Combines pre-aggregated parts into the dashboard view.
    ///
    /// `now` decides the divisors: on March 14th the daily average divides
    /// the month's revenue by 14, and the monthly average divides all-time
    /// revenue by 3.
    pub fn compose(
        stock: StockSnapshot,
        catalog: CatalogCounts,
        today: SaleTotals,
        month: SaleTotals,
        all_time: SaleTotals,
        now: DateTime<Utc>,
    ) -> Self {
        let average_daily = Money::from_cents(month.revenue_cents).div_rounded(i64::from(now.day()));
        let average_monthly =
            Money::from_cents(all_time.revenue_cents).div_rounded(i64::from(now.month()));

        DashboardStats {
            stock,
            revenue: RevenueStats {
                daily_cents: today.revenue_cents,
                monthly_cents: month.revenue_cents,
                total_cents: all_time.revenue_cents,
            },
            sales: SalesStats {
                total_count: all_time.count,
                daily_count: today.count,
                monthly_count: month.count,
            },
            summary: SummaryStats {
                total_products: catalog.total_products,
                total_categories: catalog.total_categories,
                average_daily_revenue_cents: average_daily.cents(),
                average_monthly_revenue_cents: average_monthly.cents(),
            },
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

    #[test]
    fn test_compose_averages() {
        let now = Utc.with_ymd_and_hms(2026, 3, 14, 12, 0, 0).unwrap();
        let stats = DashboardStats::compose(
            StockSnapshot::default(),
            CatalogCounts {
                total_products: 4,
                total_categories: 2,
            },
            SaleTotals {
                revenue_cents: 800,
                count: 1,
            },
            SaleTotals {
                revenue_cents: 10_000,
                count: 9,
            },
            SaleTotals {
                revenue_cents: 25_000,
                count: 30,
            },
            now,
        );

        // 10000 / 14 = 714.28
        assert_eq!(stats.summary.average_daily_revenue_cents, 714);
        // 25000 / 3 = 8333.33
        assert_eq!(stats.summary.average_monthly_revenue_cents, 8333);
        assert_eq!(stats.revenue.daily_cents, 800);
        assert_eq!(stats.sales.total_count, 30);
        assert_eq!(stats.summary.total_categories, 2);
    }

    #[test]
    fn test_compose_with_no_sales() {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let stats = DashboardStats::compose(
            StockSnapshot::default(),
            CatalogCounts::default(),
            SaleTotals::default(),
            SaleTotals::default(),
            SaleTotals::default(),
            now,
        );
        assert_eq!(stats, DashboardStats::default());
    }

    #[test]
    fn test_serializes_nested_camel_case() {
        let json = serde_json::to_value(DashboardStats::default()).unwrap();
        assert_eq!(json["stock"]["outOfStockCount"], 0);
        assert_eq!(json["summary"]["averageDailyRevenueCents"], 0);
    }
}
