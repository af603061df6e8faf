//! # Report Rollups
//!
//! Pure daily and monthly summaries over a slice of sales.
//!
//! ## Report Windows
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  All windows are half-open and in UTC:                                  │
//! │                                                                         │
//! │    day   2026-03-14   [2026-03-14T00:00Z, 2026-03-15T00:00Z)            │
//! │    month 2026-12      [2026-12-01T00:00Z, 2027-01-01T00:00Z)            │
//! │                                                                         │
//! │  A sale at exactly midnight belongs to the day that starts there.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The database layer fetches the sales inside a window (oldest first) and
//! the names they reference; this module does the arithmetic.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use ts_rs::TS;

use crate::input::start_of_day;
use crate::money::Money;
use crate::types::{PaymentMethod, Sale};
use crate::validation::{validate_month, ValidationResult};
use crate::{TOP_ENTRIES_LIMIT, UNKNOWN_NAME};

// =============================================================================
// Windows
// =============================================================================

/// A half-open `[from, until)` time range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportWindow {
    pub from: DateTime<Utc>,
    pub until: DateTime<Utc>,
}

impl ReportWindow {
    /// The calendar day `date`.
    pub fn day(date: NaiveDate) -> Self {
        let from = start_of_day(date);
        ReportWindow {
            from,
            until: from + Duration::days(1),
        }
    }

    /// The calendar month `month` of `year`.
    ///
    /// ## Errors
    /// `OutOfRange` when `month` is not in `1..=12`.
    pub fn month(year: i32, month: u32) -> ValidationResult<Self> {
        validate_month(month)?;

        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
            crate::error::ValidationError::invalid_format("year", "is outside the supported range")
        })?;
        let (next_year, next_month) = if month == 12 {
            (year + 1, 1)
        } else {
            (year, month + 1)
        };
        let next = NaiveDate::from_ymd_opt(next_year, next_month, 1).ok_or_else(|| {
            crate::error::ValidationError::invalid_format("year", "is outside the supported range")
        })?;

        Ok(ReportWindow {
            from: start_of_day(first),
            until: start_of_day(next),
        })
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.from <= at && at < self.until
    }
}

// =============================================================================
// Report Types
// =============================================================================

/// Revenue per payment method. All four methods are always present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethodBreakdown {
    pub cash: i64,
    pub card: i64,
    pub transfer: i64,
    pub cheque: i64,
}

impl PaymentMethodBreakdown {
    fn slot(&mut self, method: PaymentMethod) -> &mut i64 {
        match method {
            PaymentMethod::Cash => &mut self.cash,
            PaymentMethod::Card => &mut self.card,
            PaymentMethod::Transfer => &mut self.transfer,
            PaymentMethod::Cheque => &mut self.cheque,
        }
    }

    pub fn add(&mut self, method: PaymentMethod, amount: Money) {
        let slot = self.slot(method);
        *slot = slot.saturating_add(amount.cents());
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DailyReport {
    /// `YYYY-MM-DD`.
    pub date: String,
    pub total_revenue_cents: i64,
    pub total_quantity: i64,
    pub transaction_count: i64,
    pub payment_method_breakdown: PaymentMethodBreakdown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TopProduct {
    pub product_id: String,
    pub product_name: String,
    pub total_quantity: i64,
    pub total_revenue_cents: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TopStaff {
    pub staff_id: String,
    pub staff_name: String,
    pub total_sales: i64,
    pub total_revenue_cents: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyReport {
    pub year: i32,
    pub month: u32,
    pub total_revenue_cents: i64,
    pub total_quantity: i64,
    pub transaction_count: i64,
    pub average_sale_amount_cents: i64,
    pub payment_method_breakdown: PaymentMethodBreakdown,
    pub top_products: Vec<TopProduct>,
    pub top_staff: Vec<TopStaff>,
}

// =============================================================================
// Rollups
// =============================================================================

#[derive(Debug, Default)]
struct Totals {
    revenue: i64,
    quantity: i64,
    count: i64,
    breakdown: PaymentMethodBreakdown,
}

fn totals(sales: &[Sale]) -> Totals {
    sales.iter().fold(Totals::default(), |mut acc, sale| {
        acc.revenue = acc.revenue.saturating_add(sale.total_amount_cents);
        acc.quantity = acc.quantity.saturating_add(sale.quantity);
        acc.count += 1;
        acc.breakdown.add(sale.payment_method, sale.total_amount());
        acc
    })
}

/// Summarizes the sales of one day.
pub fn summarize_day(date: NaiveDate, sales: &[Sale]) -> DailyReport {
    let totals = totals(sales);

    DailyReport {
        date: date.format("%Y-%m-%d").to_string(),
        total_revenue_cents: totals.revenue,
        total_quantity: totals.quantity,
        transaction_count: totals.count,
        payment_method_breakdown: totals.breakdown,
    }
}

/// Summarizes the sales of one month.
///
/// `product_names` / `staff_names` map ids to display names; a missing entry
/// is labelled "Unknown". Top lists are ordered by revenue, descending, with
/// ties kept in the order each id first appears in `sales`.
pub fn summarize_month(
    year: i32,
    month: u32,
    sales: &[Sale],
    product_names: &HashMap<String, String>,
    staff_names: &HashMap<String, String>,
) -> MonthlyReport {
    let totals = totals(sales);

    let mut top_products: Vec<TopProduct> = Vec::new();
    let mut product_slots: HashMap<&str, usize> = HashMap::new();
    let mut top_staff: Vec<TopStaff> = Vec::new();
    let mut staff_slots: HashMap<&str, usize> = HashMap::new();

    for sale in sales {
        let idx = *product_slots
            .entry(sale.product_id.as_str())
            .or_insert_with(|| {
                top_products.push(TopProduct {
                    product_id: sale.product_id.clone(),
                    product_name: lookup_name(product_names, &sale.product_id),
                    total_quantity: 0,
                    total_revenue_cents: 0,
                });
                top_products.len() - 1
            });
        let entry = &mut top_products[idx];
        entry.total_quantity = entry.total_quantity.saturating_add(sale.quantity);
        entry.total_revenue_cents = entry
            .total_revenue_cents
            .saturating_add(sale.total_amount_cents);

        let idx = *staff_slots.entry(sale.staff_id.as_str()).or_insert_with(|| {
            top_staff.push(TopStaff {
                staff_id: sale.staff_id.clone(),
                staff_name: lookup_name(staff_names, &sale.staff_id),
                total_sales: 0,
                total_revenue_cents: 0,
            });
            top_staff.len() - 1
        });
        let entry = &mut top_staff[idx];
        entry.total_sales += 1;
        entry.total_revenue_cents = entry
            .total_revenue_cents
            .saturating_add(sale.total_amount_cents);
    }

    // sort_by is stable: equal revenue keeps first-seen order
    top_products.sort_by(|a, b| b.total_revenue_cents.cmp(&a.total_revenue_cents));
    top_products.truncate(TOP_ENTRIES_LIMIT);
    top_staff.sort_by(|a, b| b.total_revenue_cents.cmp(&a.total_revenue_cents));
    top_staff.truncate(TOP_ENTRIES_LIMIT);

    MonthlyReport {
        year,
        month,
        total_revenue_cents: totals.revenue,
        total_quantity: totals.quantity,
        transaction_count: totals.count,
        average_sale_amount_cents: Money::from_cents(totals.revenue)
            .div_rounded(totals.count)
            .cents(),
        payment_method_breakdown: totals.breakdown,
        top_products,
        top_staff,
    }
}

fn lookup_name(names: &HashMap<String, String>, id: &str) -> String {
    names
        .get(id)
        .cloned()
        .unwrap_or_else(|| UNKNOWN_NAME.to_string())
}

/// Year and month of `at`, for "current month" defaults.
pub fn year_month(at: DateTime<Utc>) -> (i32, u32) {
    (at.year(), at.month())
}

// =============================================================================
// Unit Tests
// =============================================================================
