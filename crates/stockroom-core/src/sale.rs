//! # Sale Rules
//!
//! Pure arithmetic for sale records: totals and the shape of an edited sale.
//!
//! ```text
//! total_amount = quantity × unit_price      (recomputed on every write)
//!
//! edit: old quantity 4 ─► new quantity 6   ⇒ stock delta −2
//!       old quantity 4 ─► new quantity 2   ⇒ stock delta +2
//! ```

use chrono::{DateTime, Utc};

use crate::error::{CoreResult, ValidationError};
use crate::input::{NewSale, UpdateSaleInput};
use crate::money::Money;
use crate::types::Sale;
use crate::validation::{optional_text, MAX_NAME_LEN, MAX_TEXT_LEN};

/// Computes `quantity × unit_price`, failing on overflow.
///
/// ## Example
/// ```rust
/// use stockroom_core::{money::Money, sale::compute_total_amount};
///
/// let total = compute_total_amount(4, Money::from_cents(200)).unwrap();
/// assert_eq!(total.cents(), 800);
/// ```
pub fn compute_total_amount(quantity: i64, unit_price: Money) -> CoreResult<Money> {
    unit_price
        .checked_mul_quantity(quantity)
        .ok_or_else(|| {
            ValidationError::Overflow {
                field: "totalAmount".to_string(),
            }
            .into()
        })
}

/// Stock movement caused by changing a sale's quantity from `old` to `new`.
///
/// Selling more takes stock (negative), selling less returns it (positive).
#[inline]
pub const fn stock_delta_for_edit(old_quantity: i64, new_quantity: i64) -> i64 {
    old_quantity - new_quantity
}

/// Builds the sale record for a validated request.
pub fn build_sale(id: String, input: NewSale, now: DateTime<Utc>) -> CoreResult<Sale> {
    let total = compute_total_amount(input.quantity, Money::from_cents(input.unit_price_cents))?;

    Ok(Sale {
        id,
        sale_date: input.sale_date.unwrap_or(now),
        staff_id: input.staff_id,
        product_id: input.product_id,
        quantity: input.quantity,
        unit_price_cents: input.unit_price_cents,
        total_amount_cents: total.cents(),
        customer_name: input.customer_name,
        customer_phone: input.customer_phone,
        notes: input.notes,
        payment_method: input.payment_method,
        created_at: now,
        updated_at: now,
    })
}

/// Returns `sale` with the edit applied and the total recomputed.
///
/// The staff and product references are never touched here; the caller must
/// have run [`UpdateSaleInput::ensure_no_reassignment`] first.
pub fn apply_edit(sale: &Sale, edit: &UpdateSaleInput, now: DateTime<Utc>) -> CoreResult<Sale> {
    let mut updated = sale.clone();

    if let Some(qty) = edit.quantity {
        updated.quantity = qty;
    }
    if let Some(price) = edit.unit_price_cents {
        updated.unit_price_cents = price;
    }
    if let Some(method) = edit.payment_method {
        updated.payment_method = method;
    }
    if let Some(date) = edit.sale_date {
        updated.sale_date = date;
    }
    if edit.customer_name.is_some() {
        updated.customer_name =
            optional_text("customerName", edit.customer_name.as_deref(), MAX_NAME_LEN)?;
    }
    if edit.customer_phone.is_some() {
        updated.customer_phone = optional_text("customerPhone", edit.customer_phone.as_deref(), 32)?;
    }
    if edit.notes.is_some() {
        updated.notes = optional_text("notes", edit.notes.as_deref(), MAX_TEXT_LEN)?;
    }

    updated.total_amount_cents =
        compute_total_amount(updated.quantity, updated.unit_price())?.cents();
    updated.updated_at = now;

    Ok(updated)
}

// =============================================================================
// Unit Tests
// =============================================================================
