//! # Typed Inputs
//!
//! Request shapes for every write the core accepts, and their checked forms.
//!
//! ```text
//! JSON body ──serde──► CreateSaleInput ──validate()──► NewSale ──► Coordinator
//!                      (typed, untrusted)              (checked)
//! ```
//!
//! Nothing downstream of this module ever sees an untyped map or an
//! unchecked value.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::stock::derive_status;
use crate::types::{PaymentMethod, Product, ProductStatus, Sale, Staff};
use crate::validation::{
    normalize_sku, optional_text, required_text, validate_non_negative, validate_price_cents,
    validate_sale_quantity, validate_stock_bounds, validate_uuid, ValidationResult, MAX_NAME_LEN,
    MAX_TEXT_LEN,
};
use crate::{DEFAULT_LIST_LIMIT, DEFAULT_UNIT, MAX_LIST_LIMIT};

// =============================================================================
// Sales
// =============================================================================

/// Body of `POST /api/sales`.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CreateSaleInput {
    pub staff_id: String,
    pub product_id: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub payment_method: PaymentMethod,
    #[ts(as = "Option<String>")]
    #[serde(default)]
    pub sale_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub customer_phone: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// A sale request that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSale {
    pub staff_id: String,
    pub product_id: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub payment_method: PaymentMethod,
    pub sale_date: Option<DateTime<Utc>>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub notes: Option<String>,
}

impl CreateSaleInput {
    /// Checks every precondition that does not need storage.
    pub fn validate(self) -> ValidationResult<NewSale> {
        validate_uuid("staffId", &self.staff_id)?;
        validate_uuid("productId", &self.product_id)?;
        validate_sale_quantity(self.quantity)?;
        validate_price_cents("unitPriceCents", self.unit_price_cents)?;

        Ok(NewSale {
            staff_id: self.staff_id,
            product_id: self.product_id,
            quantity: self.quantity,
            unit_price_cents: self.unit_price_cents,
            payment_method: self.payment_method,
            sale_date: self.sale_date,
            customer_name: optional_text("customerName", self.customer_name.as_deref(), MAX_NAME_LEN)?,
            customer_phone: optional_text("customerPhone", self.customer_phone.as_deref(), 32)?,
            notes: optional_text("notes", self.notes.as_deref(), MAX_TEXT_LEN)?,
        })
    }
}

/// Body of `PUT /api/sales/:id`. Every field is optional.
///
/// `staffId` / `productId` are accepted only so that a reassignment attempt
/// is rejected loudly instead of silently ignored. An empty string in a
/// customer/notes field clears it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSaleInput {
    #[serde(default)]
    pub staff_id: Option<String>,
    #[serde(default)]
    pub product_id: Option<String>,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub unit_price_cents: Option<i64>,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    #[ts(as = "Option<String>")]
    #[serde(default)]
    pub sale_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub customer_phone: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl UpdateSaleInput {
    /// Field-level checks, run before the sale is loaded.
    ///
    /// A non-positive quantity is rejected here, so it can never reach the
    /// stock ledger.
    pub fn validate(&self) -> ValidationResult<()> {
        if let Some(qty) = self.quantity {
            validate_sale_quantity(qty)?;
        }
        if let Some(price) = self.unit_price_cents {
            validate_price_cents("unitPriceCents", price)?;
        }
        optional_text("customerName", self.customer_name.as_deref(), MAX_NAME_LEN)?;
        optional_text("customerPhone", self.customer_phone.as_deref(), 32)?;
        optional_text("notes", self.notes.as_deref(), MAX_TEXT_LEN)?;
        Ok(())
    }

    /// Rejects any attempt to point the sale at another staff member or
    /// product. Repeating the current value is allowed.
    pub fn ensure_no_reassignment(&self, sale: &Sale) -> CoreResult<()> {
        if let Some(staff_id) = &self.staff_id {
            if staff_id != &sale.staff_id {
                return Err(CoreError::ReassignmentNotSupported {
                    field: "staffId".to_string(),
                });
            }
        }
        if let Some(product_id) = &self.product_id {
            if product_id != &sale.product_id {
                return Err(CoreError::ReassignmentNotSupported {
                    field: "productId".to_string(),
                });
            }
        }
        Ok(())
    }

    /// The new quantity, if it differs from the stored one.
    pub fn quantity_change(&self, sale: &Sale) -> Option<i64> {
        self.quantity.filter(|qty| *qty != sale.quantity)
    }
}

// =============================================================================
// Sale Listing
// =============================================================================

/// Query parameters of `GET /api/sales`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SaleFilter {
    #[ts(as = "Option<String>")]
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// Inclusive: the whole end day is covered.
    #[ts(as = "Option<String>")]
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub staff_id: Option<String>,
    #[serde(default)]
    pub product_id: Option<String>,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default)]
    pub skip: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
}

/// A resolved sale query: concrete time bounds and clamped limit.
#[derive(Debug, Clone, PartialEq)]
pub struct SaleQuery {
    pub from: Option<DateTime<Utc>>,
    /// Exclusive upper bound (start of the day after `end_date`).
    pub until: Option<DateTime<Utc>>,
    pub staff_id: Option<String>,
    pub product_id: Option<String>,
    pub payment_method: Option<PaymentMethod>,
    pub skip: i64,
    pub limit: i64,
}

impl SaleFilter {
    pub fn resolve(&self) -> ValidationResult<SaleQuery> {
        if let Some(id) = &self.staff_id {
            validate_uuid("staffId", id)?;
        }
        if let Some(id) = &self.product_id {
            validate_uuid("productId", id)?;
        }
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if end < start {
                return Err(ValidationError::Inconsistent {
                    field: "endDate".to_string(),
                    reason: "must not be before startDate".to_string(),
                });
            }
        }

        Ok(SaleQuery {
            from: self.start_date.map(start_of_day),
            until: self.end_date.map(|d| start_of_day(d) + Duration::days(1)),
            staff_id: self.staff_id.clone(),
            product_id: self.product_id.clone(),
            payment_method: self.payment_method,
            skip: i64::from(self.skip.unwrap_or(0)),
            limit: clamp_limit(self.limit),
        })
    }
}

// =============================================================================
// Products
// =============================================================================

fn default_unit() -> String {
    DEFAULT_UNIT.to_string()
}

/// Body of `POST /api/products`.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub description: Option<String>,
    pub sku: String,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub min_stock: i64,
    #[serde(default)]
    pub max_stock: Option<i64>,
    #[serde(default = "default_unit")]
    pub unit: String,
    pub price_per_unit_cents: i64,
    /// Create the product already discontinued.
    #[serde(default)]
    pub discontinued: bool,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub supplier: Option<String>,
}

impl NewProduct {
    /// Validates the request and builds the product to insert.
    pub fn build(self, id: String, now: DateTime<Utc>) -> ValidationResult<Product> {
        let name = required_text("name", &self.name, MAX_NAME_LEN)?;
        let category = required_text("category", &self.category, MAX_NAME_LEN)?;
        let sku = normalize_sku(&self.sku)?;
        let unit = required_text("unit", &self.unit, 32)?;
        validate_non_negative("quantity", self.quantity)?;
        validate_stock_bounds(self.min_stock, self.max_stock)?;
        validate_price_cents("pricePerUnitCents", self.price_per_unit_cents)?;

        let current = if self.discontinued {
            ProductStatus::Discontinued
        } else {
            ProductStatus::default()
        };

        Ok(Product {
            id,
            name,
            category,
            description: optional_text("description", self.description.as_deref(), MAX_TEXT_LEN)?,
            sku,
            quantity: self.quantity,
            min_stock: self.min_stock,
            max_stock: self.max_stock,
            unit,
            price_per_unit_cents: self.price_per_unit_cents,
            status: derive_status(self.quantity, self.min_stock, current),
            location: optional_text("location", self.location.as_deref(), MAX_NAME_LEN)?,
            supplier: optional_text("supplier", self.supplier.as_deref(), MAX_NAME_LEN)?,
            last_restocked: None,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Body of `PUT /api/products/:id`.
///
/// `discontinued: true` sets the operator override; `false` clears it and
/// re-derives the status from stock.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub min_stock: Option<i64>,
    #[serde(default)]
    pub max_stock: Option<i64>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub price_per_unit_cents: Option<i64>,
    #[serde(default)]
    pub discontinued: Option<bool>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub supplier: Option<String>,
    #[ts(as = "Option<String>")]
    #[serde(default)]
    pub last_restocked: Option<DateTime<Utc>>,
}

/// A validated product patch.
///
/// `product` carries every change except quantity, which must go through the
/// stock ledger as `quantity_delta`.
#[derive(Debug, Clone, PartialEq)]
pub struct PatchedProduct {
    pub product: Product,
    pub quantity_delta: i64,
}

impl ProductPatch {
    pub fn apply(&self, current: &Product, now: DateTime<Utc>) -> ValidationResult<PatchedProduct> {
        let mut product = current.clone();

        if let Some(name) = &self.name {
            product.name = required_text("name", name, MAX_NAME_LEN)?;
        }
        if let Some(category) = &self.category {
            product.category = required_text("category", category, MAX_NAME_LEN)?;
        }
        if self.description.is_some() {
            product.description =
                optional_text("description", self.description.as_deref(), MAX_TEXT_LEN)?;
        }
        if let Some(sku) = &self.sku {
            product.sku = normalize_sku(sku)?;
        }
        if let Some(unit) = &self.unit {
            product.unit = required_text("unit", unit, 32)?;
        }
        if let Some(price) = self.price_per_unit_cents {
            validate_price_cents("pricePerUnitCents", price)?;
            product.price_per_unit_cents = price;
        }
        if self.location.is_some() {
            product.location = optional_text("location", self.location.as_deref(), MAX_NAME_LEN)?;
        }
        if self.supplier.is_some() {
            product.supplier = optional_text("supplier", self.supplier.as_deref(), MAX_NAME_LEN)?;
        }
        if self.last_restocked.is_some() {
            product.last_restocked = self.last_restocked;
        }

        if let Some(min) = self.min_stock {
            product.min_stock = min;
        }
        if self.max_stock.is_some() {
            product.max_stock = self.max_stock;
        }
        validate_stock_bounds(product.min_stock, product.max_stock)?;

        let quantity_delta = match self.quantity {
            Some(qty) => {
                validate_non_negative("quantity", qty)?;
                qty.checked_sub(current.quantity)
                    .ok_or_else(|| ValidationError::Overflow {
                        field: "quantity".to_string(),
                    })?
            }
            None => 0,
        };

        let base = match self.discontinued {
            Some(true) => ProductStatus::Discontinued,
            Some(false) => ProductStatus::default(),
            None => current.status,
        };
        product.status = derive_status(product.quantity, product.min_stock, base);
        product.updated_at = now;

        Ok(PatchedProduct {
            product,
            quantity_delta,
        })
    }
}

/// Query parameters of `GET /api/products`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductFilter {
    /// Case-insensitive substring over name, SKU, description and category.
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub status: Option<ProductStatus>,
    #[serde(default)]
    pub skip: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
}

impl ProductFilter {
    /// Trimmed search term, `None` when blank.
    pub fn search_term(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    pub fn skip(&self) -> i64 {
        i64::from(self.skip.unwrap_or(0))
    }

    pub fn limit(&self) -> i64 {
        clamp_limit(self.limit)
    }
}

// =============================================================================
// Staff
// =============================================================================

/// Body of `POST /api/staff`.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewStaff {
    pub employee_id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    pub department: String,
    pub position: String,
}

impl NewStaff {
    pub fn build(self, id: String, now: DateTime<Utc>) -> ValidationResult<Staff> {
        let email = optional_text("email", self.email.as_deref(), MAX_NAME_LEN)?;
        if let Some(email) = &email {
            if !email.contains('@') {
                return Err(ValidationError::invalid_format("email", "must be an email address"));
            }
        }

        Ok(Staff {
            id,
            employee_id: required_text("employeeId", &self.employee_id, 50)?,
            first_name: required_text("firstName", &self.first_name, MAX_NAME_LEN)?,
            last_name: required_text("lastName", &self.last_name, MAX_NAME_LEN)?,
            email,
            department: required_text("department", &self.department, MAX_NAME_LEN)?,
            position: required_text("position", &self.position, MAX_NAME_LEN)?,
            is_active: true,
            created_at: now,
        })
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Midnight UTC at the start of `date`.
pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(chrono::NaiveTime::MIN))
}

fn clamp_limit(limit: Option<u32>) -> i64 {
    match limit {
        None | Some(0) => DEFAULT_LIST_LIMIT,
        Some(n) => i64::from(n).min(MAX_LIST_LIMIT),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
