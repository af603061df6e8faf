//! # Domain Types
//!
//! Core domain types used throughout Stockroom.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌──────────────────┐   ┌──────────────────┐   ┌──────────────────┐    │
//! │  │     Product      │   │       Sale       │   │      Staff       │    │
//! │  │  ──────────────  │   │  ──────────────  │   │  ──────────────  │    │
//! │  │  id (UUID)       │◄──│  product_id      │   │  id (UUID)       │    │
//! │  │  sku (UPPER)     │   │  staff_id        │──►│  employee_id     │    │
//! │  │  quantity ≥ 0    │   │  quantity > 0    │   │  first/last name │    │
//! │  │  min_stock       │   │  unit_price      │   │  department      │    │
//! │  │  status (derived)│   │  total (derived) │   └──────────────────┘    │
//! │  └──────────────────┘   └──────────────────┘                           │
//! │                                                                         │
//! │  ┌──────────────────┐   ┌──────────────────┐                           │
//! │  │  ProductStatus   │   │  PaymentMethod   │                           │
//! │  │  InStock         │   │  Cash            │                           │
//! │  │  LowStock        │   │  Card            │                           │
//! │  │  OutOfStock      │   │  Transfer        │                           │
//! │  │  Discontinued    │   │  Cheque          │                           │
//! │  └──────────────────┘   └──────────────────┘                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All entities are serialized in camelCase for the HTTP API. Monetary
//! fields are integer cents and carry a `_cents` suffix.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Product Status
// =============================================================================

/// Stock classification of a product.
///
/// Derived from quantity and minimum stock by
/// [`derive_status`](crate::stock::derive_status), except `Discontinued`
/// which only an operator sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    InStock,
    LowStock,
    OutOfStock,
    Discontinued,
}

impl ProductStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ProductStatus::InStock => "in_stock",
            ProductStatus::LowStock => "low_stock",
            ProductStatus::OutOfStock => "out_of_stock",
            ProductStatus::Discontinued => "discontinued",
        }
    }
}

impl Default for ProductStatus {
    /// A product with no stock recorded yet.
    fn default() -> Self {
        ProductStatus::OutOfStock
    }
}

impl fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Payment Method
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Card,
    Transfer,
    Cheque,
}

impl PaymentMethod {
    /// Every method, in reporting order.
    pub const ALL: [PaymentMethod; 4] = [
        PaymentMethod::Cash,
        PaymentMethod::Card,
        PaymentMethod::Transfer,
        PaymentMethod::Cheque,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
            PaymentMethod::Transfer => "transfer",
            PaymentMethod::Cheque => "cheque",
        }
    }
}

impl Default for PaymentMethod {
    fn default() -> Self {
        PaymentMethod::Cash
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Product
// =============================================================================

/// A stocked product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name.
    pub name: String,

    pub category: String,

    pub description: Option<String>,

    /// Stock Keeping Unit, always stored upper-case.
    pub sku: String,

    /// Units on hand. Never negative.
    pub quantity: i64,

    /// At or below this level the product is LOW_STOCK.
    pub min_stock: i64,

    /// Optional upper bound, strictly above `min_stock` when set.
    pub max_stock: Option<i64>,

    /// Unit label shown next to quantities ("bag", "kg", ...).
    pub unit: String,

    /// Price per unit in cents.
    pub price_per_unit_cents: i64,

    pub status: ProductStatus,

    pub location: Option<String>,

    pub supplier: Option<String>,

    #[ts(as = "Option<String>")]
    pub last_restocked: Option<DateTime<Utc>>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    #[inline]
    pub fn is_discontinued(&self) -> bool {
        self.status == ProductStatus::Discontinued
    }

    pub fn summary(&self) -> ProductSummary {
        ProductSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            sku: self.sku.clone(),
        }
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A recorded sale of one product by one staff member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: String,

    #[ts(as = "String")]
    pub sale_date: DateTime<Utc>,

    /// Fixed at creation.
    pub staff_id: String,

    /// Fixed at creation. May dangle if the product was deleted later.
    pub product_id: String,

    pub quantity: i64,

    pub unit_price_cents: i64,

    /// Always `quantity * unit_price_cents`.
    pub total_amount_cents: i64,

    pub customer_name: Option<String>,

    pub customer_phone: Option<String>,

    pub notes: Option<String>,

    pub payment_method: PaymentMethod,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Sale {
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    #[inline]
    pub fn total_amount(&self) -> Money {
        Money::from_cents(self.total_amount_cents)
    }
}

// =============================================================================
// Staff
// =============================================================================

/// A staff member that sales are attributed to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Staff {
    pub id: String,
    pub employee_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub department: String,
    pub position: String,
    pub is_active: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Staff {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn summary(&self) -> StaffSummary {
        StaffSummary {
            id: self.id.clone(),
            employee_id: self.employee_id.clone(),
            name: self.display_name(),
        }
    }
}

// =============================================================================
// Read Models
// =============================================================================

/// The product fields a sale listing needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub id: String,
    pub name: String,
    pub sku: String,
}

/// The staff fields a sale listing needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StaffSummary {
    pub id: String,
    pub employee_id: String,
    pub name: String,
}

/// A sale with its references resolved.
///
/// `product` / `staff` are `None` when the referenced record no longer
/// exists; the sale itself is still valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SaleDetails {
    #[serde(flatten)]
    pub sale: Sale,
    pub product: Option<ProductSummary>,
    pub staff: Option<StaffSummary>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(quantity: i64, price: i64) -> Product {
        let now = Utc::now();
        Product {
            id: "p-1".to_string(),
            name: "Cement".to_string(),
            category: "Building".to_string(),
            description: None,
            sku: "CEM-50".to_string(),
            quantity,
            min_stock: 3,
            max_stock: None,
            unit: "bag".to_string(),
            price_per_unit_cents: price,
            status: ProductStatus::InStock,
            location: None,
            supplier: None,
            last_restocked: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_enum_wire_names() {
        assert_eq!(
            serde_json::to_string(&ProductStatus::OutOfStock).unwrap(),
            "\"out_of_stock\""
        );
        assert_eq!(
            serde_json::to_string(&PaymentMethod::Cheque).unwrap(),
            "\"cheque\""
        );
        for method in PaymentMethod::ALL {
            let json = serde_json::to_string(&method).unwrap();
            assert_eq!(json, format!("\"{}\"", method.as_str()));
        }
    }

    #[test]
    fn test_product_serializes_camel_case() {
        let json = serde_json::to_value(product(4, 100)).unwrap();
        assert_eq!(json["minStock"], 3);
        assert_eq!(json["pricePerUnitCents"], 100);
        assert_eq!(json["status"], "in_stock");
    }

    #[test]
    fn test_staff_display_name() {
        let staff = Staff {
            id: "s-1".to_string(),
            employee_id: "EMP-001".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Okafor".to_string(),
            email: None,
            department: "Sales".to_string(),
            position: "Clerk".to_string(),
            is_active: true,
            created_at: Utc::now(),
        };
        assert_eq!(staff.display_name(), "Ada Okafor");
        assert_eq!(staff.summary().employee_id, "EMP-001");
    }
}
