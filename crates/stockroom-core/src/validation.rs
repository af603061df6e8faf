//! # Validation Module
//!
//! Input validation utilities.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP extractors (apps/server)                                │
//! │  └── Type validation (JSON / query deserialization)                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── ID format, positive quantities, non-negative prices               │
//! │  └── Runs before any transaction is opened                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: SQLite                                                       │
//! │  ├── CHECK (quantity >= 0)                                             │
//! │  └── UNIQUE (sku), UNIQUE (employee_id)                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest free-text field accepted (notes, descriptions).
pub const MAX_TEXT_LEN: usize = 1000;

/// Longest name-like field accepted.
pub const MAX_NAME_LEN: usize = 200;

// =============================================================================
// Identifier Validators
// =============================================================================

/// Validates that `id` is a well-formed UUID.
///
/// Format check only; existence is the store's concern.
///
/// ## Example
/// ```rust
/// use stockroom_core::validation::validate_uuid;
///
/// assert!(validate_uuid("productId", "550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("productId", "not-a-uuid").is_err());
/// ```
pub fn validate_uuid(field: &str, id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::required(field));
    }

    uuid::Uuid::parse_str(id)
        .map_err(|_| ValidationError::invalid_format(field, "must be a valid UUID"))?;

    Ok(())
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a SKU and returns its normalized (trimmed, upper-case) form.
///
/// ## Rules
/// - Must not be empty
/// - At most 50 characters
/// - Letters, digits, hyphens and underscores only
///
/// ## Example
/// ```rust
/// use stockroom_core::validation::normalize_sku;
///
/// assert_eq!(normalize_sku(" cem-50 ").unwrap(), "CEM-50");
/// assert!(normalize_sku("has space").is_err());
/// ```
pub fn normalize_sku(sku: &str) -> ValidationResult<String> {
    let sku = sku.trim();

    if sku.is_empty() {
        return Err(ValidationError::required("sku"));
    }

    if sku.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "sku".to_string(),
            max: 50,
        });
    }

    if !sku
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::invalid_format(
            "sku",
            "must contain only letters, numbers, hyphens, and underscores",
        ));
    }

    Ok(sku.to_uppercase())
}

/// Validates a required name-like field and returns it trimmed.
pub fn required_text(field: &str, value: &str, max: usize) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::required(field));
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(value.to_string())
}

/// Normalizes an optional free-text field.
///
/// Blank strings collapse to `None` so "clear this field" and "never set"
/// store the same value.
pub fn optional_text(field: &str, value: Option<&str>, max: usize) -> ValidationResult<Option<String>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) if v.chars().count() > max => Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        }),
        Some(v) => Ok(Some(v.to_string())),
    }
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a sale quantity.
///
/// ## Rules
/// - Must be positive (> 0)
///
/// ## User Workflow
/// ```text
/// PUT /api/sales/:id { quantity: 0 }
///       │
///       ▼
/// validate_sale_quantity(0) ← THIS FUNCTION
///       │
///       ├── qty <= 0? → 400 "quantity must be positive"
///       │               (no stock is touched)
///       │
///       └── OK → Coordinator computes the stock delta
/// ```
pub fn validate_sale_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates that a count or threshold is zero or greater.
pub fn validate_non_negative(field: &str, value: i64) -> ValidationResult<()> {
    if value < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a price in cents.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free items)
///
/// ## Example
/// ```rust
/// use stockroom_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents("unitPrice", 200).is_ok());
/// assert!(validate_price_cents("unitPrice", 0).is_ok());
/// assert!(validate_price_cents("unitPrice", -1).is_err());
/// ```
pub fn validate_price_cents(field: &str, cents: i64) -> ValidationResult<()> {
    validate_non_negative(field, cents)
}

/// Validates the min/max stock pair.
///
/// `max_stock` must be strictly greater than `min_stock` when present.
pub fn validate_stock_bounds(min_stock: i64, max_stock: Option<i64>) -> ValidationResult<()> {
    validate_non_negative("minStock", min_stock)?;

    if let Some(max) = max_stock {
        validate_non_negative("maxStock", max)?;
        if max <= min_stock {
            return Err(ValidationError::Inconsistent {
                field: "maxStock".to_string(),
                reason: "must be greater than minStock".to_string(),
            });
        }
    }

    Ok(())
}

/// Validates a calendar month number.
pub fn validate_month(month: u32) -> ValidationResult<()> {
    if !(1..=12).contains(&month) {
        return Err(ValidationError::OutOfRange {
            field: "month".to_string(),
            min: 1,
            max: 12,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_uuid() {
        assert!(validate_uuid("id", "550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert_eq!(
            validate_uuid("staffId", "").unwrap_err(),
            ValidationError::required("staffId")
        );
        assert!(validate_uuid("id", "not-a-uuid").is_err());
        assert!(validate_uuid("id", "507f1f77bcf86cd799439011").is_err());
    }

    #[test]
    fn test_normalize_sku() {
        assert_eq!(normalize_sku("cem-50").unwrap(), "CEM-50");
        assert_eq!(normalize_sku("  abc_1 ").unwrap(), "ABC_1");

        assert!(normalize_sku("").is_err());
        assert!(normalize_sku("   ").is_err());
        assert!(normalize_sku("has space").is_err());
        assert!(normalize_sku(&"A".repeat(51)).is_err());
    }

    #[test]
    fn test_required_and_optional_text() {
        assert_eq!(required_text("name", "  Cement ", 200).unwrap(), "Cement");
        assert!(required_text("name", "", 200).is_err());
        assert!(required_text("name", &"x".repeat(201), 200).is_err());

        assert_eq!(optional_text("notes", None, 10).unwrap(), None);
        assert_eq!(optional_text("notes", Some("  "), 10).unwrap(), None);
        assert_eq!(
            optional_text("notes", Some(" paid "), 10).unwrap(),
            Some("paid".to_string())
        );
        assert!(optional_text("notes", Some("far too long"), 5).is_err());
    }

    #[test]
    fn test_validate_sale_quantity() {
        assert!(validate_sale_quantity(1).is_ok());
        assert!(validate_sale_quantity(10_000).is_ok());
        assert!(validate_sale_quantity(0).is_err());
        assert!(validate_sale_quantity(-3).is_err());
    }

    #[test]
    fn test_validate_price_cents() {
        assert!(validate_price_cents("unitPrice", 0).is_ok());
        assert!(validate_price_cents("unitPrice", 1099).is_ok());
        assert!(validate_price_cents("unitPrice", -100).is_err());
    }

    #[test]
    fn test_validate_stock_bounds() {
        assert!(validate_stock_bounds(3, None).is_ok());
        assert!(validate_stock_bounds(3, Some(10)).is_ok());
        assert!(validate_stock_bounds(3, Some(3)).is_err());
        assert!(validate_stock_bounds(3, Some(2)).is_err());
        assert!(validate_stock_bounds(-1, None).is_err());
    }

    #[test]
    fn test_validate_month() {
        assert!(validate_month(1).is_ok());
        assert!(validate_month(12).is_ok());
        assert!(validate_month(0).is_err());
        assert!(validate_month(13).is_err());
    }
}
