//! # Error Types
//!
//! Domain-specific error types for stockroom-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  stockroom-core errors (this file)                                     │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  stockroom-db errors (separate crate)                                  │
//! │  └── DbError          - Storage failures, wraps CoreError              │
//! │                                                                         │
//! │  Server errors (apps/server)                                           │
//! │  └── ApiError         - JSON envelope + HTTP status                    │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → Client       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every `CoreError` is a business error: it is safe to show its message to
//! the caller verbatim. Storage failures never appear here.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations raised by the ledger, the sale rules and the
/// input validators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Product cannot be found.
    ///
    /// ## When This Occurs
    /// - Creating a sale for an unknown product ID
    /// - Changing the quantity of a sale whose product was deleted
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Sale cannot be found.
    #[error("Sale not found: {0}")]
    SaleNotFound(String),

    /// Staff member cannot be found.
    #[error("Staff member not found: {0}")]
    StaffNotFound(String),

    /// The product is discontinued and cannot be sold.
    #[error("Product '{name}' is discontinued and cannot be sold")]
    ProductDiscontinued { product_id: String, name: String },

    /// Not enough stock to cover the request.
    ///
    /// ## User Workflow
    /// ```text
    /// POST /api/sales { quantity: 10 }
    ///      │
    ///      ▼
    /// Check stock: available = 6
    ///      │
    ///      ▼
    /// InsufficientStock { available: 6, requested: 10 }
    ///      │
    ///      ▼
    /// 400 "Insufficient stock. Available: 6, Requested: 10"
    /// ```
    #[error("Insufficient stock. Available: {available}, Requested: {requested}")]
    InsufficientStock { available: i64, requested: i64 },

    /// An update tried to move a sale to another product or staff member.
    #[error("{field} of an existing sale cannot be changed")]
    ReassignmentNotSupported { field: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any storage is touched, so a malformed request never opens
/// a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must be zero or greater.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Invalid format (e.g., invalid UUID, invalid date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Two fields disagree with each other.
    #[error("{field} {reason}")]
    Inconsistent { field: String, reason: String },

    /// Arithmetic on the value would overflow.
    #[error("{field} is too large")]
    Overflow { field: String },
}

impl ValidationError {
    pub fn required(field: &str) -> Self {
        ValidationError::Required {
            field: field.to_string(),
        }
    }

    pub fn invalid_format(field: &str, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_stock_message_reports_both_amounts() {
        let err = CoreError::InsufficientStock {
            available: 6,
            requested: 10,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock. Available: 6, Requested: 10"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        assert_eq!(
            ValidationError::required("staffId").to_string(),
            "staffId is required"
        );

        let err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        assert_eq!(err.to_string(), "quantity must be positive");

        let err = ValidationError::Inconsistent {
            field: "maxStock".to_string(),
            reason: "must be greater than minStock".to_string(),
        };
        assert_eq!(err.to_string(), "maxStock must be greater than minStock");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let core_err: CoreError = ValidationError::required("sku").into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
