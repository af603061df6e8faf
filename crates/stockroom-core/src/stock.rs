//! # Stock Ledger Rules
//!
//! Pure stock bookkeeping for a single product: status derivation and delta
//! arithmetic. Persisting the result is `stockroom-db`'s job
//! (`StockLedger::apply_delta`); everything here is a plain function.
//!
//! ## Status Derivation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  derive_status(quantity, min_stock)                     │
//! │                                                                         │
//! │   current == DISCONTINUED ──────────────────────► DISCONTINUED (kept)   │
//! │                                                                         │
//! │   quantity <= 0 ────────────────────────────────► OUT_OF_STOCK          │
//! │                                                                         │
//! │   0 < quantity <= min_stock ────────────────────► LOW_STOCK             │
//! │                                                                         │
//! │   quantity > min_stock ─────────────────────────► IN_STOCK              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Called at every site that changes quantity or min_stock. There is no
//! implicit "on save" hook.

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::{Product, ProductStatus};

/// Derives the stock status of a product.
///
/// `current` is only consulted for the discontinued override; any other
/// current status is recomputed from scratch.
///
/// ## Example
/// ```rust
/// use stockroom_core::stock::derive_status;
/// use stockroom_core::ProductStatus;
///
/// assert_eq!(derive_status(6, 3, ProductStatus::InStock), ProductStatus::InStock);
/// assert_eq!(derive_status(2, 3, ProductStatus::InStock), ProductStatus::LowStock);
/// assert_eq!(derive_status(0, 3, ProductStatus::LowStock), ProductStatus::OutOfStock);
/// assert_eq!(derive_status(50, 3, ProductStatus::Discontinued), ProductStatus::Discontinued);
/// ```
pub fn derive_status(quantity: i64, min_stock: i64, current: ProductStatus) -> ProductStatus {
    if current == ProductStatus::Discontinued {
        return ProductStatus::Discontinued;
    }

    if quantity <= 0 {
        ProductStatus::OutOfStock
    } else if quantity <= min_stock {
        ProductStatus::LowStock
    } else {
        ProductStatus::InStock
    }
}

/// Quantity and status of a product after a stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockLevel {
    pub quantity: i64,
    pub status: ProductStatus,
}

/// Computes the stock level after applying `delta` to `product`.
///
/// Negative deltas take stock (a sale), positive deltas return it (a deleted
/// or reduced sale, a restock).
///
/// ## Errors
/// - `InsufficientStock` when the result would drop below zero. `available`
///   is the current quantity and `requested` is the amount being taken.
/// - `Validation(Overflow)` when the addition overflows.
///
/// ## Example
/// ```rust
/// # use stockroom_core::{stock::apply_delta, Product, ProductStatus};
/// # fn demo(product: &Product) {
/// // product.quantity == 10, min_stock == 3
/// let level = apply_delta(product, -4).unwrap();
/// assert_eq!(level.quantity, 6);
/// assert_eq!(level.status, ProductStatus::InStock);
/// # }
/// ```
pub fn apply_delta(product: &Product, delta: i64) -> CoreResult<StockLevel> {
    let quantity = product
        .quantity
        .checked_add(delta)
        .ok_or_else(|| ValidationError::Overflow {
            field: "quantity".to_string(),
        })?;

    if quantity < 0 {
        return Err(CoreError::InsufficientStock {
            available: product.quantity,
            requested: delta.saturating_neg(),
        });
    }

    Ok(StockLevel {
        quantity,
        status: derive_status(quantity, product.min_stock, product.status),
    })
}

/// Fails with `InsufficientStock` unless `requested` units are on hand.
pub fn ensure_available(product: &Product, requested: i64) -> CoreResult<()> {
    if product.quantity < requested {
        return Err(CoreError::InsufficientStock {
            available: product.quantity,
            requested,
        });
    }
    Ok(())
}

/// Fails with `ProductDiscontinued` if the product may not be sold.
pub fn ensure_sellable(product: &Product) -> CoreResult<()> {
    if product.is_discontinued() {
        return Err(CoreError::ProductDiscontinued {
            product_id: product.id.clone(),
            name: product.name.clone(),
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
