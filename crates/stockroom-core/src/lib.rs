//! # stockroom-core: Pure Business Logic for Stockroom
//!
//! Everything the sales and stock subsystem decides, without touching storage.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stockroom Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 apps/server (axum, JSON over HTTP)              │   │
//! │  │    /api/sales   /api/products   /api/staff   /api/dashboard     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 stockroom-db (SQLite via sqlx)                  │   │
//! │  │    SaleCoordinator, StockLedger, Reporting, Dashboard, stores   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ stockroom-core (THIS CRATE) ★                   │   │
//! │  │                                                                 │   │
//! │  │   types · money · input · validation · stock · sale · report    │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO CLOCK • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Product, Sale, Staff and their enums
//! - [`money`] - Integer-cent `Money`
//! - [`input`] - Typed request bodies and their validated forms
//! - [`validation`] - Field rules shared by the inputs
//! - [`stock`] - Status derivation and stock delta arithmetic
//! - [`sale`] - Sale totals and edits
//! - [`report`] - Daily and monthly rollups
//! - [`dashboard`] - Dashboard composition
//! - [`error`] - Domain error types
//!
//! ## Example
//!
//! ```rust
//! use stockroom_core::{derive_status, compute_total_amount, Money, ProductStatus};
//!
//! let total = compute_total_amount(4, Money::from_cents(200)).unwrap();
//! assert_eq!(total.to_string(), "8.00");
//!
//! assert_eq!(derive_status(6, 3, ProductStatus::InStock), ProductStatus::InStock);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod dashboard;
pub mod error;
pub mod input;
pub mod money;
pub mod report;
pub mod sale;
pub mod stock;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use sale::compute_total_amount;
pub use stock::derive_status;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Unit label used when a product is created without one.
pub const DEFAULT_UNIT: &str = "bag";

/// Label for a product or staff member that no longer exists.
pub const UNKNOWN_NAME: &str = "Unknown";

/// Entries kept in each monthly top list.
pub const TOP_ENTRIES_LIMIT: usize = 10;

/// Page size when a list request gives none.
pub const DEFAULT_LIST_LIMIT: i64 = 10;

/// Largest page a list request may ask for.
pub const MAX_LIST_LIMIT: i64 = 100;
