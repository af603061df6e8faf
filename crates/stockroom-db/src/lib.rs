//! # stockroom-db: Database Layer for Stockroom
//!
//! SQLite persistence for products, staff and sales, and every transaction
//! boundary in the system.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stockroom Data Flow                              │
//! │                                                                         │
//! │  HTTP handler (POST /api/sales)                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   stockroom-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌────────────────┐   ┌──────────────┐   ┌─────────────────┐  │   │
//! │  │   │ SaleCoordinator│   │ ProductCatalog│  │ Reporting /     │  │   │
//! │  │   │ (transactions, │   │ (CRUD, stock │   │ Dashboard       │  │   │
//! │  │   │  retry)        │   │  edits)      │   │ (read snapshots)│  │   │
//! │  │   └───────┬────────┘   └──────┬───────┘   └────────┬────────┘  │   │
//! │  │           │   StockLedger     │                    │           │   │
//! │  │           ▼   (guarded write) ▼                    ▼           │   │
//! │  │   ┌─────────────────────────────────────────────────────────┐  │   │
//! │  │   │ Repositories: products / sales / staff                  │  │   │
//! │  │   └─────────────────────────────────────────────────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite (WAL)                                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Row-level stores (product, sale, staff)
//! - [`ledger`] - The only writer of stock quantities
//! - [`coordinator`] - Sale create / update / delete transactions
//! - [`catalog`] - Product maintenance
//! - [`reporting`] - Daily and monthly reports
//! - [`dashboard`] - Dashboard statistics
//!
//! ## Usage
//!
//! ```rust,ignore
//! use stockroom_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/stockroom.db")).await?;
//!
//! let sale = db.coordinator().create_sale(input).await?;
//! let report = db.reports().monthly_report(2026, 3).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod coordinator;
pub mod dashboard;
pub mod error;
pub mod ledger;
pub mod migrations;
pub mod pool;
pub mod reporting;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use catalog::ProductCatalog;
pub use coordinator::{RetryPolicy, SaleCoordinator};
pub use dashboard::DashboardAggregator;
pub use error::{DbError, DbResult};
pub use ledger::StockLedger;
pub use pool::{Database, DbConfig};
pub use reporting::ReportingAggregator;

// Repository re-exports for convenience
pub use repository::product::ProductRepository;
pub use repository::sale::SaleRepository;
pub use repository::staff::StaffRepository;
