//! # Sale Coordinator
//!
//! Creates, edits and deletes sales together with their stock movement.
//!
//! ## One Operation, One Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  create_sale(input)                                                     │
//! │       │                                                                 │
//! │       ├── input.validate()            ← no storage touched yet          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌── BEGIN ─────────────────────────────────────────────────────────┐   │
//! │  │  load product ─► not found?     → ProductNotFound                │   │
//! │  │       │          discontinued?  → ProductDiscontinued            │   │
//! │  │       │          short?         → InsufficientStock              │   │
//! │  │       ▼                                                          │   │
//! │  │  insert sale (total = quantity × unit price)                     │   │
//! │  │       ▼                                                          │   │
//! │  │  StockLedger::apply_delta(product, -quantity)                    │   │
//! │  └── COMMIT ────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │  any error before COMMIT: the dropped transaction rolls back            │
//! │  WriteConflict: whole operation re-run after an exponential backoff     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Business errors (`Domain`, `NotFound`, `UniqueViolation`) reach the
//! caller unchanged. Every other failure is reported as `TransactionFailed`.

use backoff::backoff::Backoff;
use backoff::ExponentialBackoff;
use chrono::Utc;
use sqlx::SqlitePool;
use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::ledger::StockLedger;
use crate::repository::product::ProductRepository;
use crate::repository::sale::SaleRepository;
use crate::repository::staff::StaffRepository;
use stockroom_core::input::{CreateSaleInput, NewSale, SaleFilter, UpdateSaleInput};
use stockroom_core::validation::validate_uuid;
use stockroom_core::{sale, stock, CoreError, Sale, SaleDetails};

// =============================================================================
// Retry Policy
// =============================================================================

/// How often, and how far apart, a conflicting write is re-attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt. Zero disables retrying.
    pub max_retries: u32,
    /// Delay before the first retry.
    pub initial_backoff: Duration,
    /// Upper bound for any single delay.
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_retries: 5,
            initial_backoff: Duration::from_millis(20),
            max_backoff: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    /// Creates the exponential backoff schedule for one operation.
    ///
    /// Delays are randomized around the current interval, so writers that
    /// collided once do not wake up together again.
    fn create_backoff(&self) -> ExponentialBackoff {
        ExponentialBackoff {
            current_interval: self.initial_backoff,
            initial_interval: self.initial_backoff,
            max_interval: self.max_backoff.max(self.initial_backoff),
            multiplier: 2.0,
            max_elapsed_time: None, // bounded by max_retries instead
            ..Default::default()
        }
    }
}

/// Runs `attempt` until it succeeds, fails for a non-retryable reason, or
/// runs out of retries.
///
/// ```text
/// WriteConflict                       → wait next_backoff(), run again
/// WriteConflict, retries used up      → TransactionFailed
/// Domain / NotFound / UniqueViolation → returned as is
/// anything else                       → TransactionFailed
/// ```
pub(crate) async fn with_retry<T, F, Fut>(
    policy: RetryPolicy,
    operation: &'static str,
    mut attempt: F,
) -> DbResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = DbResult<T>>,
{
    let mut backoff = policy.create_backoff();
    let mut tries: u32 = 0;
    loop {
        tries += 1;
        match attempt().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_retryable() => {
                let delay = (tries <= policy.max_retries)
                    .then(|| backoff.next_backoff())
                    .flatten();
                let Some(delay) = delay else {
                    error!(operation, attempts = tries, error = %err, "Giving up after write conflicts");
                    return Err(DbError::TransactionFailed(format!(
                        "{operation} did not complete after {tries} attempts"
                    )));
                };
                warn!(
                    operation,
                    attempt = tries,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "Write conflict, retrying"
                );
                tokio::time::sleep(delay).await;
            }
            Err(err @ (DbError::Domain(_) | DbError::NotFound { .. } | DbError::UniqueViolation { .. })) => {
                return Err(err)
            }
            Err(err) => {
                error!(operation, error = %err, "Transaction aborted");
                return Err(DbError::TransactionFailed(err.to_string()));
            }
        }
    }
}

// =============================================================================
// Coordinator
// =============================================================================

/// Transactional sale operations.
///
/// ## Usage
/// ```rust,ignore
/// let coordinator = db.coordinator().with_retry_policy(RetryPolicy {
///     max_retries: 10,
///     initial_backoff: Duration::from_millis(5),
///     max_backoff: Duration::from_millis(100),
/// });
///
/// let sale = coordinator.create_sale(input).await?;
/// coordinator.delete_sale(&sale.sale.id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct SaleCoordinator {
    pool: SqlitePool,
    retry: RetryPolicy,
}

impl SaleCoordinator {
    pub fn new(pool: SqlitePool) -> Self {
        SaleCoordinator {
            pool,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Records a sale and takes its quantity out of stock.
    ///
    /// ## Errors
    /// * `Domain(Validation)` - malformed id, quantity <= 0, negative price
    /// * `Domain(ProductNotFound)`
    /// * `Domain(ProductDiscontinued)` - checked before stock
    /// * `Domain(InsufficientStock)` - "Available: X, Requested: Y"
    /// * `TransactionFailed` - storage failure or persistent write conflicts
    pub async fn create_sale(&self, input: CreateSaleInput) -> DbResult<SaleDetails> {
        let input = input.validate()?;
        let new_sale = &input;

        let sale = with_retry(self.retry, "create_sale", move || self.try_create_sale(new_sale)).await?;

        info!(
            sale_id = %sale.id,
            product_id = %sale.product_id,
            quantity = sale.quantity,
            total_cents = sale.total_amount_cents,
            "Sale created"
        );

        self.resolve_one(sale).await
    }

    async fn try_create_sale(&self, input: &NewSale) -> DbResult<Sale> {
        let mut tx = self.pool.begin().await?;

        let product = ProductRepository::find_by_id(&mut *tx, &input.product_id)
            .await?
            .ok_or_else(|| CoreError::ProductNotFound(input.product_id.clone()))?;

        stock::ensure_sellable(&product)?;
        stock::ensure_available(&product, input.quantity)?;

        let sale = sale::build_sale(Uuid::new_v4().to_string(), input.clone(), Utc::now())?;

        SaleRepository::insert(&mut *tx, &sale).await?;
        StockLedger::apply_delta(&mut *tx, &product, -sale.quantity).await?;

        tx.commit().await?;
        Ok(sale)
    }

    /// Edits a sale. A quantity change moves stock by the difference.
    ///
    /// ## Quantity Changes
    /// ```text
    /// stored 4, new 6  → need 2 more  → InsufficientStock if available < 2
    /// stored 4, new 2  → 2 go back to stock
    /// stored 4, new 4  → stock untouched
    /// ```
    ///
    /// The staff member and product of a sale cannot be changed; passing a
    /// different id fails with `ReassignmentNotSupported`.
    pub async fn update_sale(&self, id: &str, input: UpdateSaleInput) -> DbResult<SaleDetails> {
        validate_uuid("id", id)?;
        input.validate()?;
        let edit = &input;

        let sale = with_retry(self.retry, "update_sale", move || self.try_update_sale(id, edit)).await?;

        info!(sale_id = %sale.id, quantity = sale.quantity, "Sale updated");
        self.resolve_one(sale).await
    }

    async fn try_update_sale(&self, id: &str, edit: &UpdateSaleInput) -> DbResult<Sale> {
        let mut tx = self.pool.begin().await?;

        let current = SaleRepository::find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| CoreError::SaleNotFound(id.to_string()))?;

        edit.ensure_no_reassignment(&current)?;

        if let Some(new_quantity) = edit.quantity_change(&current) {
            let product = ProductRepository::find_by_id(&mut *tx, &current.product_id)
                .await?
                .ok_or_else(|| CoreError::ProductNotFound(current.product_id.clone()))?;

            let delta = sale::stock_delta_for_edit(current.quantity, new_quantity);
            StockLedger::apply_delta(&mut *tx, &product, delta).await?;
        }

        let updated = sale::apply_edit(&current, edit, Utc::now())?;
        SaleRepository::update(&mut *tx, &updated).await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Deletes a sale and returns its quantity to stock.
    ///
    /// If the product has since been deleted there is nothing to restore;
    /// the sale is removed anyway.
    pub async fn delete_sale(&self, id: &str) -> DbResult<Sale> {
        validate_uuid("id", id)?;

        let sale = with_retry(self.retry, "delete_sale", move || self.try_delete_sale(id)).await?;

        info!(sale_id = %sale.id, restored = sale.quantity, "Sale deleted");
        Ok(sale)
    }

    async fn try_delete_sale(&self, id: &str) -> DbResult<Sale> {
        let mut tx = self.pool.begin().await?;

        let sale = SaleRepository::find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| CoreError::SaleNotFound(id.to_string()))?;

        match ProductRepository::find_by_id(&mut *tx, &sale.product_id).await? {
            Some(product) => {
                StockLedger::apply_delta(&mut *tx, &product, sale.quantity).await?;
            }
            None => {
                warn!(
                    sale_id = %sale.id,
                    product_id = %sale.product_id,
                    "Product no longer exists, stock not restored"
                );
            }
        }

        SaleRepository::delete(&mut *tx, id).await?;

        tx.commit().await?;
        Ok(sale)
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// One sale with its product and staff resolved.
    pub async fn get_sale(&self, id: &str) -> DbResult<SaleDetails> {
        validate_uuid("id", id)?;

        let sale = SaleRepository::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| CoreError::SaleNotFound(id.to_string()))?;

        self.resolve_one(sale).await
    }

    /// Filtered sales, newest first, with references resolved.
    pub async fn list_sales(&self, filter: &SaleFilter) -> DbResult<Vec<SaleDetails>> {
        let query = filter.resolve()?;
        let sales = SaleRepository::find(&self.pool, &query).await?;

        debug!(count = sales.len(), "Listed sales");
        self.resolve(sales).await
    }

    async fn resolve_one(&self, sale: Sale) -> DbResult<SaleDetails> {
        let mut details = self.resolve(vec![sale]).await?;
        details
            .pop()
            .ok_or_else(|| DbError::Internal("sale vanished while resolving".to_string()))
    }

    /// Attaches product and staff summaries. Dangling references resolve to
    /// `None`.
    async fn resolve(&self, sales: Vec<Sale>) -> DbResult<Vec<SaleDetails>> {
        let mut product_ids: Vec<String> = sales.iter().map(|s| s.product_id.clone()).collect();
        product_ids.sort();
        product_ids.dedup();
        let mut staff_ids: Vec<String> = sales.iter().map(|s| s.staff_id.clone()).collect();
        staff_ids.sort();
        staff_ids.dedup();

        let products: HashMap<String, _> = ProductRepository::find_by_ids(&self.pool, &product_ids)
            .await?
            .into_iter()
            .map(|p| (p.id.clone(), p.summary()))
            .collect();
        let staff: HashMap<String, _> = StaffRepository::find_by_ids(&self.pool, &staff_ids)
            .await?
            .into_iter()
            .map(|s| (s.id.clone(), s.summary()))
            .collect();

        Ok(sales
            .into_iter()
            .map(|sale| SaleDetails {
                product: products.get(&sale.product_id).cloned(),
                staff: staff.get(&sale.staff_id).cloned(),
                sale,
            })
            .collect())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
