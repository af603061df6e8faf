//! # Database Error Types
//!
//! Error types for database operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)          Business rule (CoreError)         │
//! │       │                                    │                            │
//! │       ▼                                    ▼                            │
//! │  DbError (this module) ◄──────────── DbError::Domain                   │
//! │       │                                                                 │
//! │       ├── WriteConflict? ──► SaleCoordinator retries the operation     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError (apps/server) ← JSON envelope + HTTP status                  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::borrow::Cow;

use stockroom_core::{CoreError, ValidationError};
use thiserror::Error;

/// SQLite primary result codes that mean "another writer got there first".
const SQLITE_BUSY: i32 = 5;
const SQLITE_LOCKED: i32 = 6;

/// Database operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found in database.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint violation.
    ///
    /// ## When This Occurs
    /// - Inserting or renaming to a duplicate SKU
    /// - Creating staff with a duplicate employee ID
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// A concurrent writer changed the data this transaction read.
    ///
    /// ## When This Occurs
    /// - SQLite reports BUSY / BUSY_SNAPSHOT / LOCKED on a write
    /// - A guarded stock update found a different quantity than it read
    ///
    /// Always safe to retry the whole operation.
    #[error("Write conflict: {0}")]
    WriteConflict(String),

    /// Business rule violation raised while the transaction was open.
    #[error(transparent)]
    Domain(#[from] CoreError),

    /// Database connection failed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// A coordinated operation could not be completed.
    ///
    /// ## When This Occurs
    /// - Write conflicts persisted through every retry
    /// - A storage failure aborted the transaction
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Pool exhausted (no connection within the acquire timeout).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Creates a UniqueViolation error.
    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        DbError::UniqueViolation {
            field: field.into(),
            value: value.into(),
        }
    }

    /// True if re-running the whole operation may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, DbError::WriteConflict(_))
    }

    /// True for business rule violations, which surface unchanged.
    pub fn is_domain(&self) -> bool {
        matches!(self, DbError::Domain(_))
    }

    /// Rewrites a UniqueViolation with the offending value, which SQLite's
    /// message does not include.
    pub fn with_duplicate_value(self, value: impl Into<String>) -> Self {
        match self {
            DbError::UniqueViolation { field, .. } => DbError::UniqueViolation {
                field,
                value: value.into(),
            },
            other => other,
        }
    }
}

impl From<ValidationError> for DbError {
    fn from(err: ValidationError) -> Self {
        DbError::Domain(CoreError::Validation(err))
    }
}

fn is_busy_code(code: Option<Cow<'_, str>>) -> bool {
    code.and_then(|c| c.parse::<i32>().ok())
        .map(|c| matches!(c & 0xff, SQLITE_BUSY | SQLITE_LOCKED))
        .unwrap_or(false)
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::Database
///   ├── BUSY / LOCKED (any extended code)  → DbError::WriteConflict
///   ├── "UNIQUE constraint failed: t.col"  → DbError::UniqueViolation { field: col }
///   └── anything else                      → DbError::QueryFailed
/// sqlx::Error::RowNotFound                 → DbError::NotFound
/// sqlx::Error::PoolTimedOut                → DbError::PoolExhausted
/// Other                                    → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "Record".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                if is_busy_code(db_err.code()) || msg.contains("database is locked") {
                    DbError::WriteConflict(msg.to_string())
                } else if let Some(target) = msg.strip_prefix("UNIQUE constraint failed: ") {
                    // "products.sku" → "sku"
                    let field = target.rsplit('.').next().unwrap_or(target).to_string();
                    DbError::UniqueViolation {
                        field,
                        value: "unknown".to_string(),
                    }
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_busy_codes() {
        assert!(is_busy_code(Some(Cow::Borrowed("5"))));
        // SQLITE_BUSY_SNAPSHOT
        assert!(is_busy_code(Some(Cow::Borrowed("517"))));
        // SQLITE_LOCKED_SHAREDCACHE
        assert!(is_busy_code(Some(Cow::Borrowed("262"))));
        // SQLITE_CONSTRAINT_UNIQUE
        assert!(!is_busy_code(Some(Cow::Borrowed("2067"))));
        assert!(!is_busy_code(None));
    }

    #[test]
    fn test_retryable_classification() {
        assert!(DbError::WriteConflict("x".into()).is_retryable());
        assert!(!DbError::PoolExhausted.is_retryable());
        assert!(!DbError::from(CoreError::SaleNotFound("s".into())).is_retryable());
        assert!(DbError::from(ValidationError::required("name")).is_domain());
    }

    #[test]
    fn test_with_duplicate_value() {
        let err = DbError::duplicate("sku", "unknown").with_duplicate_value("CEM-50");
        assert_eq!(err.to_string(), "Duplicate sku: 'CEM-50' already exists");
    }
}
