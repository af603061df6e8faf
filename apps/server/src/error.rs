//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Stockroom                              │
//! │                                                                         │
//! │  Handler → Result<T, ApiError>                                          │
//! │                 │                                                       │
//! │   JsonRejection / QueryRejection ───────────► VALIDATION_ERROR   400    │
//! │   CoreError::Validation / Reassignment ─────► VALIDATION_ERROR   400    │
//! │   CoreError::*NotFound, DbError::NotFound ──► NOT_FOUND          404    │
//! │   CoreError::ProductDiscontinued ───────────► INVALID_STATE      409    │
//! │   CoreError::InsufficientStock ─────────────► INSUFFICIENT_STOCK 400    │
//! │   DbError::UniqueViolation ─────────────────► CONFLICT           409    │
//! │   DbError::TransactionFailed ───────────────► TRANSACTION_FAILED 500    │
//! │   other DbError ────────────────────────────► DATABASE_ERROR     500    │
//! │                 │                                                       │
//! │                 ▼                                                       │
//! │  {"status":"fail","statusCode":400,"code":"INSUFFICIENT_STOCK",         │
//! │   "message":"Insufficient stock. Available: 6, Requested: 10"}          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! 5xx errors never leak storage details: the full error is logged with
//! `tracing::error!` and the client gets a generic message.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use stockroom_core::CoreError;
use stockroom_db::DbError;

/// Handler result.
pub type ApiResult<T> = Result<T, ApiError>;

/// API error returned from handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input validation failed (400)
    ValidationError,

    /// Resource not found (404)
    NotFound,

    /// Operation not allowed in the resource's current state (409)
    InvalidState,

    /// Not enough stock (400)
    InsufficientStock,

    /// Duplicate unique value (409)
    Conflict,

    /// Transaction could not complete (500)
    TransactionFailed,

    /// Database operation failed (500)
    DatabaseError,

    /// Internal server error (500)
    Internal,
}

impl ErrorCode {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorCode::ValidationError | ErrorCode::InsufficientStock => StatusCode::BAD_REQUEST,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::InvalidState | ErrorCode::Conflict => StatusCode::CONFLICT,
            ErrorCode::TransactionFailed | ErrorCode::DatabaseError | ErrorCode::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    pub fn status(&self) -> StatusCode {
        self.code.status()
    }
}

/// Wire shape of an error.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody<'a> {
    status: &'static str,
    status_code: u16,
    code: ErrorCode,
    message: &'a str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            status: if status.is_server_error() { "error" } else { "fail" },
            status_code: status.as_u16(),
            code: self.code,
            message: &self.message,
        };
        (status, Json(body)).into_response()
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Domain(e) => ApiError::from(e),
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => ApiError::new(
                ErrorCode::Conflict,
                format!("{} '{}' already exists", field, value),
            ),
            DbError::TransactionFailed(e) => {
                tracing::error!("Transaction failed: {}", e);
                ApiError::new(ErrorCode::TransactionFailed, "Transaction could not be completed")
            }
            DbError::WriteConflict(e) => {
                tracing::error!("Unretried write conflict: {}", e);
                ApiError::new(ErrorCode::TransactionFailed, "Transaction could not be completed")
            }
            DbError::ConnectionFailed(e) => {
                tracing::error!("Database connection failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(e) => {
                tracing::error!("Database migration failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::PoolExhausted => {
                tracing::error!("Database pool exhausted");
                ApiError::new(ErrorCode::DatabaseError, "Database is busy")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::internal("Internal server error")
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(id) => ApiError::not_found("Product", &id),
            CoreError::SaleNotFound(id) => ApiError::not_found("Sale", &id),
            CoreError::StaffNotFound(id) => ApiError::not_found("Staff member", &id),
            e @ CoreError::ProductDiscontinued { .. } => {
                ApiError::new(ErrorCode::InvalidState, e.to_string())
            }
            e @ CoreError::InsufficientStock { .. } => {
                ApiError::new(ErrorCode::InsufficientStock, e.to_string())
            }
            e @ CoreError::ReassignmentNotSupported { .. } => ApiError::validation(e.to_string()),
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use stockroom_core::ValidationError;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                ApiError::from(CoreError::InsufficientStock {
                    available: 6,
                    requested: 10,
                }),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::from(CoreError::ProductDiscontinued {
                    product_id: "p".into(),
                    name: "Cement".into(),
                }),
                StatusCode::CONFLICT,
            ),
            (
                ApiError::from(CoreError::SaleNotFound("s".into())),
                StatusCode::NOT_FOUND,
            ),
            (
                ApiError::from(CoreError::ReassignmentNotSupported {
                    field: "staffId".into(),
                }),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::from(DbError::duplicate("sku", "CEM-50")),
                StatusCode::CONFLICT,
            ),
            (
                ApiError::from(DbError::TransactionFailed("disk I/O error".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.clone().into_response().status(), expected, "{error}");
        }
    }

    #[test]
    fn test_domain_errors_unwrap_through_db_error() {
        let err = ApiError::from(DbError::Domain(CoreError::InsufficientStock {
            available: 6,
            requested: 10,
        }));
        assert_eq!(err.code, ErrorCode::InsufficientStock);
        assert_eq!(err.message, "Insufficient stock. Available: 6, Requested: 10");

        let err = ApiError::from(DbError::from(ValidationError::required("staffId")));
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_server_errors_hide_details() {
        let err = ApiError::from(DbError::QueryFailed("no such table: sales".into()));
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert!(!err.message.contains("sales"));
    }

    #[tokio::test]
    async fn test_envelope_shape() {
        let response = ApiError::not_found("Sale", "abc").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["status"], "fail");
        assert_eq!(json["statusCode"], 404);
        assert_eq!(json["code"], "NOT_FOUND");
        assert_eq!(json["message"], "Sale not found: abc");

        let response = ApiError::internal("boom").into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["status"], "error");
    }
}
