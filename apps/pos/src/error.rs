//! # API Error Type
//!
//! Unified error type returned by every service to the surfaces.
//!
//! ## Error Handling Strategy
//! ```text
//! ValidationError ─┐
//!                  ├─► CoreError ─┐
//! (business rules)─┘              ├─► ApiError { code, message } ─► surface
//!        DbError ─────────────────┘
//! ```
//!
//! Every failed mutation produces a discrete, human-readable message the
//! surface can show next to the action that failed; `code` is the
//! machine-readable half for programmatic handling. Errors are serializable
//! so an IPC or HTTP boundary can carry them verbatim.

use serde::Serialize;

use brew_core::{CoreError, TableStatus};
use brew_db::DbError;

/// API error returned from service calls.
///
/// Serialized form:
/// ```json
/// { "code": "TABLE_UNAVAILABLE", "message": "Table 4 is reserved" }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling.
    pub code: ErrorCode,

    /// Human-readable message for display.
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found.
    NotFound,

    /// Input validation failed (bad or missing field).
    Validation,

    /// Checkout attempted with an empty cart.
    EmptyCart,

    /// The caller has no resolvable identity; sign-in required.
    Unauthenticated,

    /// The caller's role does not permit this operation.
    Forbidden,

    /// Requested order status change is not an edge of the transition graph.
    IllegalTransition,

    /// The table was not available at apply time.
    TableUnavailable,

    /// Underlying persistence/network failure (including timeouts).
    Store,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{resource} not found: {id}"))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Validation, message)
    }

    /// Creates an empty-cart error.
    pub fn empty_cart() -> Self {
        ApiError::new(ErrorCode::EmptyCart, "cart is empty")
    }

    /// Creates an unauthenticated error. The surface redirects to sign-in.
    pub fn unauthenticated() -> Self {
        ApiError::new(ErrorCode::Unauthenticated, "sign in to continue")
    }

    /// Creates a forbidden error for staff-only operations.
    pub fn forbidden(action: &str) -> Self {
        ApiError::new(ErrorCode::Forbidden, format!("{action} requires staff access"))
    }

    /// Creates a table-unavailable error.
    pub fn table_unavailable(table_number: i64, status: TableStatus) -> Self {
        ApiError::new(
            ErrorCode::TableUnavailable,
            format!("Table {table_number} is {status}"),
        )
    }

    /// Creates a store error.
    pub fn store(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Store, message)
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::UniqueViolation { field } => {
                ApiError::validation(format!("value for {field} already exists"))
            }
            DbError::CheckViolation { message } => {
                tracing::error!("Check violation: {message}");
                ApiError::validation("value out of allowed range")
            }
            DbError::ForeignKeyViolation { message } => {
                tracing::error!("Foreign key violation: {message}");
                ApiError::validation("invalid reference")
            }
            DbError::ConnectionFailed(_) => ApiError::store("store connection failed"),
            DbError::MigrationFailed(_) => ApiError::store("store migration failed"),
            DbError::QueryFailed(e) => {
                // log the real error, return a generic message
                tracing::error!("Query failed: {e}");
                ApiError::store("store operation failed")
            }
            DbError::PoolExhausted => ApiError::store("store is busy, try again"),
            DbError::Internal(e) => {
                tracing::error!("Internal store error: {e}");
                ApiError::store("store operation failed")
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::IllegalTransition { from, to } => ApiError::new(
                ErrorCode::IllegalTransition,
                format!("order cannot move from {from} to {to}"),
            ),
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}
