//! # Error Types
//!
//! Domain-specific error types for brew-core.
//!
//! ## Error Hierarchy
//! ```text
//! brew-core errors (this file)
//! ├── CoreError        - Business rule violations
//! └── ValidationError  - Input validation failures
//!
//! brew-db errors (separate crate)
//! └── DbError          - Database operation failures
//!
//! apps/pos errors
//! └── ApiError         - What the surfaces see (serialized)
//!
//! Flow: ValidationError → CoreError → ApiError → surface
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (ids, statuses, fields)
//! 3. Errors are enum variants, never String

use thiserror::Error;

use crate::types::OrderStatus;

/// Core business logic errors.
///
/// These represent business rule violations. The application layer translates
/// them into user-facing messages.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A status change was requested that is not an edge of the order
    /// transition graph (including any backward move and `ready` →
    /// `cancelled`). The order must be left unchanged by the caller.
    #[error("illegal order transition: {from} -> {to}")]
    IllegalTransition { from: OrderStatus, to: OrderStatus },

    /// Validation error (wraps ValidationError).
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Input validation errors.
///
/// These occur when user input doesn't meet requirements. Used for early
/// validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },
}

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;
