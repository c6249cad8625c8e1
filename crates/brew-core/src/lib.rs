//! # brew-core: Pure Business Logic for Brew POS
//!
//! This crate is the heart of the cafe point-of-sale and table-booking
//! system. It contains all business logic as pure functions with zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! staff console / customer self-service (out of scope)
//!                      │
//!                      ▼
//!              apps/pos (orchestration)
//!                      │
//!                      ▼
//!         ★ brew-core (THIS CRATE) ★
//!    money │ types │ cart │ validation │ error
//!    NO I/O • NO DATABASE • NO NETWORK
//!                      │
//!                      ▼
//!              brew-db (SQLite layer)
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (MenuItem, Order, OrderLine, CafeTable) and the
//!   order/table status enums, including the order transition graph
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`cart`] - Pure cart math with frozen prices
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation rules
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input = same output
//! 2. **Integer Money**: all monetary values are cents (i64)
//! 3. **Explicit Errors**: typed errors, never strings or panics
//! 4. **Central State Machine**: every status mutation path goes through
//!    [`types::OrderStatus::validate_transition`] - no caller can bypass the
//!    graph

pub mod cart;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

pub use cart::{Cart, CartLine};
pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use types::*;

/// Maximum quantity of a single cart line.
///
/// Prevents accidental over-ordering (e.g. typing 1000 instead of 10).
/// Quantity updates clamp to this rather than erroring, mirroring how the
/// lower bound of 1 is enforced.
pub const MAX_LINE_QUANTITY: i64 = 99;
