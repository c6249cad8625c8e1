//! # brew-db: SQLite Persistence for Brew POS
//!
//! Owns the connection pool, the embedded migrations, and the repositories
//! for the four resource collections (`menu_items`, `orders` +
//! `order_lines`, `cafe_tables`).
//!
//! ## Responsibilities
//! - Connection pool management (WAL mode, foreign keys on)
//! - Schema migrations, embedded at compile time
//! - Repository implementations, including the two guarded writes the rest
//!   of the system leans on:
//!   - [`repository::order::OrderRepository::create_with_lines`] persists an
//!     order and all its lines in ONE transaction
//!   - [`repository::table::TableRepository::reserve`] and
//!     [`repository::order::OrderRepository::update_status`] are conditional
//!     single-row updates, so racing writers are decided at the store, not
//!     by stale client state
//!
//! ## Not responsible for
//! - Business rules (brew-core)
//! - Authority checks, notifications, cart state (apps/pos)

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
