//! # Domain Types
//!
//! Core domain types for the cafe POS and table-booking system.
//!
//! ## Type Overview
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │   MenuItem   │   │    Order     │   │  CafeTable   │
//! │  ──────────  │   │  ──────────  │   │  ──────────  │
//! │  id (UUID)   │   │  id (UUID)   │   │  id (UUID)   │
//! │  name        │   │  status      │   │  table_number│
//! │  price_cents │   │  total_cents │   │  seats       │
//! │  available   │   │  created_by  │   │  status      │
//! └──────────────┘   └──────┬───────┘   └──────────────┘
//!                           │ 1..N
//!                    ┌──────┴───────┐
//!                    │  OrderLine   │  snapshot pattern:
//!                    │  ──────────  │  name + unit price are
//!                    │  name_snap   │  frozen at order time
//!                    │  subtotal    │
//!                    └──────────────┘
//! ```
//!
//! ## Order Status Graph
//! ```text
//! pending ──► preparing ──► ready ──► completed (terminal)
//!    │            │
//!    └────────────┴───────► cancelled (terminal)
//! ```
//! No other edges exist. In particular `ready` → `cancelled` and every
//! backward move are illegal. The graph is enforced by
//! [`OrderStatus::validate_transition`], which every mutation path calls.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;
use crate::money::Money;

// =============================================================================
// Menu Item
// =============================================================================

/// An item on the cafe menu.
///
/// Read-mostly from the core's point of view: its name and price are copied
/// into cart lines and order lines at the moment of use, so later edits never
/// retroactively alter historical orders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct MenuItem {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown on the menu and on order lines.
    pub name: String,

    /// Optional longer description.
    pub description: Option<String>,

    /// Free-text category ("Coffee", "Pastries", ...).
    pub category: String,

    /// Price in cents. Never negative.
    pub price_cents: i64,

    /// Whether customers can currently order this item.
    pub available: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MenuItem {
    /// Returns the price as a Money value.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

// =============================================================================
// Order Status
// =============================================================================

/// The lifecycle status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Just placed, not yet picked up by staff.
    Pending,
    /// Staff is working on it.
    Preparing,
    /// Done, waiting for pickup/serving.
    Ready,
    /// Served and closed (terminal).
    Completed,
    /// Abandoned from `pending` or `preparing` (terminal).
    Cancelled,
}

impl OrderStatus {
    /// The status every new order starts in.
    pub const fn initial() -> Self {
        OrderStatus::Pending
    }

    /// Whether no further transitions leave this status.
    pub const fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    /// Whether `(self, to)` is an edge of the transition graph.
    pub const fn can_transition(self, to: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, to),
            (Pending, Preparing)
                | (Pending, Cancelled)
                | (Preparing, Ready)
                | (Preparing, Cancelled)
                | (Ready, Completed)
        )
    }

    /// Validates a requested transition, failing with
    /// [`CoreError::IllegalTransition`] for anything outside the graph.
    /// There is no silent no-op: `pending -> pending` is an error too.
    pub fn validate_transition(self, to: OrderStatus) -> Result<(), CoreError> {
        if self.can_transition(to) {
            Ok(())
        } else {
            Err(CoreError::IllegalTransition { from: self, to })
        }
    }

    /// Lowercase wire/storage name of the status.
    pub const fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::initial()
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Order
// =============================================================================

/// A placed order.
///
/// Created atomically with its lines at checkout; afterwards only the status
/// moves, and only along the transition graph. Orders are never deleted -
/// terminal states are retained for history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Order {
    pub id: String,

    /// Free-text display name given at checkout. Required non-empty.
    pub customer_name: String,

    /// Optional free-text instructions.
    pub notes: Option<String>,

    /// Optional reference to the table the order is for.
    pub table_id: Option<String>,

    pub status: OrderStatus,

    /// Sum of line subtotals at creation time, in cents.
    /// Never recomputed from live menu prices.
    pub total_cents: i64,

    /// Identity of the customer who placed the order.
    pub created_by: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Returns the total as a Money value.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Order Line
// =============================================================================

/// A line item of an order.
///
/// Uses the snapshot pattern: the menu item's name and unit price are frozen
/// at order time, so the line stays accurate however the menu evolves.
/// Created once with the order, never mutated or deleted independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct OrderLine {
    pub id: String,
    pub order_id: String,
    pub menu_item_id: String,
    /// Menu item name at time of order (frozen).
    pub name_snapshot: String,
    /// Unit price in cents at time of order (frozen).
    pub unit_price_cents: i64,
    /// Quantity ordered, always >= 1.
    pub quantity: i64,
    /// quantity × unit_price_cents.
    pub subtotal_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl OrderLine {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns the subtotal as Money.
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }
}

// =============================================================================
// Table Status
// =============================================================================

/// The occupancy status of a cafe table.
///
/// Unlike [`OrderStatus`] there is no ordering constraint: staff may set any
/// status from any status. The only guarded write is a customer reservation,
/// which must find the table `available` (enforced as a conditional write at
/// the store, see brew-db).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum TableStatus {
    Available,
    Occupied,
    Reserved,
}

impl TableStatus {
    /// Lowercase wire/storage name of the status.
    pub const fn as_str(self) -> &'static str {
        match self {
            TableStatus::Available => "available",
            TableStatus::Occupied => "occupied",
            TableStatus::Reserved => "reserved",
        }
    }
}

impl Default for TableStatus {
    fn default() -> Self {
        TableStatus::Available
    }
}

impl fmt::Display for TableStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Cafe Table
// =============================================================================

/// A physical table in the cafe.
///
/// There is no automatic release: a reserved or occupied table stays that way
/// until a staff override or another explicit change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct CafeTable {
    pub id: String,

    /// Human-facing number, unique and positive.
    pub table_number: i64,

    /// Seat count, positive.
    pub seats: i64,

    pub status: TableStatus,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================
