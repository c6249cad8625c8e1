//! # Cart Math
//!
//! The pure, in-memory shape of a customer's pending selection.
//!
//! A cart is session-local and never shared: it lives in client storage until
//! checkout converts it into an order. This module holds only the math and
//! invariants; durability (the serialized slot) is an apps/pos concern with
//! an injected storage port.
//!
//! ## Invariants
//! - Lines are unique by menu item id; adding the same item again increments
//!   its quantity.
//! - Quantity is always in `1..=MAX_LINE_QUANTITY`. A decrement can never
//!   reach 0 - removal is the only way out of the cart.
//! - Name and price are frozen at add time (snapshot pattern), so a menu
//!   edit mid-browse never changes what the customer sees or pays.

use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::types::MenuItem;
use crate::MAX_LINE_QUANTITY;

/// A line in the cart.
///
/// `menu_item_id` doubles as the line id: one line per menu item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub menu_item_id: String,

    /// Menu item name at add time (frozen).
    pub name: String,

    /// Unit price in cents at add time (frozen).
    pub price_cents: i64,

    /// Quantity, always >= 1.
    pub quantity: i64,
}

impl CartLine {
    /// Line subtotal (unit price × quantity).
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.price_cents).multiply_quantity(self.quantity)
    }
}

/// The customer's pending selection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { lines: Vec::new() }
    }

    /// Adds one unit of a menu item.
    ///
    /// If the item is already in the cart its quantity increments (clamped
    /// to [`MAX_LINE_QUANTITY`]); otherwise a new line with quantity 1 is
    /// inserted with the item's current name and price frozen in.
    pub fn add_item(&mut self, item: &MenuItem) {
        if let Some(line) = self.line_mut(&item.id) {
            line.quantity = (line.quantity + 1).min(MAX_LINE_QUANTITY);
            return;
        }

        self.lines.push(CartLine {
            menu_item_id: item.id.clone(),
            name: item.name.clone(),
            price_cents: item.price_cents,
            quantity: 1,
        });
    }

    /// Applies a quantity delta to a line, flooring at 1.
    ///
    /// `set_quantity(id, -100)` leaves the line at quantity 1; removal is a
    /// separate, explicit operation. A missing line id is a no-op.
    pub fn set_quantity(&mut self, line_id: &str, delta: i64) {
        if let Some(line) = self.line_mut(line_id) {
            line.quantity = (line.quantity + delta).clamp(1, MAX_LINE_QUANTITY);
        }
    }

    /// Removes a line. A missing line id is a no-op.
    pub fn remove_item(&mut self, line_id: &str) {
        self.lines.retain(|l| l.menu_item_id != line_id);
    }

    /// Empties the cart. Called after a successful checkout.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of line subtotals. Pure, no side effects.
    pub fn total(&self) -> Money {
        self.lines.iter().map(|l| l.subtotal()).sum()
    }

    /// The lines, in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Whether the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn line_mut(&mut self, line_id: &str) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|l| l.menu_item_id == line_id)
    }
}
