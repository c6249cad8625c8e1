//! # Checkout
//!
//! Converts a non-empty cart into one persisted order plus its lines, as a
//! single logical unit.
//!
//! ## Flow
//! ```text
//! validate customer name ──► cart snapshot (non-empty?) ──► resolve identity
//!        │                                                        │
//!        ▼                                                        ▼
//!   ValidationError                                       UnauthenticatedError
//!
//! total from frozen cart prices
//!        │
//!        ▼
//! Order { status: pending } + one OrderLine per cart line
//!        │
//!        ▼
//! create_with_lines()  ◄── ONE transaction: no priced-but-empty order can
//!        │                 ever exist, whatever fails mid-way
//!        ▼
//! clear cart ──► notify Orders/Insert ──► CheckoutResponse
//! ```
//!
//! On any failure the cart and the store are left untouched.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::ApiError;
use crate::identity::IdentityProvider;
use crate::notifier::{ChangeEvent, EntityKind};
use crate::services::{require_user, with_store_timeout};
use crate::state::CartStore;
use crate::App;
use brew_core::validation::{validate_customer_name, validate_notes};
use brew_core::{CoreError, Order, OrderLine, OrderStatus};

/// What the customer submits at checkout, alongside their cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    /// Display name for the order. Required non-empty.
    pub customer_name: String,
    /// Optional special instructions.
    pub notes: Option<String>,
    /// Optional table the order is for.
    pub table_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub order_id: String,
    pub total_cents: i64,
    pub line_count: usize,
}

/// Places an order from the session's cart.
///
/// Preconditions, checked in order: valid customer name, non-empty cart,
/// resolvable identity (anonymous sessions may browse but not check out).
///
/// On success the order total exactly equals the sum of the persisted line
/// subtotals, the cart is empty, and every order subscriber has been
/// signalled.
///
/// There is no idempotency key: retrying after a failure whose write
/// actually landed creates a second order.
pub async fn place_order(
    app: &App,
    identity: &dyn IdentityProvider,
    cart: &CartStore,
    request: CheckoutRequest,
) -> Result<CheckoutResponse, ApiError> {
    debug!("place_order");

    validate_customer_name(&request.customer_name).map_err(CoreError::from)?;
    if let Some(notes) = &request.notes {
        validate_notes(notes).map_err(CoreError::from)?;
    }

    let lines = cart.lines();
    if lines.is_empty() {
        return Err(ApiError::empty_cart());
    }

    let user = require_user(identity)?;

    // prices were frozen when the items entered the cart
    let total = cart.total();
    let order_id = Uuid::new_v4().to_string();
    let now = Utc::now();

    let order = Order {
        id: order_id.clone(),
        customer_name: request.customer_name.trim().to_string(),
        notes: request
            .notes
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty()),
        table_id: request.table_id,
        status: OrderStatus::Pending,
        total_cents: total.cents(),
        created_by: user.id,
        created_at: now,
        updated_at: now,
    };

    let order_lines: Vec<OrderLine> = lines
        .iter()
        .map(|line| OrderLine {
            id: Uuid::new_v4().to_string(),
            order_id: order_id.clone(),
            menu_item_id: line.menu_item_id.clone(),
            name_snapshot: line.name.clone(),
            unit_price_cents: line.price_cents,
            quantity: line.quantity,
            subtotal_cents: line.subtotal().cents(),
            created_at: now,
        })
        .collect();

    with_store_timeout(
        app.store_timeout(),
        app.db.orders().create_with_lines(&order, &order_lines),
    )
    .await?;

    // only after the commit: the selection is now an order
    cart.clear();
    app.notifier
        .notify(ChangeEvent::insert(EntityKind::Orders, &*order_id));

    info!(
        order_id = %order_id,
        total = %total,
        lines = order_lines.len(),
        "Order placed"
    );

    Ok(CheckoutResponse {
        order_id,
        total_cents: total.cents(),
        line_count: order_lines.len(),
    })
}
