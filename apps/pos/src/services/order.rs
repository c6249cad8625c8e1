//! # Order Lifecycle
//!
//! Staff-driven status progression plus the order listings the two surfaces
//! render.
//!
//! ## Racing writers
//! Two staff members may try to move the same order at once. The rule:
//! whichever write lands first wins, and the loser is re-judged against the
//! *then-current* status, never a stale client-held one. Concretely,
//! [`advance_order`] re-reads the live row, validates the edge, and applies
//! a compare-and-set guarded by the status it just read; losing the
//! compare-and-set restarts the read-validate-apply cycle, so the loser
//! either finds its move legal from the new status or fails with an
//! illegal-transition error.

use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::identity::IdentityProvider;
use crate::notifier::{ChangeEvent, EntityKind};
use crate::services::{require_staff, require_user, with_store_timeout};
use crate::App;
use brew_core::{Order, OrderLine, OrderStatus};

/// Bound on read-validate-apply cycles under contention. Each retry means
/// another writer moved the order between our read and our write; with a
/// five-state graph that cannot happen many times.
const MAX_TRANSITION_ATTEMPTS: usize = 3;

/// Moves an order to `target`, enforcing the transition graph against the
/// live status. Staff only; customers observe.
pub async fn advance_order(
    app: &App,
    identity: &dyn IdentityProvider,
    order_id: &str,
    target: OrderStatus,
) -> Result<Order, ApiError> {
    require_staff(identity, "advancing an order")?;

    debug!(order_id = %order_id, target = %target, "advance_order");

    for _ in 0..MAX_TRANSITION_ATTEMPTS {
        let current = with_store_timeout(app.store_timeout(), app.db.orders().get_by_id(order_id))
            .await?
            .ok_or_else(|| ApiError::not_found("Order", order_id))?;

        // judge the edge against the status we just read...
        current.status.validate_transition(target)?;

        // ...and only apply if the row still holds it
        let won = with_store_timeout(
            app.store_timeout(),
            app.db.orders().update_status(order_id, current.status, target),
        )
        .await?;

        if won {
            app.notifier
                .notify(ChangeEvent::update(EntityKind::Orders, order_id));
            info!(order_id = %order_id, from = %current.status, to = %target, "Order advanced");

            let updated =
                with_store_timeout(app.store_timeout(), app.db.orders().get_by_id(order_id))
                    .await?
                    .ok_or_else(|| ApiError::not_found("Order", order_id))?;
            return Ok(updated);
        }

        warn!(order_id = %order_id, "Lost status race, re-reading");
    }

    Err(ApiError::store(format!(
        "order {order_id} kept changing concurrently, giving up"
    )))
}

/// All orders, newest first (staff dashboard).
pub async fn list_orders(app: &App) -> Result<Vec<Order>, ApiError> {
    with_store_timeout(app.store_timeout(), app.db.orders().list()).await
}

/// The caller's own orders, newest first ("my orders" view).
pub async fn my_orders(
    app: &App,
    identity: &dyn IdentityProvider,
) -> Result<Vec<Order>, ApiError> {
    let user = require_user(identity)?;
    with_store_timeout(app.store_timeout(), app.db.orders().list_by_creator(&user.id)).await
}

/// One order with its lines.
pub async fn get_order(app: &App, order_id: &str) -> Result<(Order, Vec<OrderLine>), ApiError> {
    let order = with_store_timeout(app.store_timeout(), app.db.orders().get_by_id(order_id))
        .await?
        .ok_or_else(|| ApiError::not_found("Order", order_id))?;
    let lines = with_store_timeout(app.store_timeout(), app.db.orders().get_lines(order_id)).await?;
    Ok((order, lines))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::services::testing::{customer, staff, test_app};
    use chrono::Utc;
    use std::sync::Arc;

    async fn seed_order(app: &App, id: &str, created_by: &str) {
        let now = Utc::now();
        let order = Order {
            id: id.to_string(),
            customer_name: "Alex".to_string(),
            notes: None,
            table_id: None,
            status: OrderStatus::Pending,
            total_cents: 450,
            created_by: created_by.to_string(),
            created_at: now,
            updated_at: now,
        };
        let line = OrderLine {
            id: format!("{id}-l1"),
            order_id: id.to_string(),
            menu_item_id: "m1".to_string(),
            name_snapshot: "Latte".to_string(),
            unit_price_cents: 450,
            quantity: 1,
            subtotal_cents: 450,
            created_at: now,
        };
        app.db.orders().create_with_lines(&order, &[line]).await.unwrap();
    }

    #[tokio::test]
    async fn staff_walk_the_full_graph() {
        let app = test_app().await;
        let barista = staff("staff-1");
        seed_order(&app, "o1", "alex-id").await;

        let mut subscription = app.notifier.subscribe(EntityKind::Orders);

        for target in [OrderStatus::Preparing, OrderStatus::Ready, OrderStatus::Completed] {
            let order = advance_order(&app, &barista, "o1", target).await.unwrap();
            assert_eq!(order.status, target);
            assert_eq!(
                subscription.recv().await.unwrap(),
                ChangeEvent::update(EntityKind::Orders, "o1")
            );
        }

        let live = app.db.orders().get_by_id("o1").await.unwrap().unwrap();
        assert_eq!(live.status, OrderStatus::Completed);
    }

    #[tokio::test]
    async fn ready_orders_cannot_be_cancelled() {
        let app = test_app().await;
        let barista = staff("staff-1");
        seed_order(&app, "o1", "alex-id").await;

        advance_order(&app, &barista, "o1", OrderStatus::Preparing).await.unwrap();
        advance_order(&app, &barista, "o1", OrderStatus::Ready).await.unwrap();

        let err = advance_order(&app, &barista, "o1", OrderStatus::Cancelled)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::IllegalTransition);

        // the failed attempt left the status unchanged
        let live = app.db.orders().get_by_id("o1").await.unwrap().unwrap();
        assert_eq!(live.status, OrderStatus::Ready);
    }

    #[tokio::test]
    async fn customers_cannot_advance_orders() {
        let app = test_app().await;
        let viewer = customer("alex-id");
        seed_order(&app, "o1", "alex-id").await;

        let err = advance_order(&app, &viewer, "o1", OrderStatus::Preparing)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn missing_order_is_not_found() {
        let app = test_app().await;
        let barista = staff("staff-1");

        let err = advance_order(&app, &barista, "ghost", OrderStatus::Preparing)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn raced_writer_is_judged_against_the_live_status() {
        let app = test_app().await;
        let barista = staff("staff-1");
        seed_order(&app, "o1", "alex-id").await;

        // writer A completes the progression while writer B still believes
        // the order is pending
        advance_order(&app, &barista, "o1", OrderStatus::Preparing).await.unwrap();

        // B's cancel is legal from `preparing`, so it wins on re-validation
        let order = advance_order(&app, &barista, "o1", OrderStatus::Cancelled)
            .await
            .unwrap();
        assert_eq!(order.status, OrderStatus::Cancelled);

        // but a further move is judged against the terminal live status
        let err = advance_order(&app, &barista, "o1", OrderStatus::Completed)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::IllegalTransition);
    }

    #[tokio::test]
    async fn concurrent_advances_produce_one_winner() {
        let app = Arc::new(test_app().await);
        seed_order(&app, "o1", "alex-id").await;

        // both baristas try to take pending → preparing at once
        let (a, b) = {
            let app_a = app.clone();
            let app_b = app.clone();
            tokio::join!(
                tokio::spawn(async move {
                    advance_order(&app_a, &staff("staff-1"), "o1", OrderStatus::Preparing).await
                }),
                tokio::spawn(async move {
                    advance_order(&app_b, &staff("staff-2"), "o1", OrderStatus::Preparing).await
                }),
            )
        };
        let (a, b) = (a.unwrap(), b.unwrap());

        // exactly one claims the transition; the loser re-validates against
        // `preparing`, for which another `preparing` is not an edge
        assert!(a.is_ok() ^ b.is_ok());
        let loser = if a.is_err() { a } else { b };
        assert_eq!(loser.unwrap_err().code, ErrorCode::IllegalTransition);

        let live = app.db.orders().get_by_id("o1").await.unwrap().unwrap();
        assert_eq!(live.status, OrderStatus::Preparing);
    }

    #[tokio::test]
    async fn listings_and_detail() {
        let app = test_app().await;
        seed_order(&app, "o1", "alice").await;
        seed_order(&app, "o2", "bob").await;
        seed_order(&app, "o3", "alice").await;

        assert_eq!(list_orders(&app).await.unwrap().len(), 3);

        let alice = customer("alice");
        let mine = my_orders(&app, &alice).await.unwrap();
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|o| o.created_by == "alice"));

        let (order, lines) = get_order(&app, "o1").await.unwrap();
        assert_eq!(order.id, "o1");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].name_snapshot, "Latte");

        let err = my_orders(&app, &crate::identity::SessionIdentity::anonymous())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Unauthenticated);
    }
}
