//! # Dashboard Counters
//!
//! The staff landing page's at-a-glance numbers. Coupled with an `Orders`
//! subscription on the consumer side, they stay live without polling.

use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::services::with_store_timeout;
use crate::App;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// All orders ever placed.
    pub total_orders: i64,
    /// Orders still in the kitchen (pending or preparing).
    pub active_orders: i64,
    pub menu_items: i64,
    pub tables: i64,
}

/// Gathers the dashboard counters.
pub async fn dashboard_stats(app: &App) -> Result<DashboardStats, ApiError> {
    let timeout = app.store_timeout();

    let total_orders = with_store_timeout(timeout, app.db.orders().count()).await?;
    let active_orders = with_store_timeout(timeout, app.db.orders().count_active()).await?;
    let menu_items = with_store_timeout(timeout, app.db.menu().count()).await?;
    let tables = with_store_timeout(timeout, app.db.tables().count()).await?;

    Ok(DashboardStats {
        total_orders,
        active_orders,
        menu_items,
        tables,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::checkout::{place_order, CheckoutRequest};
    use crate::services::menu::{create_item, MenuItemDraft};
    use crate::services::order::advance_order;
    use crate::services::table::{create_table, TableDraft};
    use crate::services::testing::{customer, staff, test_app};
    use crate::state::{CartStore, MemoryCartStorage};
    use brew_core::{OrderStatus, TableStatus};

    #[tokio::test]
    async fn counters_track_the_floor() {
        let app = test_app().await;
        let manager = staff("staff-1");
        let alex = customer("alex-id");

        let latte = create_item(
            &app,
            &manager,
            MenuItemDraft {
                name: "Latte".to_string(),
                description: None,
                category: "Coffee".to_string(),
                price_cents: 450,
                available: true,
            },
        )
        .await
        .unwrap();

        create_table(
            &app,
            &manager,
            TableDraft {
                table_number: 1,
                seats: 2,
                status: TableStatus::Available,
            },
        )
        .await
        .unwrap();

        let cart = CartStore::open(Box::new(MemoryCartStorage::new()));
        cart.add_item(&latte);
        let placed = place_order(
            &app,
            &alex,
            &cart,
            CheckoutRequest {
                customer_name: "Alex".to_string(),
                notes: None,
                table_id: None,
            },
        )
        .await
        .unwrap();

        let stats = dashboard_stats(&app).await.unwrap();
        assert_eq!(
            stats,
            DashboardStats {
                total_orders: 1,
                active_orders: 1,
                menu_items: 1,
                tables: 1,
            }
        );

        // cancelled orders leave the active count but not the total
        advance_order(&app, &manager, &placed.order_id, OrderStatus::Cancelled)
            .await
            .unwrap();
        let stats = dashboard_stats(&app).await.unwrap();
        assert_eq!(stats.total_orders, 1);
        assert_eq!(stats.active_orders, 0);
    }
}
