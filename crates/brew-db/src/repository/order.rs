//! # Order Repository
//!
//! Database operations for orders and their line items.
//!
//! ## Order Lifecycle
//! ```text
//! 1. CHECKOUT
//!    └── create_with_lines() → Order { status: pending } + N lines,
//!        persisted in ONE transaction: a failure on any line rolls the
//!        order back, so a priced-but-empty order can never exist
//!
//! 2. STAFF PROGRESSION
//!    └── update_status() → conditional UPDATE guarded by the expected
//!        current status; a raced writer loses the compare-and-set and the
//!        caller re-validates against the then-current row
//!
//! 3. HISTORY
//!    └── orders are never deleted; terminal states are retained
//! ```

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use brew_core::{Order, OrderLine, OrderStatus};

const ORDER_COLUMNS: &str = "id, customer_name, notes, table_id, status, total_cents, \
                             created_by, created_at, updated_at";

const LINE_COLUMNS: &str = "id, order_id, menu_item_id, name_snapshot, unit_price_cents, \
                            quantity, subtotal_cents, created_at";

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Persists an order and all of its lines as a single transaction.
    ///
    /// This is the checkout write. Either the order row and every line row
    /// land together, or none of them do - the commit is the only point at
    /// which anything becomes visible to other connections.
    pub async fn create_with_lines(&self, order: &Order, lines: &[OrderLine]) -> DbResult<()> {
        debug!(id = %order.id, lines = lines.len(), "Creating order with lines");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO orders (
                id, customer_name, notes, table_id, status, total_cents,
                created_by, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&order.id)
        .bind(&order.customer_name)
        .bind(&order.notes)
        .bind(&order.table_id)
        .bind(order.status)
        .bind(order.total_cents)
        .bind(&order.created_by)
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&mut *tx)
        .await?;

        for line in lines {
            sqlx::query(
                r#"
                INSERT INTO order_lines (
                    id, order_id, menu_item_id, name_snapshot, unit_price_cents,
                    quantity, subtotal_cents, created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
            )
            .bind(&line.id)
            .bind(&line.order_id)
            .bind(&line.menu_item_id)
            .bind(&line.name_snapshot)
            .bind(line.unit_price_cents)
            .bind(line.quantity)
            .bind(line.subtotal_cents)
            .bind(line.created_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(())
    }

    /// Gets an order by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Order>> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    /// Gets all lines of an order, in insertion order.
    pub async fn get_lines(&self, order_id: &str) -> DbResult<Vec<OrderLine>> {
        let lines = sqlx::query_as::<_, OrderLine>(&format!(
            "SELECT {LINE_COLUMNS} FROM order_lines WHERE order_id = ?1 ORDER BY rowid"
        ))
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    /// Lists all orders, newest first (staff dashboard).
    pub async fn list(&self) -> DbResult<Vec<Order>> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    /// Lists orders placed by one customer, newest first ("my orders").
    pub async fn list_by_creator(&self, created_by: &str) -> DbResult<Vec<Order>> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE created_by = ?1 ORDER BY created_at DESC"
        ))
        .bind(created_by)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    /// Conditionally moves an order's status: the UPDATE only applies when
    /// the row still holds `expected`.
    ///
    /// Returns whether the compare-and-set won. `false` means either the
    /// order doesn't exist or another writer got there first - the caller
    /// re-reads the row to tell the two apart and to re-validate the
    /// transition against the then-current status.
    pub async fn update_status(
        &self,
        id: &str,
        expected: OrderStatus,
        to: OrderStatus,
    ) -> DbResult<bool> {
        debug!(id = %id, from = %expected, to = %to, "Updating order status");

        let now = chrono::Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE orders SET status = ?3, updated_at = ?4
            WHERE id = ?1 AND status = ?2
            "#,
        )
        .bind(id)
        .bind(expected)
        .bind(to)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts all orders (for the dashboard).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Counts orders still in the kitchen: pending or preparing.
    pub async fn count_active(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM orders WHERE status IN ('pending', 'preparing')",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::pool::{Database, DbConfig};
    use chrono::Utc;

    fn order(id: &str, created_by: &str) -> Order {
        let now = Utc::now();
        Order {
            id: id.to_string(),
            customer_name: "Alex".to_string(),
            notes: None,
            table_id: None,
            status: OrderStatus::Pending,
            total_cents: 1200,
            created_by: created_by.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    fn line(id: &str, order_id: &str, name: &str, unit_price: i64, quantity: i64) -> OrderLine {
        OrderLine {
            id: id.to_string(),
            order_id: order_id.to_string(),
            menu_item_id: format!("menu-{id}"),
            name_snapshot: name.to_string(),
            unit_price_cents: unit_price,
            quantity,
            subtotal_cents: unit_price * quantity,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn create_with_lines_persists_everything() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let orders = db.orders();

        let o = order("o1", "user-1");
        let lines = vec![
            line("l1", "o1", "Latte", 450, 2),
            line("l2", "o1", "Muffin", 300, 1),
        ];

        orders.create_with_lines(&o, &lines).await.unwrap();

        let fetched = orders.get_by_id("o1").await.unwrap().unwrap();
        assert_eq!(fetched.status, OrderStatus::Pending);
        assert_eq!(fetched.total_cents, 1200);

        let fetched_lines = orders.get_lines("o1").await.unwrap();
        assert_eq!(fetched_lines.len(), 2);
        assert_eq!(fetched_lines[0].subtotal_cents, 900);
        assert_eq!(fetched_lines[1].subtotal_cents, 300);

        let sum: i64 = fetched_lines.iter().map(|l| l.subtotal_cents).sum();
        assert_eq!(sum, fetched.total_cents);
    }

    #[tokio::test]
    async fn failed_line_rolls_back_the_order() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let orders = db.orders();

        let o = order("o1", "user-1");
        let lines = vec![
            line("l1", "o1", "Latte", 450, 2),
            // violates the quantity >= 1 CHECK constraint
            line("l2", "o1", "Muffin", 300, 0),
        ];

        let err = orders.create_with_lines(&o, &lines).await.unwrap_err();
        assert!(matches!(err, DbError::CheckViolation { .. }));

        // no partial order: neither the order row nor the good line survived
        assert!(orders.get_by_id("o1").await.unwrap().is_none());
        assert_eq!(orders.count().await.unwrap(), 0);
        assert!(orders.get_lines("o1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_status_applies_only_from_expected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let orders = db.orders();
        orders
            .create_with_lines(&order("o1", "user-1"), &[line("l1", "o1", "Latte", 450, 1)])
            .await
            .unwrap();

        let won = orders
            .update_status("o1", OrderStatus::Pending, OrderStatus::Preparing)
            .await
            .unwrap();
        assert!(won);

        // a second writer still holding the stale `pending` view loses
        let won = orders
            .update_status("o1", OrderStatus::Pending, OrderStatus::Cancelled)
            .await
            .unwrap();
        assert!(!won);

        let current = orders.get_by_id("o1").await.unwrap().unwrap();
        assert_eq!(current.status, OrderStatus::Preparing);
    }

    #[tokio::test]
    async fn update_status_on_missing_order_is_lost_cas() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let won = db
            .orders()
            .update_status("ghost", OrderStatus::Pending, OrderStatus::Preparing)
            .await
            .unwrap();
        assert!(!won);
    }

    #[tokio::test]
    async fn listings_filter_and_count() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let orders = db.orders();

        orders
            .create_with_lines(&order("o1", "alice"), &[line("l1", "o1", "Latte", 450, 1)])
            .await
            .unwrap();
        orders
            .create_with_lines(&order("o2", "bob"), &[line("l2", "o2", "Mocha", 500, 1)])
            .await
            .unwrap();
        orders
            .create_with_lines(&order("o3", "alice"), &[line("l3", "o3", "Scone", 350, 1)])
            .await
            .unwrap();

        assert_eq!(orders.list().await.unwrap().len(), 3);

        let mine = orders.list_by_creator("alice").await.unwrap();
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|o| o.created_by == "alice"));

        assert_eq!(orders.count().await.unwrap(), 3);
        assert_eq!(orders.count_active().await.unwrap(), 3);

        orders
            .update_status("o1", OrderStatus::Pending, OrderStatus::Cancelled)
            .await
            .unwrap();
        assert_eq!(orders.count_active().await.unwrap(), 2);
    }
}
