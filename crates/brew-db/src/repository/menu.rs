//! # Menu Repository
//!
//! Database operations for menu items: straightforward record management.
//! Customers read the available subset; staff manage the full list.
//!
//! Deleting a menu item is a hard delete, matching the staff console's
//! behavior. Historical orders are unaffected because order lines carry
//! name/price snapshots and no foreign key on the menu item.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use brew_core::MenuItem;

const MENU_COLUMNS: &str =
    "id, name, description, category, price_cents, available, created_at, updated_at";

/// Repository for menu item database operations.
#[derive(Debug, Clone)]
pub struct MenuRepository {
    pool: SqlitePool,
}

impl MenuRepository {
    /// Creates a new MenuRepository.
    pub fn new(pool: SqlitePool) -> Self {
        MenuRepository { pool }
    }

    /// Gets a menu item by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<MenuItem>> {
        let item = sqlx::query_as::<_, MenuItem>(&format!(
            "SELECT {MENU_COLUMNS} FROM menu_items WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    /// Lists the whole menu (staff view), grouped by category.
    pub async fn list(&self) -> DbResult<Vec<MenuItem>> {
        let items = sqlx::query_as::<_, MenuItem>(&format!(
            "SELECT {MENU_COLUMNS} FROM menu_items ORDER BY category, name"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Lists only available items (customer view), grouped by category.
    pub async fn list_available(&self) -> DbResult<Vec<MenuItem>> {
        let items = sqlx::query_as::<_, MenuItem>(&format!(
            "SELECT {MENU_COLUMNS} FROM menu_items WHERE available = 1 ORDER BY category, name"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Inserts a new menu item.
    pub async fn insert(&self, item: &MenuItem) -> DbResult<()> {
        debug!(id = %item.id, name = %item.name, "Inserting menu item");

        sqlx::query(
            r#"
            INSERT INTO menu_items (
                id, name, description, category, price_cents, available,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&item.id)
        .bind(&item.name)
        .bind(&item.description)
        .bind(&item.category)
        .bind(item.price_cents)
        .bind(item.available)
        .bind(item.created_at)
        .bind(item.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Updates an existing menu item.
    pub async fn update(&self, item: &MenuItem) -> DbResult<()> {
        debug!(id = %item.id, "Updating menu item");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE menu_items SET
                name = ?2,
                description = ?3,
                category = ?4,
                price_cents = ?5,
                available = ?6,
                updated_at = ?7
            WHERE id = ?1
            "#,
        )
        .bind(&item.id)
        .bind(&item.name)
        .bind(&item.description)
        .bind(&item.category)
        .bind(item.price_cents)
        .bind(item.available)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("MenuItem", &item.id));
        }

        Ok(())
    }

    /// Deletes a menu item.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting menu item");

        let result = sqlx::query("DELETE FROM menu_items WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("MenuItem", id));
        }

        Ok(())
    }

    /// Counts menu items (for the dashboard).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM menu_items")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use brew_core::MenuItem;
    use chrono::Utc;
    use uuid::Uuid;

    fn latte() -> MenuItem {
        let now = Utc::now();
        MenuItem {
            id: Uuid::new_v4().to_string(),
            name: "Latte".to_string(),
            description: Some("Double shot, steamed milk".to_string()),
            category: "Coffee".to_string(),
            price_cents: 450,
            available: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn insert_and_get_roundtrip() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let item = latte();

        db.menu().insert(&item).await.unwrap();

        let fetched = db.menu().get_by_id(&item.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Latte");
        assert_eq!(fetched.price_cents, 450);
        assert!(fetched.available);
    }

    #[tokio::test]
    async fn list_available_filters_and_orders() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let menu = db.menu();

        let mut espresso = latte();
        espresso.name = "Espresso".to_string();
        espresso.price_cents = 250;

        let mut day_old_scone = latte();
        day_old_scone.name = "Scone".to_string();
        day_old_scone.category = "Pastries".to_string();
        day_old_scone.available = false;

        menu.insert(&latte()).await.unwrap();
        menu.insert(&espresso).await.unwrap();
        menu.insert(&day_old_scone).await.unwrap();

        let visible = menu.list_available().await.unwrap();
        assert_eq!(visible.len(), 2);
        // ordered by category then name
        assert_eq!(visible[0].name, "Espresso");
        assert_eq!(visible[1].name, "Latte");

        let all = menu.list().await.unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn update_changes_fields() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut item = latte();
        db.menu().insert(&item).await.unwrap();

        item.price_cents = 475;
        item.available = false;
        db.menu().update(&item).await.unwrap();

        let fetched = db.menu().get_by_id(&item.id).await.unwrap().unwrap();
        assert_eq!(fetched.price_cents, 475);
        assert!(!fetched.available);
    }

    #[tokio::test]
    async fn update_missing_item_is_not_found() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let err = db.menu().update(&latte()).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn delete_removes_row() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let item = latte();
        db.menu().insert(&item).await.unwrap();

        db.menu().delete(&item.id).await.unwrap();
        assert!(db.menu().get_by_id(&item.id).await.unwrap().is_none());
        assert_eq!(db.menu().count().await.unwrap(), 0);
    }
}
