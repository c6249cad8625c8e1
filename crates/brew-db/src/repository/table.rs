//! # Table Repository
//!
//! Database operations for cafe tables.
//!
//! The one interesting write here is [`TableRepository::reserve`]: a
//! customer reservation must be a conditional write, not read-then-write.
//! Two customers racing for the same table both believe it is `available`;
//! the UPDATE's `WHERE status = 'available'` guard decides the winner at
//! apply time, and the loser's statement simply affects zero rows.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use brew_core::{CafeTable, TableStatus};

const TABLE_COLUMNS: &str = "id, table_number, seats, status, created_at, updated_at";

/// Repository for cafe table database operations.
#[derive(Debug, Clone)]
pub struct TableRepository {
    pool: SqlitePool,
}

impl TableRepository {
    /// Creates a new TableRepository.
    pub fn new(pool: SqlitePool) -> Self {
        TableRepository { pool }
    }

    /// Gets a table by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<CafeTable>> {
        let table = sqlx::query_as::<_, CafeTable>(&format!(
            "SELECT {TABLE_COLUMNS} FROM cafe_tables WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(table)
    }

    /// Lists all tables, ordered by table number.
    pub async fn list(&self) -> DbResult<Vec<CafeTable>> {
        let tables = sqlx::query_as::<_, CafeTable>(&format!(
            "SELECT {TABLE_COLUMNS} FROM cafe_tables ORDER BY table_number"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(tables)
    }

    /// Inserts a new table. Fails with a unique violation if the table
    /// number is already taken.
    pub async fn insert(&self, table: &CafeTable) -> DbResult<()> {
        debug!(id = %table.id, number = table.table_number, "Inserting table");

        sqlx::query(
            r#"
            INSERT INTO cafe_tables (
                id, table_number, seats, status, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&table.id)
        .bind(table.table_number)
        .bind(table.seats)
        .bind(table.status)
        .bind(table.created_at)
        .bind(table.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Updates a table's number, seats and status.
    pub async fn update(&self, table: &CafeTable) -> DbResult<()> {
        debug!(id = %table.id, "Updating table");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE cafe_tables SET
                table_number = ?2,
                seats = ?3,
                status = ?4,
                updated_at = ?5
            WHERE id = ?1
            "#,
        )
        .bind(&table.id)
        .bind(table.table_number)
        .bind(table.seats)
        .bind(table.status)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Table", &table.id));
        }

        Ok(())
    }

    /// Deletes a table.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting table");

        let result = sqlx::query("DELETE FROM cafe_tables WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Table", id));
        }

        Ok(())
    }

    /// Attempts to reserve a table: succeeds only if it is still
    /// `available` at apply time.
    ///
    /// Returns whether this caller won. `false` means the table doesn't
    /// exist or was no longer available; the caller re-reads the row to
    /// tell the two apart.
    pub async fn reserve(&self, id: &str) -> DbResult<bool> {
        debug!(id = %id, "Reserving table");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE cafe_tables SET status = ?2, updated_at = ?3
            WHERE id = ?1 AND status = ?4
            "#,
        )
        .bind(id)
        .bind(TableStatus::Reserved)
        .bind(now)
        .bind(TableStatus::Available)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Sets a table's status unconditionally (staff override: manual
    /// occupy, release, or correction).
    pub async fn set_status(&self, id: &str, status: TableStatus) -> DbResult<()> {
        debug!(id = %id, status = %status, "Setting table status");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE cafe_tables SET status = ?2, updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Table", id));
        }

        Ok(())
    }

    /// Counts tables (for the dashboard).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cafe_tables")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::Utc;
    use uuid::Uuid;

    fn table(number: i64) -> CafeTable {
        let now = Utc::now();
        CafeTable {
            id: Uuid::new_v4().to_string(),
            table_number: number,
            seats: 4,
            status: TableStatus::Available,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn insert_list_ordered_by_number() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let tables = db.tables();

        tables.insert(&table(3)).await.unwrap();
        tables.insert(&table(1)).await.unwrap();
        tables.insert(&table(2)).await.unwrap();

        let listed = tables.list().await.unwrap();
        let numbers: Vec<i64> = listed.iter().map(|t| t.table_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn duplicate_table_number_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let tables = db.tables();

        tables.insert(&table(4)).await.unwrap();
        let err = tables.insert(&table(4)).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn reserve_wins_once() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let tables = db.tables();
        let t = table(4);
        tables.insert(&t).await.unwrap();

        assert!(tables.reserve(&t.id).await.unwrap());
        // already reserved: the conditional write finds no available row
        assert!(!tables.reserve(&t.id).await.unwrap());

        let fetched = tables.get_by_id(&t.id).await.unwrap().unwrap();
        assert_eq!(fetched.status, TableStatus::Reserved);
    }

    #[tokio::test]
    async fn concurrent_reserves_have_exactly_one_winner() {
        // file-backed database so both tasks get real pooled connections
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(DbConfig::new(dir.path().join("race.db")))
            .await
            .unwrap();
        let t = table(4);
        db.tables().insert(&t).await.unwrap();

        let (a, b) = {
            let repo_a = db.tables();
            let repo_b = db.tables();
            let id_a = t.id.clone();
            let id_b = t.id.clone();
            tokio::join!(
                tokio::spawn(async move { repo_a.reserve(&id_a).await.unwrap() }),
                tokio::spawn(async move { repo_b.reserve(&id_b).await.unwrap() }),
            )
        };
        let (a, b) = (a.unwrap(), b.unwrap());

        assert!(a ^ b, "exactly one caller must win the reservation");

        let fetched = db.tables().get_by_id(&t.id).await.unwrap().unwrap();
        assert_eq!(fetched.status, TableStatus::Reserved);
    }

    #[tokio::test]
    async fn reserve_missing_table_is_lost() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert!(!db.tables().reserve("ghost").await.unwrap());
    }

    #[tokio::test]
    async fn staff_override_is_unconditional() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let tables = db.tables();
        let t = table(4);
        tables.insert(&t).await.unwrap();

        tables.reserve(&t.id).await.unwrap();
        // staff can release a reserved table directly
        tables.set_status(&t.id, TableStatus::Available).await.unwrap();

        let fetched = tables.get_by_id(&t.id).await.unwrap().unwrap();
        assert_eq!(fetched.status, TableStatus::Available);

        // and occupy it again from any state
        tables.set_status(&t.id, TableStatus::Occupied).await.unwrap();
        let fetched = tables.get_by_id(&t.id).await.unwrap().unwrap();
        assert_eq!(fetched.status, TableStatus::Occupied);
    }

    #[tokio::test]
    async fn update_and_delete() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let tables = db.tables();
        let mut t = table(4);
        tables.insert(&t).await.unwrap();

        t.seats = 6;
        t.status = TableStatus::Occupied;
        tables.update(&t).await.unwrap();

        let fetched = tables.get_by_id(&t.id).await.unwrap().unwrap();
        assert_eq!(fetched.seats, 6);
        assert_eq!(fetched.status, TableStatus::Occupied);

        tables.delete(&t.id).await.unwrap();
        assert!(tables.get_by_id(&t.id).await.unwrap().is_none());
        assert!(matches!(
            tables.delete(&t.id).await.unwrap_err(),
            DbError::NotFound { .. }
        ));
    }
}
