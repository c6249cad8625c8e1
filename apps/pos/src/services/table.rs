//! # Table Booking & Floor Management
//!
//! Customers reserve; staff create, edit, delete, and override status. A
//! reservation is a conditional write decided at the store (see
//! `brew_db::repository::table`), so two customers racing for the same
//! table get exactly one winner.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::ApiError;
use crate::identity::IdentityProvider;
use crate::notifier::{ChangeEvent, EntityKind};
use crate::services::{require_staff, with_store_timeout};
use crate::App;
use brew_core::validation::{validate_seats, validate_table_number};
use brew_core::{CafeTable, CoreError, TableStatus};

/// Staff input for creating or editing a table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableDraft {
    pub table_number: i64,
    pub seats: i64,
    pub status: TableStatus,
}

impl TableDraft {
    fn validate(&self) -> Result<(), ApiError> {
        validate_table_number(self.table_number).map_err(CoreError::from)?;
        validate_seats(self.seats).map_err(CoreError::from)?;
        Ok(())
    }
}

/// All tables, ordered by number (both the staff board and the customer
/// booking view render this).
pub async fn list_tables(app: &App) -> Result<Vec<CafeTable>, ApiError> {
    with_store_timeout(app.store_timeout(), app.db.tables().list()).await
}

/// Customer reservation: succeeds only if the table is still `available`
/// at apply time, otherwise fails with `TableUnavailableError`.
pub async fn reserve_table(app: &App, table_id: &str) -> Result<CafeTable, ApiError> {
    debug!(table_id = %table_id, "reserve_table");

    let won = with_store_timeout(app.store_timeout(), app.db.tables().reserve(table_id)).await?;

    let table = with_store_timeout(app.store_timeout(), app.db.tables().get_by_id(table_id))
        .await?
        .ok_or_else(|| ApiError::not_found("Table", table_id))?;

    if !won {
        return Err(ApiError::table_unavailable(table.table_number, table.status));
    }

    app.notifier
        .notify(ChangeEvent::update(EntityKind::Tables, table_id));
    info!(table_number = table.table_number, "Table reserved");

    Ok(table)
}

/// Staff override: sets a table's status unconditionally (manual occupy,
/// release, or correction).
pub async fn set_table_status(
    app: &App,
    identity: &dyn IdentityProvider,
    table_id: &str,
    status: TableStatus,
) -> Result<(), ApiError> {
    require_staff(identity, "changing table status")?;

    with_store_timeout(app.store_timeout(), app.db.tables().set_status(table_id, status)).await?;

    app.notifier
        .notify(ChangeEvent::update(EntityKind::Tables, table_id));
    info!(table_id = %table_id, status = %status, "Table status set");

    Ok(())
}

/// Staff: adds a table to the floor plan.
pub async fn create_table(
    app: &App,
    identity: &dyn IdentityProvider,
    draft: TableDraft,
) -> Result<CafeTable, ApiError> {
    require_staff(identity, "creating a table")?;
    draft.validate()?;

    let now = Utc::now();
    let table = CafeTable {
        id: Uuid::new_v4().to_string(),
        table_number: draft.table_number,
        seats: draft.seats,
        status: draft.status,
        created_at: now,
        updated_at: now,
    };

    with_store_timeout(app.store_timeout(), app.db.tables().insert(&table)).await?;

    app.notifier
        .notify(ChangeEvent::insert(EntityKind::Tables, &*table.id));
    info!(table_number = table.table_number, "Table created");

    Ok(table)
}

/// Staff: edits a table's number, seats, or status.
pub async fn update_table(
    app: &App,
    identity: &dyn IdentityProvider,
    table_id: &str,
    draft: TableDraft,
) -> Result<CafeTable, ApiError> {
    require_staff(identity, "editing a table")?;
    draft.validate()?;

    let mut table = with_store_timeout(app.store_timeout(), app.db.tables().get_by_id(table_id))
        .await?
        .ok_or_else(|| ApiError::not_found("Table", table_id))?;

    table.table_number = draft.table_number;
    table.seats = draft.seats;
    table.status = draft.status;

    with_store_timeout(app.store_timeout(), app.db.tables().update(&table)).await?;

    app.notifier
        .notify(ChangeEvent::update(EntityKind::Tables, table_id));

    Ok(table)
}

/// Staff: removes a table from the floor plan.
pub async fn delete_table(
    app: &App,
    identity: &dyn IdentityProvider,
    table_id: &str,
) -> Result<(), ApiError> {
    require_staff(identity, "deleting a table")?;

    with_store_timeout(app.store_timeout(), app.db.tables().delete(table_id)).await?;

    app.notifier
        .notify(ChangeEvent::delete(EntityKind::Tables, table_id));
    info!(table_id = %table_id, "Table deleted");

    Ok(())
}
