//! # Menu Management
//!
//! Straightforward record management: staff maintain the menu, customers
//! browse the available subset. Menu changes don't ride the realtime
//! notifier - browsing picks them up on the next fetch.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::identity::IdentityProvider;
use crate::services::{require_staff, with_store_timeout};
use crate::App;
use brew_core::validation::{validate_category, validate_menu_item_name, validate_price_cents};
use brew_core::{CoreError, MenuItem};

/// Staff input for creating or editing a menu item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemDraft {
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub price_cents: i64,
    pub available: bool,
}

impl MenuItemDraft {
    fn validate(&self) -> Result<(), ApiError> {
        validate_menu_item_name(&self.name).map_err(CoreError::from)?;
        validate_category(&self.category).map_err(CoreError::from)?;
        validate_price_cents(self.price_cents).map_err(CoreError::from)?;
        Ok(())
    }
}

/// The full menu, grouped by category (staff view).
pub async fn list_menu(app: &App) -> Result<Vec<MenuItem>, ApiError> {
    with_store_timeout(app.store_timeout(), app.db.menu().list()).await
}

/// Only available items (customer view).
pub async fn browse_menu(app: &App) -> Result<Vec<MenuItem>, ApiError> {
    with_store_timeout(app.store_timeout(), app.db.menu().list_available()).await
}

/// Staff: adds a menu item.
pub async fn create_item(
    app: &App,
    identity: &dyn IdentityProvider,
    draft: MenuItemDraft,
) -> Result<MenuItem, ApiError> {
    require_staff(identity, "creating a menu item")?;
    draft.validate()?;

    let now = Utc::now();
    let item = MenuItem {
        id: Uuid::new_v4().to_string(),
        name: draft.name.trim().to_string(),
        description: draft.description,
        category: draft.category.trim().to_string(),
        price_cents: draft.price_cents,
        available: draft.available,
        created_at: now,
        updated_at: now,
    };

    with_store_timeout(app.store_timeout(), app.db.menu().insert(&item)).await?;
    info!(name = %item.name, "Menu item created");

    Ok(item)
}

/// Staff: edits a menu item. Historical orders keep their snapshots.
pub async fn update_item(
    app: &App,
    identity: &dyn IdentityProvider,
    item_id: &str,
    draft: MenuItemDraft,
) -> Result<MenuItem, ApiError> {
    require_staff(identity, "editing a menu item")?;
    draft.validate()?;

    let mut item = with_store_timeout(app.store_timeout(), app.db.menu().get_by_id(item_id))
        .await?
        .ok_or_else(|| ApiError::not_found("MenuItem", item_id))?;

    item.name = draft.name.trim().to_string();
    item.description = draft.description;
    item.category = draft.category.trim().to_string();
    item.price_cents = draft.price_cents;
    item.available = draft.available;

    with_store_timeout(app.store_timeout(), app.db.menu().update(&item)).await?;

    Ok(item)
}

/// Staff: removes a menu item. Historical orders are unaffected - their
/// lines carry name and price snapshots.
pub async fn delete_item(
    app: &App,
    identity: &dyn IdentityProvider,
    item_id: &str,
) -> Result<(), ApiError> {
    require_staff(identity, "deleting a menu item")?;

    with_store_timeout(app.store_timeout(), app.db.menu().delete(item_id)).await?;
    info!(item_id = %item_id, "Menu item deleted");

    Ok(())
}
