//! # Services
//!
//! The operations the surfaces invoke. Each service is a module of free
//! functions taking exactly the state it needs: the process-wide
//! [`crate::App`] plus, where relevant, the caller's identity and cart.
//!
//! Shared here: the store-call timeout wrapper and the authority checks.

pub mod checkout;
pub mod menu;
pub mod order;
pub mod stats;
pub mod table;

use std::future::Future;
use std::time::Duration;

use crate::error::ApiError;
use crate::identity::{IdentityProvider, UserIdentity};
use brew_db::DbResult;

/// Wraps a store operation in a timeout so a hung call surfaces as a store
/// error instead of leaving the surface loading indefinitely.
pub(crate) async fn with_store_timeout<T>(
    limit: Duration,
    fut: impl Future<Output = DbResult<T>>,
) -> Result<T, ApiError> {
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result.map_err(ApiError::from),
        Err(_) => Err(ApiError::store("store operation timed out")),
    }
}

/// Resolves the caller's identity, failing with `Unauthenticated` for
/// anonymous sessions.
pub(crate) fn require_user(identity: &dyn IdentityProvider) -> Result<UserIdentity, ApiError> {
    identity.current_user().ok_or_else(ApiError::unauthenticated)
}

/// Resolves the caller's identity and requires the staff role.
pub(crate) fn require_staff(
    identity: &dyn IdentityProvider,
    action: &str,
) -> Result<UserIdentity, ApiError> {
    let user = require_user(identity)?;
    if !user.is_staff() {
        return Err(ApiError::forbidden(action));
    }
    Ok(user)
}

#[cfg(test)]
pub(crate) mod testing {
    //! Shared fixtures for service tests.

    use crate::identity::{Role, SessionIdentity, UserIdentity};
    use crate::state::AppConfig;
    use crate::App;
    use brew_db::{Database, DbConfig};

    /// An App over a fresh in-memory database.
    pub async fn test_app() -> App {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        App::with_database(db, &AppConfig::default())
    }

    pub fn staff(id: &str) -> SessionIdentity {
        SessionIdentity::signed_in(UserIdentity {
            id: id.to_string(),
            role: Role::Staff,
        })
    }

    pub fn customer(id: &str) -> SessionIdentity {
        SessionIdentity::signed_in(UserIdentity {
            id: id.to_string(),
            role: Role::Customer,
        })
    }
}
