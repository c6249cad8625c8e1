//! # Brew POS Application Layer
//!
//! Orchestration for the cafe point-of-sale and table-booking system. The
//! rendering surfaces (staff console, customer self-service) embed this
//! crate; everything they invoke goes through the services here.
//!
//! ## Module Organization
//! ```text
//! brew_pos/
//! ├── lib.rs          ◄─── App handle & bootstrap
//! ├── error.rs        ◄─── ApiError / ErrorCode for the surfaces
//! ├── identity.rs     ◄─── Consumed identity port (current user, sign out)
//! ├── notifier.rs     ◄─── Realtime change fan-out (orders, tables)
//! ├── logging.rs      ◄─── tracing initialization
//! ├── state/
//! │   ├── cart_store.rs ◄─ Durable session-local cart
//! │   └── config.rs     ◄─ Application configuration
//! └── services/
//!     ├── checkout.rs ◄─── Cart → Order transaction
//!     ├── order.rs    ◄─── Status progression, listings
//!     ├── table.rs    ◄─── Booking + staff floor management
//!     ├── menu.rs     ◄─── Menu management + customer browse
//!     └── stats.rs    ◄─── Staff dashboard counters
//! ```
//!
//! ## Shape
//!
//! One [`App`] per process: database pool plus change notifier. Per-session
//! state (the customer's [`state::CartStore`], the
//! [`identity::IdentityProvider`]) is owned by the embedding surface and
//! passed into the service calls that need it. Services are free functions,
//! so each one declares exactly the state it touches.

pub mod error;
pub mod identity;
pub mod logging;
pub mod notifier;
pub mod services;
pub mod state;

use std::time::Duration;

use tracing::info;

use brew_db::{Database, DbConfig};
use error::ApiError;
use notifier::ChangeNotifier;
use state::AppConfig;

/// Process-wide application handle: the shared store and the change
/// notifier every subscriber hangs off.
#[derive(Debug, Clone)]
pub struct App {
    pub db: Database,
    pub notifier: ChangeNotifier,
    store_timeout: Duration,
}

impl App {
    /// Opens the database at the configured path (running migrations) and
    /// wires up the notifier.
    pub async fn bootstrap(config: AppConfig) -> Result<App, ApiError> {
        info!(path = %config.database_path.display(), "Bootstrapping Brew POS");

        let db = Database::new(DbConfig::new(&config.database_path)).await?;

        Ok(App::with_database(db, &config))
    }

    /// Builds an App around an already-open database (used by tests and by
    /// embedders that manage the pool themselves).
    pub fn with_database(db: Database, config: &AppConfig) -> App {
        App {
            db,
            notifier: ChangeNotifier::new(config.notifier_capacity),
            store_timeout: config.store_timeout,
        }
    }

    /// The per-call ceiling applied to store operations, so a hung network
    /// call surfaces as a store error instead of an indefinite spinner.
    pub fn store_timeout(&self) -> Duration {
        self.store_timeout
    }
}
