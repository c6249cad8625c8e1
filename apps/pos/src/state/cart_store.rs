//! # Cart Store
//!
//! The customer's pending selection, durable across a reload of the
//! surface but invisible to the server until checkout.
//!
//! ## Design
//! The store owns a pure [`Cart`] behind a mutex and an injected
//! [`CartStorage`] port holding one serialized JSON slot. Every mutation
//! rewrites the full snapshot; construction restores from it. The port is
//! synchronous - it models client-local storage, not a network call - and
//! the in-memory implementation makes the store fully testable.
//!
//! The store is the single source of truth for cart contents; the surface
//! never keeps parallel state. A corrupt or unreadable slot is discarded
//! with a warning and the session starts with an empty cart, matching how a
//! bad client-storage value behaves in practice.
//!
//! Persistence failures are logged, not surfaced: the in-memory cart stays
//! authoritative for the session and the next successful mutation rewrites
//! the whole snapshot anyway.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::{debug, warn};

use brew_core::{Cart, CartLine, MenuItem, Money};

/// The name of the client-local slot holding the serialized cart.
const CART_SLOT: &str = "cart";

/// Client-local persistence port: one named slot, read and written
/// synchronously.
pub trait CartStorage: Send + Sync {
    /// Reads the slot. `Ok(None)` when nothing was ever saved.
    fn load(&self) -> io::Result<Option<String>>;

    /// Replaces the slot with a new snapshot.
    fn save(&self, snapshot: &str) -> io::Result<()>;
}

/// In-memory slot, for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryCartStorage {
    slot: Mutex<Option<String>>,
}

impl MemoryCartStorage {
    pub fn new() -> Self {
        MemoryCartStorage::default()
    }
}

impl CartStorage for MemoryCartStorage {
    fn load(&self) -> io::Result<Option<String>> {
        Ok(self.slot.lock().expect("cart slot mutex poisoned").clone())
    }

    fn save(&self, snapshot: &str) -> io::Result<()> {
        *self.slot.lock().expect("cart slot mutex poisoned") = Some(snapshot.to_string());
        Ok(())
    }
}

/// File-backed slot: `<dir>/cart.json`.
#[derive(Debug)]
pub struct FileCartStorage {
    path: PathBuf,
}

impl FileCartStorage {
    /// Stores the slot inside `dir`, creating the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileCartStorage {
            path: dir.into().join(format!("{CART_SLOT}.json")),
        }
    }
}

impl CartStorage for FileCartStorage {
    fn load(&self) -> io::Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn save(&self, snapshot: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, snapshot)
    }
}

/// The durable cart store.
pub struct CartStore {
    cart: Mutex<Cart>,
    storage: Box<dyn CartStorage>,
}

impl CartStore {
    /// Opens the store, restoring the cart from the storage slot.
    pub fn open(storage: Box<dyn CartStorage>) -> Self {
        let cart = match storage.load() {
            Ok(Some(snapshot)) => match serde_json::from_str::<Cart>(&snapshot) {
                Ok(cart) => {
                    debug!(lines = cart.line_count(), "Cart restored from storage");
                    cart
                }
                Err(e) => {
                    warn!("Discarding corrupt cart snapshot: {e}");
                    Cart::new()
                }
            },
            Ok(None) => Cart::new(),
            Err(e) => {
                warn!("Cart storage unreadable, starting empty: {e}");
                Cart::new()
            }
        };

        CartStore {
            cart: Mutex::new(cart),
            storage,
        }
    }

    /// Adds one unit of a menu item (insert or increment), persisting the
    /// new snapshot.
    pub fn add_item(&self, item: &MenuItem) {
        self.mutate(|cart| cart.add_item(item));
    }

    /// Applies a quantity delta to a line, flooring at 1; persists.
    /// A missing line id is a no-op.
    pub fn set_quantity(&self, line_id: &str, delta: i64) {
        self.mutate(|cart| cart.set_quantity(line_id, delta));
    }

    /// Removes a line; persists. A missing line id is a no-op.
    pub fn remove_item(&self, line_id: &str) {
        self.mutate(|cart| cart.remove_item(line_id));
    }

    /// Empties the cart; persists. Called after a successful checkout.
    pub fn clear(&self) {
        self.mutate(|cart| cart.clear());
    }

    /// Sum of line subtotals. Pure, no side effects.
    pub fn total(&self) -> Money {
        self.lock().total()
    }

    /// A copy of the current lines, in insertion order.
    pub fn lines(&self) -> Vec<CartLine> {
        self.lock().lines().to_vec()
    }

    /// Whether the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Cart> {
        self.cart.lock().expect("cart mutex poisoned")
    }

    fn mutate(&self, f: impl FnOnce(&mut Cart)) {
        let mut cart = self.lock();
        f(&mut cart);
        self.persist(&cart);
    }

    fn persist(&self, cart: &Cart) {
        let snapshot = match serde_json::to_string(cart) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("Failed to serialize cart snapshot: {e}");
                return;
            }
        };
        if let Err(e) = self.storage.save(&snapshot) {
            warn!("Failed to persist cart snapshot: {e}");
        }
    }
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("lines", &self.lock().line_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::sync::Arc;

    fn item(id: &str, name: &str, price_cents: i64) -> MenuItem {
        MenuItem {
            id: id.to_string(),
            name: name.to_string(),
            description: None,
            category: "Coffee".to_string(),
            price_cents,
            available: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    /// Shared handle so a "reload" can reopen the same slot.
    #[derive(Clone, Default)]
    struct SharedStorage(Arc<MemoryCartStorage>);

    impl CartStorage for SharedStorage {
        fn load(&self) -> io::Result<Option<String>> {
            self.0.load()
        }
        fn save(&self, snapshot: &str) -> io::Result<()> {
            self.0.save(snapshot)
        }
    }

    #[tokio::test]
    async fn cart_survives_a_reload() {
        let storage = SharedStorage::default();

        let store = CartStore::open(Box::new(storage.clone()));
        store.add_item(&item("1", "Latte", 450));
        store.add_item(&item("1", "Latte", 450));
        store.add_item(&item("2", "Muffin", 300));

        // the surface reloads: a fresh store over the same slot
        let reloaded = CartStore::open(Box::new(storage));
        assert_eq!(reloaded.lines().len(), 2);
        assert_eq!(reloaded.total().cents(), 1200);
        assert_eq!(reloaded.lines()[0].quantity, 2);
    }

    #[tokio::test]
    async fn clear_persists_the_empty_cart() {
        let storage = SharedStorage::default();

        let store = CartStore::open(Box::new(storage.clone()));
        store.add_item(&item("1", "Latte", 450));
        store.clear();

        let reloaded = CartStore::open(Box::new(storage));
        assert!(reloaded.is_empty());
    }

    #[tokio::test]
    async fn corrupt_snapshot_starts_empty() {
        let storage = SharedStorage::default();
        storage.save("{not json").unwrap();

        let store = CartStore::open(Box::new(storage));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn quantity_floor_applies_through_the_store() {
        let store = CartStore::open(Box::new(MemoryCartStorage::new()));
        store.add_item(&item("1", "Latte", 450));

        store.set_quantity("1", -100);
        assert_eq!(store.lines()[0].quantity, 1);

        store.remove_item("1");
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn file_storage_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = CartStore::open(Box::new(FileCartStorage::new(dir.path())));
        store.add_item(&item("1", "Latte", 450));

        let reloaded = CartStore::open(Box::new(FileCartStorage::new(dir.path())));
        assert_eq!(reloaded.total().cents(), 450);
    }
}
