//! # Application Configuration

use std::path::PathBuf;
use std::time::Duration;

/// Configuration for [`crate::App::bootstrap`].
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Path to the SQLite database file.
    pub database_path: PathBuf,

    /// Per-call ceiling on store operations. A persist or fetch that hangs
    /// past this surfaces as a store error instead of leaving the surface
    /// loading forever.
    pub store_timeout: Duration,

    /// Broadcast capacity per notifier channel.
    pub notifier_capacity: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            database_path: PathBuf::from("./brewpos.db"),
            store_timeout: Duration::from_secs(15),
            notifier_capacity: 256,
        }
    }
}

impl AppConfig {
    /// Configuration pointing at a specific database file.
    pub fn with_database_path(path: impl Into<PathBuf>) -> Self {
        AppConfig {
            database_path: path.into(),
            ..AppConfig::default()
        }
    }
}
