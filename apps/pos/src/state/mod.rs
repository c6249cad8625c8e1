//! # Session & Application State
//!
//! - [`cart_store`]: the customer's durable, session-local cart
//! - [`config`]: application configuration
//!
//! Per-session state is owned by the embedding surface and passed into the
//! services that need it; only the database pool and the notifier are
//! process-wide (see [`crate::App`]).

pub mod cart_store;
pub mod config;

pub use cart_store::{CartStorage, CartStore, FileCartStorage, MemoryCartStorage};
pub use config::AppConfig;
