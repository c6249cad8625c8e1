//! # Repositories
//!
//! One repository per resource collection. Each wraps the shared pool and
//! exposes typed async operations; SQL never leaks out of this module tree.

pub mod menu;
pub mod order;
pub mod table;

pub use menu::MenuRepository;
pub use order::OrderRepository;
pub use table::TableRepository;
