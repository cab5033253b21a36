//! Storage Module
//!
//! SQLite-based storage layer with:
//! - Versioned schema migrations applied at open
//! - Separate reader/writer connections
//! - Filtered listing and sentiment aggregation

mod migrations;
mod sqlite;

pub use migrations::MIGRATIONS;
pub use sqlite::{Result, Storage, StorageError};
