//! # Storage Module
//!
//! Persistence for boards. The platform only has to supply a key-value
//! capability ([`KeyValueStore`]); the board collection lives as one JSON
//! array under a single key and is managed by [`BoardRepository`].
//!
//! ## Backends
//!
//! - **SQLite**: `key_values` table in `nownext.db` (default)
//! - **File**: one `<key>.json` document per key, atomic temp-file writes
//! - **Memory**: process-local, for previews and tests

pub mod board_repository;
pub mod error;
pub mod file;
pub mod memory;
pub mod sqlite;
pub mod traits;

#[cfg(test)]
pub mod test_utils;

pub use board_repository::{BoardRepository, DEFAULT_STORAGE_KEY};
pub use error::BoardStoreError;
pub use file::FileKeyValueStore;
pub use memory::MemoryKeyValueStore;
pub use sqlite::SqliteKeyValueStore;
pub use traits::{BoardStorage, KeyValueStore};
