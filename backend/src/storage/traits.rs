//! # Storage Traits
//!
//! Storage abstractions used by the domain layer. The key-value capability is
//! the only thing a platform has to provide; everything board-shaped is built
//! on top of it by [`BoardRepository`](super::BoardRepository).

use anyhow::Result;
use async_trait::async_trait;
use shared::Board;

use super::error::BoardStoreError;

/// Opaque persisted key-value capability.
///
/// Values are whole documents: there is no partial update, and no atomicity
/// across a read followed by a write.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, `None` when the key is absent
    async fn read(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, overwriting any previous value
    async fn write(&self, key: &str, value: &str) -> Result<()>;

    /// Delete `key`. Returns true if a value was removed
    async fn remove(&self, key: &str) -> Result<bool>;
}

/// Operations over the single persisted collection of boards
#[async_trait]
pub trait BoardStorage: Send + Sync {
    /// All boards in insertion order. Never fails: read and decode problems
    /// are logged and yield an empty collection.
    async fn list_all(&self) -> Vec<Board>;

    /// Append a board and return the collection as written
    async fn append(&self, board: &Board) -> Result<Vec<Board>, BoardStoreError>;

    /// Replace every record whose id equals `board.id`.
    /// Fails with [`BoardStoreError::NotFound`] (and writes nothing) when no
    /// record matches.
    async fn replace(&self, board: &Board) -> Result<Vec<Board>, BoardStoreError>;

    /// Remove every record with the given id and return what is left
    async fn remove(&self, id: &str) -> Result<Vec<Board>, BoardStoreError>;

    /// Delete the entire collection
    async fn clear(&self) -> Result<(), BoardStoreError>;
}
