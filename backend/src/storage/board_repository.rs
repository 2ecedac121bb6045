//! # Board Repository
//!
//! Keeps every board in one JSON array stored under a single key:
//!
//! ```json
//! [
//!   {"id":"…","type":"today","dateISO":"2024-03-10","baseDateISO":"2024-03-10","dayOffset":0,"title":"Today","cards":[…]},
//!   {"id":"…","type":"day","dateISO":"2024-03-11","baseDateISO":"2024-03-10","dayOffset":1,"title":"Monday","cards":[…]}
//! ]
//! ```
//!
//! Every mutation is read-all / modify / write-all. There is no locking across
//! that cycle, so two writers working at the same time can lose an update.
//! Callers keep at most one write per board in flight.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use shared::Board;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::error::BoardStoreError;
use super::traits::{BoardStorage, KeyValueStore};

/// Storage key used when none is configured
pub const DEFAULT_STORAGE_KEY: &str = "allboards";

#[derive(Clone)]
pub struct BoardRepository {
    store: Arc<dyn KeyValueStore>,
    storage_key: String,
}

impl BoardRepository {
    pub fn new(store: Arc<dyn KeyValueStore>, storage_key: impl Into<String>) -> Self {
        Self {
            store,
            storage_key: storage_key.into(),
        }
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// Read the stored records as raw JSON. A missing key or unparsable
    /// content reads as an empty collection; only a failed read is an error.
    ///
    /// Mutations work on these raw records so that anything the `Board`
    /// model cannot decode (or fields it does not know) is written back
    /// unchanged.
    async fn load_records(&self) -> Result<Vec<Value>, BoardStoreError> {
        let raw = self
            .store
            .read(&self.storage_key)
            .await
            .map_err(BoardStoreError::Read)?;

        Ok(match raw {
            Some(text) => self.parse_records(&text),
            None => Vec::new(),
        })
    }

    fn parse_records(&self, text: &str) -> Vec<Value> {
        match serde_json::from_str(text) {
            Ok(records) => records,
            Err(e) => {
                error!("Board collection '{}' is unparsable, treating as empty: {}", self.storage_key, e);
                Vec::new()
            }
        }
    }

    /// Boards that decode; the rest are skipped with a warning
    fn decode(records: &[Value]) -> Vec<Board> {
        records
            .iter()
            .enumerate()
            .filter_map(|(index, record)| match Board::deserialize(record) {
                Ok(board) => Some(board),
                Err(e) => {
                    warn!("Failed to parse board record {}: {}. Skipping.", index, e);
                    None
                }
            })
            .collect()
    }

    async fn persist(&self, records: &[Value]) -> Result<Vec<Board>, BoardStoreError> {
        let text = serde_json::to_string(records)?;
        self.store
            .write(&self.storage_key, &text)
            .await
            .map_err(BoardStoreError::Write)?;
        debug!("Persisted {} records under '{}'", records.len(), self.storage_key);
        Ok(Self::decode(records))
    }
}

fn record_id(record: &Value) -> Option<&str> {
    record.get("id").and_then(Value::as_str)
}

#[async_trait]
impl BoardStorage for BoardRepository {
    async fn list_all(&self) -> Vec<Board> {
        match self.load_records().await {
            Ok(records) => Self::decode(&records),
            Err(e) => {
                error!("Failed to load boards: {}", e);
                Vec::new()
            }
        }
    }

    async fn append(&self, board: &Board) -> Result<Vec<Board>, BoardStoreError> {
        info!("Appending board: {}", board.id);

        let mut records = self.load_records().await?;
        records.push(serde_json::to_value(board)?);
        let boards = self.persist(&records).await?;

        info!("Successfully appended board: {}", board.id);
        Ok(boards)
    }

    async fn replace(&self, board: &Board) -> Result<Vec<Board>, BoardStoreError> {
        info!("Replacing board: {}", board.id);

        let mut records = self.load_records().await?;
        let replacement = serde_json::to_value(board)?;
        let mut matched = 0usize;
        for existing in records
            .iter_mut()
            .filter(|r| record_id(r) == Some(board.id.as_str()))
        {
            *existing = replacement.clone();
            matched += 1;
        }

        if matched == 0 {
            warn!("No stored board with id {}; nothing replaced", board.id);
            return Err(BoardStoreError::NotFound(board.id.clone()));
        }

        let boards = self.persist(&records).await?;
        info!("Successfully replaced board: {}", board.id);
        Ok(boards)
    }

    async fn remove(&self, id: &str) -> Result<Vec<Board>, BoardStoreError> {
        info!("Removing board: {}", id);

        let mut records = self.load_records().await?;
        let before = records.len();
        records.retain(|r| record_id(r) != Some(id));
        let boards = self.persist(&records).await?;

        debug!("Removed {} record(s) with id {}", before - records.len(), id);
        Ok(boards)
    }

    async fn clear(&self) -> Result<(), BoardStoreError> {
        info!("Clearing all boards under '{}'", self.storage_key);
        self.store
            .remove(&self.storage_key)
            .await
            .map_err(BoardStoreError::Write)?;
        Ok(())
    }
}
