use thiserror::Error;

/// Failures of the board collection.
///
/// A missing or unparsable collection is not an error (it reads as empty);
/// these only cover I/O that did not happen and updates with nothing to update.
#[derive(Debug, Error)]
pub enum BoardStoreError {
    #[error("failed to read board collection: {0}")]
    Read(#[source] anyhow::Error),
    #[error("failed to write board collection: {0}")]
    Write(#[source] anyhow::Error),
    #[error("failed to serialize board collection: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("board not found: {0}")]
    NotFound(String),
}
