//! Board identity: which stored board a `(base date, day offset)` session
//! should show, and whether saving it creates or updates a record.
//!
//! Nothing stops two boards with the same pair from being stored (two
//! sessions can both create one). The last one inserted always wins; earlier
//! ones stay in the collection but are never shown again.

use shared::{Board, DateIdentifier};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::storage::{BoardStorage, BoardStoreError};

/// Latest board (by insertion order) stored for `(base, day_offset)`
pub fn find_active(boards: &[Board], base: DateIdentifier, day_offset: u32) -> Option<&Board> {
    boards
        .iter()
        .filter(|b| b.base_date_iso == base && b.day_offset == day_offset)
        .last()
}

/// Whether a session currently showing `current_id` should switch to `candidate`
pub fn should_adopt(candidate: &Board, current_id: Option<&str>) -> bool {
    current_id != Some(candidate.id.as_str())
}

/// How the next save of a session reaches the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveTarget {
    /// First save: append a record under a freshly minted id
    Create { id: String },
    /// The session already owns a stored record
    Update { id: String },
}

impl SaveTarget {
    pub fn for_session(current_id: Option<&str>) -> Self {
        match current_id {
            Some(id) => SaveTarget::Update { id: id.to_string() },
            None => SaveTarget::Create {
                id: Board::generate_id(),
            },
        }
    }

    pub fn id(&self) -> &str {
        match self {
            SaveTarget::Create { id } | SaveTarget::Update { id } => id,
        }
    }
}

#[derive(Clone)]
pub struct BoardIdentityResolver {
    store: Arc<dyn BoardStorage>,
}

impl BoardIdentityResolver {
    pub fn new(store: Arc<dyn BoardStorage>) -> Self {
        Self { store }
    }

    /// Read the collection fresh and pick the active board for the pair
    pub async fn resolve_active(&self, base: DateIdentifier, day_offset: u32) -> Option<Board> {
        let boards = self.store.list_all().await;
        let active = find_active(&boards, base, day_offset).cloned();
        debug!(
            "Resolved {}+{} to {:?} ({} stored boards)",
            base,
            day_offset,
            active.as_ref().map(|b| b.id.as_str()),
            boards.len()
        );
        active
    }

    /// Write `board` according to `target`.
    ///
    /// An update whose record has disappeared from the store (deleted behind
    /// the session's back) is re-created under the same id.
    pub async fn persist(&self, target: &SaveTarget, board: &Board) -> Result<Vec<Board>, BoardStoreError> {
        match target {
            SaveTarget::Create { .. } => self.store.append(board).await,
            SaveTarget::Update { id } => match self.store.replace(board).await {
                Err(BoardStoreError::NotFound(_)) => {
                    warn!("Board {} vanished from the store; re-creating it", id);
                    self.store.append(board).await
                }
                other => other,
            },
        }
    }
}
