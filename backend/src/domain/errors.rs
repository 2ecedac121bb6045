use shared::Slot;
use thiserror::Error;

use crate::storage::BoardStoreError;

/// Problems the user can fix; the operation is aborted and nothing changes
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please add image before saving.")]
    MissingActivity,
    #[error("Please enter a title.")]
    MissingTitle,
    #[error("Please provide both an image and title.")]
    MissingImage,
    #[error("This board has no {0} slot.")]
    UnsupportedSlot(Slot),
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] BoardStoreError),
}

impl SessionError {
    /// The message to show the user, if this is a validation failure
    pub fn user_message(&self) -> Option<String> {
        match self {
            SessionError::Validation(e) => Some(e.to_string()),
            SessionError::Store(_) => None,
        }
    }
}
