//! Single-use result channel between a board slot and the activity picker.
//!
//! The board asks for an activity with [`request_activity`] and awaits the
//! returned [`PendingSelection`]; the picker gets the [`PickerTicket`].
//! Fulfilling consumes the ticket, so a selection can be delivered at most
//! once, and dropping it unanswered reads as a cancel.

use shared::{Activity, Slot};
use tokio::sync::oneshot;
use tracing::{debug, warn};
use uuid::Uuid;

use super::catalog::CatalogEntry;

/// An activity chosen for a slot
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub slot: Slot,
    pub activity: Activity,
}

#[derive(Debug)]
pub struct PickerTicket {
    correlation_id: Uuid,
    slot: Slot,
    sender: oneshot::Sender<Selection>,
}

#[derive(Debug)]
pub struct PendingSelection {
    correlation_id: Uuid,
    slot: Slot,
    receiver: oneshot::Receiver<Selection>,
}

/// Open a picker request for `slot`
pub fn request_activity(slot: Slot) -> (PickerTicket, PendingSelection) {
    let correlation_id = Uuid::new_v4();
    let (sender, receiver) = oneshot::channel();
    debug!("Opened picker request {} for {}", correlation_id, slot);
    (
        PickerTicket {
            correlation_id,
            slot,
            sender,
        },
        PendingSelection {
            correlation_id,
            slot,
            receiver,
        },
    )
}

impl PickerTicket {
    pub fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    pub fn slot(&self) -> Slot {
        self.slot
    }

    /// Deliver `activity`. Returns false if the requesting board is gone.
    pub fn fulfil(self, activity: Activity) -> bool {
        let selection = Selection {
            slot: self.slot,
            activity,
        };
        match self.sender.send(selection) {
            Ok(()) => true,
            Err(_) => {
                warn!("No board waiting on picker request {}", self.correlation_id);
                false
            }
        }
    }

    pub fn fulfil_from_catalog(self, entry: &CatalogEntry) -> bool {
        self.fulfil(entry.to_activity())
    }
}

impl PendingSelection {
    pub fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    pub fn slot(&self) -> Slot {
        self.slot
    }

    /// The chosen activity, or `None` if the picker closed without choosing
    pub async fn wait(self) -> Option<Selection> {
        match self.receiver.await {
            Ok(selection) => Some(selection),
            Err(_) => {
                debug!("Picker request {} cancelled", self.correlation_id);
                None
            }
        }
    }
}
