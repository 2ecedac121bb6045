//! # Domain Module
//!
//! Board logic that does not care how boards are stored or shown.
//!
//! - **date_resolver**: date identifiers, midday-anchored day arithmetic, default titles
//! - **catalog**: built-in activity cards, categories and image resolution
//! - **identity**: which stored board belongs to a `(base date, day offset)` pair
//! - **session**: the edit/save state machine for one open board
//! - **navigation_guard**: save / discard / cancel when leaving a dirty board
//! - **week_overview**: seven-day summary built from the active boards
//! - **picker**: single-use result channel for activity selection
//! - **custom_card**: cards made from the user's own photos

pub mod catalog;
pub mod custom_card;
pub mod date_resolver;
pub mod errors;
pub mod identity;
pub mod navigation_guard;
pub mod picker;
pub mod session;
pub mod week_overview;

pub use catalog::{ActivityCatalog, CatalogEntry, Category, ImageSource, StaticCatalog};
pub use custom_card::CustomCardDraft;
pub use errors::{SessionError, ValidationError};
pub use identity::{find_active, BoardIdentityResolver, SaveTarget};
pub use navigation_guard::{ExitAttempt, ExitConfirmation, GuardState, NavigationGuard};
pub use picker::{request_activity, PendingSelection, PickerTicket, Selection};
pub use session::{
    AssignOutcome, BoardSession, LivenessFlag, ReconcileOutcome, SessionOptions, SessionSeed, SessionState,
};
pub use week_overview::{WeekDay, WeekOverviewService, DEFAULT_WEEK_LENGTH};
