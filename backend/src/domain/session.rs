//! Session controller for one open day board.
//!
//! A session is `Clean` right after a load or a successful save and `Dirty`
//! while an assigned activity has not reached the store. Which slots the
//! board shows and whether assignments save immediately come from
//! [`SessionOptions`], so the single-slot and legacy Today + Activity layouts
//! share this one implementation.

use shared::{Activity, Board, BoardType, DateIdentifier, Slot};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::catalog::{resolve_image, ActivityCatalog, ImageSource};
use super::custom_card::CustomCardDraft;
use super::date_resolver::{default_title, target_identifier};
use super::errors::{SessionError, ValidationError};
use super::identity::{should_adopt, BoardIdentityResolver, SaveTarget};
use super::picker::Selection;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    /// Slots shown on the board, in card order
    pub slots: Vec<Slot>,
    /// Persist right after every assignment
    pub autosave: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            slots: vec![Slot::Activity],
            autosave: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Clean,
    Dirty,
}

/// How a session starts: empty for its day, or from a board the user opened
#[derive(Debug, Clone)]
pub enum SessionSeed {
    New,
    Load(Board),
}

#[derive(Debug, Clone, PartialEq)]
pub enum AssignOutcome {
    /// Autosave wrote the board
    Saved(Board),
    /// The edit is only in memory; the session stays dirty
    Pending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    SkippedDirty,
    SkippedExplicitLoad,
    /// The session went away while the store was being read
    Discarded,
    NoMatch,
    AlreadyCurrent,
    Adopted(String),
}

/// Shared flag telling outstanding async work whether its session still
/// exists. Goes dead when the owning `BoardSession` is dropped.
#[derive(Debug, Clone)]
pub struct LivenessFlag(Arc<AtomicBool>);

impl LivenessFlag {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    pub fn mark_dead(&self) {
        self.0.store(false, Ordering::SeqCst);
    }

    pub fn is_live(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

impl Default for LivenessFlag {
    fn default() -> Self {
        Self::new()
    }
}

pub struct BoardSession {
    resolver: BoardIdentityResolver,
    catalog: Arc<dyn ActivityCatalog>,
    options: SessionOptions,
    base_date: DateIdentifier,
    day_offset: u32,
    target_date: DateIdentifier,
    title: String,
    /// One entry per configured slot
    assignments: Vec<Option<Activity>>,
    board_id: Option<String>,
    state: SessionState,
    explicitly_loaded: bool,
    liveness: LivenessFlag,
}

impl BoardSession {
    pub fn new(
        resolver: BoardIdentityResolver,
        catalog: Arc<dyn ActivityCatalog>,
        options: SessionOptions,
        base_date: DateIdentifier,
        day_offset: u32,
    ) -> Self {
        let target_date = target_identifier(base_date, day_offset);
        let assignments = vec![None; options.slots.len()];
        Self {
            resolver,
            catalog,
            options,
            base_date,
            day_offset,
            target_date,
            title: default_title(target_date, day_offset),
            assignments,
            board_id: None,
            state: SessionState::Clean,
            explicitly_loaded: false,
            liveness: LivenessFlag::new(),
        }
    }

    /// Start a session from `seed`. A board opened explicitly pins the
    /// session: focus reconciliation never replaces it.
    pub fn open(
        resolver: BoardIdentityResolver,
        catalog: Arc<dyn ActivityCatalog>,
        options: SessionOptions,
        base_date: DateIdentifier,
        day_offset: u32,
        seed: SessionSeed,
    ) -> Self {
        let mut session = Self::new(resolver, catalog, options, base_date, day_offset);
        if let SessionSeed::Load(board) = seed {
            session.load_existing(&board);
            session.explicitly_loaded = true;
        }
        session
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_dirty(&self) -> bool {
        self.state == SessionState::Dirty
    }

    pub fn board_id(&self) -> Option<&str> {
        self.board_id.as_deref()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn base_date(&self) -> DateIdentifier {
        self.base_date
    }

    pub fn day_offset(&self) -> u32 {
        self.day_offset
    }

    pub fn target_date(&self) -> DateIdentifier {
        self.target_date
    }

    pub fn slots(&self) -> &[Slot] {
        &self.options.slots
    }

    pub fn liveness(&self) -> LivenessFlag {
        self.liveness.clone()
    }

    pub fn assigned(&self, slot: Slot) -> Option<&Activity> {
        self.slot_index(slot)
            .and_then(|index| self.assignments.get(index))
            .and_then(Option::as_ref)
    }

    /// The card in the activity slot
    pub fn activity(&self) -> Option<&Activity> {
        self.assigned(Slot::Activity)
    }

    /// Picture to show in `slot`, resolved through the catalog
    pub fn display_image(&self, slot: Slot) -> Option<ImageSource> {
        self.assigned(slot)
            .and_then(|activity| resolve_image(self.catalog.as_ref(), activity))
    }

    fn slot_index(&self, slot: Slot) -> Option<usize> {
        self.options.slots.iter().position(|s| *s == slot)
    }

    /// Put `activity` into `slot`. With autosave on, the board is written
    /// straight away; a failed write is logged and leaves the session dirty.
    pub async fn assign_activity(&mut self, slot: Slot, activity: Activity) -> Result<AssignOutcome, SessionError> {
        let index = self
            .slot_index(slot)
            .ok_or(ValidationError::UnsupportedSlot(slot))?;
        debug!("Assigning '{}' to {} on {}", activity.name(), slot, self.target_date);
        self.assignments[index] = Some(activity);
        self.state = SessionState::Dirty;

        if !self.options.autosave {
            return Ok(AssignOutcome::Pending);
        }

        match self.save(None).await {
            Ok(board) => Ok(AssignOutcome::Saved(board)),
            Err(e) => {
                warn!("Autosave for {} failed: {}. Changes kept in memory.", self.target_date, e);
                Ok(AssignOutcome::Pending)
            }
        }
    }

    /// Deliver a picker result to this session
    pub async fn apply_selection(&mut self, selection: Selection) -> Result<AssignOutcome, SessionError> {
        self.assign_activity(selection.slot, selection.activity).await
    }

    /// Validate a custom card and assign it to `slot`
    pub async fn assign_custom_card(&mut self, slot: Slot, draft: &CustomCardDraft) -> Result<AssignOutcome, SessionError> {
        let activity = draft.build()?;
        self.assign_activity(slot, activity).await
    }

    /// Write the board: create on first save, update afterwards.
    ///
    /// A blank `title_override` falls back to the current title and then to
    /// the default title for the day.
    pub async fn save(&mut self, title_override: Option<&str>) -> Result<Board, SessionError> {
        if self.activity().is_none() {
            info!("Refusing to save {}: no activity assigned", self.target_date);
            return Err(ValidationError::MissingActivity.into());
        }

        let title = title_override
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .or_else(|| Some(self.title.trim()).filter(|t| !t.is_empty()))
            .map(str::to_string)
            .unwrap_or_else(|| default_title(self.target_date, self.day_offset));

        let target = SaveTarget::for_session(self.board_id.as_deref());
        let board = self.build_board(target.id(), &title);
        self.resolver.persist(&target, &board).await?;

        info!("Saved board {} ('{}') for {}", board.id, board.title, board.date_iso);
        self.board_id = Some(board.id.clone());
        self.title = title;
        self.state = SessionState::Clean;
        Ok(board)
    }

    /// Forget that there are unsaved edits; nothing is written
    pub fn discard(&mut self) {
        if self.is_dirty() {
            debug!("Discarding unsaved changes for {}", self.target_date);
        }
        self.state = SessionState::Clean;
    }

    /// Replace the whole session state with `board`
    pub fn load_existing(&mut self, board: &Board) {
        let mut assignments = vec![None; self.options.slots.len()];
        if board.cards.len() == assignments.len() {
            for (slot, card) in assignments.iter_mut().zip(&board.cards) {
                *slot = Some(card.clone());
            }
        } else if let Some(index) = self.slot_index(Slot::Activity) {
            assignments[index] = board.canonical_activity().cloned();
        }

        debug!("Loaded board {} into session for {}", board.id, self.target_date);
        self.assignments = assignments;
        self.title = board.title.clone();
        self.board_id = Some(board.id.clone());
        self.state = SessionState::Clean;
    }

    /// Pick up a board saved elsewhere (another screen, the week view) when
    /// this screen becomes visible again. Never touches unsaved work.
    pub async fn reconcile_on_focus_regain(&mut self) -> ReconcileOutcome {
        if self.is_dirty() {
            return ReconcileOutcome::SkippedDirty;
        }
        if self.explicitly_loaded {
            return ReconcileOutcome::SkippedExplicitLoad;
        }

        let latest = self.resolver.resolve_active(self.base_date, self.day_offset).await;
        if !self.liveness.is_live() {
            debug!("Session for {} closed during reconcile; dropping result", self.target_date);
            return ReconcileOutcome::Discarded;
        }

        match latest {
            None => ReconcileOutcome::NoMatch,
            Some(board) if !should_adopt(&board, self.board_id.as_deref()) => ReconcileOutcome::AlreadyCurrent,
            Some(board) => {
                info!("Adopting board {} for {}", board.id, self.target_date);
                self.load_existing(&board);
                ReconcileOutcome::Adopted(board.id)
            }
        }
    }

    fn build_board(&self, id: &str, title: &str) -> Board {
        Board {
            id: id.to_string(),
            board_type: BoardType::for_offset(self.day_offset),
            date_iso: self.target_date,
            base_date_iso: self.base_date,
            day_offset: self.day_offset,
            title: title.to_string(),
            cards: self.assignments.iter().flatten().cloned().collect(),
        }
    }
}

impl Drop for BoardSession {
    fn drop(&mut self) {
        self.liveness.mark_dead();
    }
}
