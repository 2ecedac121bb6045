//! Navigation guard: keeps the user from leaving a board with unsaved edits.
//!
//! `A` is whatever the host uses to describe a navigation (a route, a back
//! action). At most one intercepted action is held; it is handed back to the
//! caller to replay once the user saves or discards.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::errors::SessionError;
use super::session::BoardSession;

/// What happens when the user leaves a dirty board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitConfirmation {
    /// Ask save / discard / cancel
    #[default]
    Prompt,
    /// Save silently; ask only if that save fails
    SaveOnExit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardState<A> {
    Idle,
    AwaitingDecision { pending: A },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitAttempt<A> {
    /// Carry out the navigation now
    Proceed(A),
    /// Navigation suppressed; show the save prompt prefilled with this title
    Intercepted { suggested_title: String },
}

#[derive(Debug)]
pub struct NavigationGuard<A> {
    strategy: ExitConfirmation,
    state: GuardState<A>,
}

impl<A> NavigationGuard<A> {
    pub fn new(strategy: ExitConfirmation) -> Self {
        Self {
            strategy,
            state: GuardState::Idle,
        }
    }

    pub fn state(&self) -> &GuardState<A> {
        &self.state
    }

    pub fn is_awaiting_decision(&self) -> bool {
        matches!(self.state, GuardState::AwaitingDecision { .. })
    }

    pub fn pending_action(&self) -> Option<&A> {
        match &self.state {
            GuardState::AwaitingDecision { pending } => Some(pending),
            GuardState::Idle => None,
        }
    }

    pub async fn attempt_exit(&mut self, session: &mut BoardSession, action: A) -> ExitAttempt<A> {
        if !session.is_dirty() {
            // A navigation held from an earlier attempt is superseded by this one
            self.state = GuardState::Idle;
            return ExitAttempt::Proceed(action);
        }

        if self.strategy == ExitConfirmation::SaveOnExit {
            match session.save(None).await {
                Ok(board) => {
                    info!("Saved board {} on exit", board.id);
                    return ExitAttempt::Proceed(action);
                }
                Err(e) => warn!("Save on exit failed: {}. Asking the user instead.", e),
            }
        }

        info!("Exit from {} intercepted: unsaved changes", session.target_date());
        self.state = GuardState::AwaitingDecision { pending: action };
        ExitAttempt::Intercepted {
            suggested_title: session.title().to_string(),
        }
    }

    /// Save, then release the held navigation. On failure the navigation
    /// stays held so the user can retry, discard or cancel.
    pub async fn confirm_save(&mut self, session: &mut BoardSession, title: Option<&str>) -> Result<Option<A>, SessionError> {
        session.save(title).await?;
        Ok(self.take_pending())
    }

    /// Drop the edits and release the held navigation
    pub fn confirm_discard(&mut self, session: &mut BoardSession) -> Option<A> {
        session.discard();
        self.take_pending()
    }

    /// Stay on the board; the held navigation is dropped
    pub fn cancel(&mut self) {
        self.state = GuardState::Idle;
    }

    fn take_pending(&mut self) -> Option<A> {
        match std::mem::replace(&mut self.state, GuardState::Idle) {
            GuardState::AwaitingDecision { pending } => Some(pending),
            GuardState::Idle => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::StaticCatalog;
    use crate::domain::identity::BoardIdentityResolver;
    use crate::domain::session::SessionOptions;
    use crate::storage::test_utils::{date, library_activity, CountingBoardStore};
    use crate::storage::BoardStorage;
    use shared::Slot;
    use std::sync::Arc;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Nav {
        Back,
        WeekOverview,
    }

    async fn dirty_session(store: &CountingBoardStore) -> BoardSession {
        let mut session = BoardSession::new(
            BoardIdentityResolver::new(Arc::new(store.clone())),
            Arc::new(StaticCatalog::builtin()),
            SessionOptions {
                slots: vec![Slot::Activity],
                autosave: false,
            },
            date("2024-03-10"),
            1,
        );
        session
            .assign_activity(Slot::Activity, library_activity("3", "bath"))
            .await
            .unwrap();
        session
    }

    #[tokio::test]
    async fn test_clean_session_exits_immediately() {
        let store = CountingBoardStore::new();
        let mut session = dirty_session(&store).await;
        session.discard();
        let mut guard = NavigationGuard::new(ExitConfirmation::Prompt);

        assert_eq!(guard.attempt_exit(&mut session, Nav::Back).await, ExitAttempt::Proceed(Nav::Back));
        assert!(!guard.is_awaiting_decision());
    }

    #[tokio::test]
    async fn test_discard_leaves_store_untouched() {
        let store = CountingBoardStore::new();
        let mut session = dirty_session(&store).await;
        let mut guard = NavigationGuard::new(ExitConfirmation::Prompt);

        let attempt = guard.attempt_exit(&mut session, Nav::Back).await;
        assert_eq!(
            attempt,
            ExitAttempt::Intercepted {
                suggested_title: "Monday".to_string()
            }
        );
        assert_eq!(guard.pending_action(), Some(&Nav::Back));

        assert_eq!(guard.confirm_discard(&mut session), Some(Nav::Back));
        assert_eq!(store.kv.write_count(), 0);
        assert!(!session.is_dirty());
        assert_eq!(*guard.state(), GuardState::Idle);
    }

    #[tokio::test]
    async fn test_save_persists_once_then_releases_exit() {
        let store = CountingBoardStore::new();
        let mut session = dirty_session(&store).await;
        let mut guard = NavigationGuard::new(ExitConfirmation::Prompt);
        guard.attempt_exit(&mut session, Nav::WeekOverview).await;

        let released = guard.confirm_save(&mut session, Some("Bath night")).await.unwrap();

        assert_eq!(released, Some(Nav::WeekOverview));
        assert_eq!(store.append_count() + store.replace_count(), 1);
        assert_eq!(store.list_all().await[0].title, "Bath night");
        assert!(!guard.is_awaiting_decision());
    }

    #[tokio::test]
    async fn test_failed_save_keeps_exit_held() {
        let store = CountingBoardStore::new();
        let mut session = dirty_session(&store).await;
        let mut guard = NavigationGuard::new(ExitConfirmation::Prompt);
        guard.attempt_exit(&mut session, Nav::Back).await;
        store.kv.fail_writes(true);

        let err = guard.confirm_save(&mut session, None).await.unwrap_err();

        assert!(matches!(err, SessionError::Store(_)));
        assert_eq!(guard.pending_action(), Some(&Nav::Back));
        assert!(session.is_dirty());
    }

    #[tokio::test]
    async fn test_cancel_drops_held_exit() {
        let store = CountingBoardStore::new();
        let mut session = dirty_session(&store).await;
        let mut guard = NavigationGuard::new(ExitConfirmation::Prompt);
        guard.attempt_exit(&mut session, Nav::Back).await;

        guard.cancel();

        assert!(guard.pending_action().is_none());
        assert!(session.is_dirty());
        // Confirming later saves but has nothing to replay
        assert_eq!(guard.confirm_save(&mut session, None).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_clean_exit_clears_earlier_held_exit() {
        let store = CountingBoardStore::new();
        let mut session = dirty_session(&store).await;
        let mut guard = NavigationGuard::new(ExitConfirmation::Prompt);
        guard.attempt_exit(&mut session, Nav::Back).await;

        // Saved outside the prompt, e.g. from the board's own save button
        session.save(None).await.unwrap();
        let attempt = guard.attempt_exit(&mut session, Nav::WeekOverview).await;

        assert_eq!(attempt, ExitAttempt::Proceed(Nav::WeekOverview));
        assert!(!guard.is_awaiting_decision());
        assert_eq!(guard.confirm_discard(&mut session), None);
    }

    #[tokio::test]
    async fn test_only_latest_exit_is_held() {
        let store = CountingBoardStore::new();
        let mut session = dirty_session(&store).await;
        let mut guard = NavigationGuard::new(ExitConfirmation::Prompt);

        guard.attempt_exit(&mut session, Nav::Back).await;
        guard.attempt_exit(&mut session, Nav::WeekOverview).await;

        assert_eq!(guard.confirm_discard(&mut session), Some(Nav::WeekOverview));
    }

    #[tokio::test]
    async fn test_save_on_exit_strategy() {
        let store = CountingBoardStore::new();
        let mut session = dirty_session(&store).await;
        let mut guard = NavigationGuard::new(ExitConfirmation::SaveOnExit);

        assert_eq!(guard.attempt_exit(&mut session, Nav::Back).await, ExitAttempt::Proceed(Nav::Back));
        assert_eq!(store.append_count(), 1);

        // Falls back to asking when the save cannot happen
        session.assign_activity(Slot::Activity, library_activity("4", "bedtime")).await.unwrap();
        store.kv.fail_writes(true);
        let attempt = guard.attempt_exit(&mut session, Nav::Back).await;
        assert!(matches!(attempt, ExitAttempt::Intercepted { .. }));
    }

    #[test]
    fn test_exit_confirmation_names() {
        let parsed: ExitConfirmation = serde_json::from_str("\"save_on_exit\"").unwrap();
        assert_eq!(parsed, ExitConfirmation::SaveOnExit);
        assert_eq!(ExitConfirmation::default(), ExitConfirmation::Prompt);
    }
}
