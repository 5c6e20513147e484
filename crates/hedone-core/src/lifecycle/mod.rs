//! The session lifecycle state machine.
//!
//! [`SessionLifecycle`] owns the current state, the active session record,
//! and the in-progress activation accumulator for exactly one session per
//! user. All mutation goes through `&mut self`, which enforces the
//! single-writer discipline: concurrent triggers (voice, vision, UI
//! buttons) must be funnelled through one mutual-exclusion boundary -
//! `Arc<tokio::sync::Mutex<SessionLifecycle>>` at the orchestration layer -
//! so their calls apply as an ordered sequence, never interleaved.
//!
//! Storage I/O is delegated to the [`SessionStore`] collaborator and
//! awaited; the engine never retries it and provides no internal
//! cancellation token.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::traits::SessionStore;
use crate::types::{Dimension, PleasureVector, Session, SessionState};

/// Finite-state machine governing one user's activity sessions.
pub struct SessionLifecycle {
    store: Arc<dyn SessionStore>,
    state: SessionState,
    session: Option<Session>,
    /// Ordered, duplicate-free accumulator of dimensions touched during the
    /// current session. Insertion order is what finalization decays over.
    activated: Vec<Dimension>,
    /// Whether drift has been entered during the current session; guards the
    /// idempotent session-start timestamp.
    drift_entered: bool,
}

impl SessionLifecycle {
    /// Create a lifecycle bound to a storage collaborator, starting idle.
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self {
            store,
            state: SessionState::Idle,
            session: None,
            activated: Vec::new(),
            drift_entered: false,
        }
    }

    /// Current state of the machine.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The active session, if one is in progress.
    pub fn active_session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// State history of the active session, oldest first.
    ///
    /// Empty when idle: terminal cleanup drops the session record along
    /// with its history.
    pub fn history(&self) -> &[SessionState] {
        self.session
            .as_ref()
            .map(|s| s.state_history.as_slice())
            .unwrap_or(&[])
    }

    /// Dimensions activated so far, in first-activation order.
    pub fn activated_dimensions(&self) -> &[Dimension] {
        &self.activated
    }

    /// Move the machine to `target`.
    ///
    /// Fails with [`EngineError::InvalidTransition`] when the transition
    /// table forbids `state -> target`; the legality check runs first, so
    /// an illegal request reports the table violation even when no session
    /// is active. A legal transition appends the current state to the
    /// session's history and overwrites the current state.
    ///
    /// Side effects:
    /// - entering drift for the first time in a session records the session
    ///   start time (idempotent: re-entering drift later does not reset it);
    /// - entering idle performs terminal cleanup, clearing the history, the
    ///   active session reference, and the activation accumulator.
    pub fn transition(&mut self, target: SessionState) -> EngineResult<()> {
        if !self.state.can_transition_to(target) {
            return Err(EngineError::InvalidTransition {
                from: self.state,
                to: target,
            });
        }

        let session = self.session.as_mut().ok_or(EngineError::NoActiveSession)?;

        session.state_history.push(self.state);
        session.state = target;
        debug!(session_id = %session.id, from = %self.state, to = %target, "transition");
        self.state = target;

        if target == SessionState::Drift && !self.drift_entered {
            session.started_at = Utc::now();
            self.drift_entered = true;
        }

        if target == SessionState::Idle {
            self.session = None;
            self.activated.clear();
            self.drift_entered = false;
        }

        Ok(())
    }

    /// Start a new session for `user_id`.
    ///
    /// Fails with [`EngineError::SessionAlreadyActive`] unless the machine
    /// is idle. Otherwise asks the storage collaborator to create the
    /// session record, captures it as the active session, and transitions
    /// into drift (which records the start time). Atomic from the caller's
    /// perspective: either a session exists and the state is drift, or a
    /// failed storage call left everything unchanged.
    pub async fn start_session(&mut self, user_id: &str) -> EngineResult<Session> {
        if self.state != SessionState::Idle {
            return Err(EngineError::SessionAlreadyActive {
                session_id: self
                    .session
                    .as_ref()
                    .map(|s| s.id)
                    .unwrap_or_else(Uuid::nil),
            });
        }

        let session = self.store.create_session(user_id).await?;
        let session_id = session.id;
        self.session = Some(session);
        self.drift_entered = false;
        self.transition(SessionState::Drift)?;

        info!(session_id = %session_id, user_id, "session started");
        self.session.clone().ok_or(EngineError::NoActiveSession)
    }

    /// End the active session.
    ///
    /// A no-op returning `Ok(None)` when already idle. Otherwise: finalizes
    /// the pleasure vector from the activation accumulator, transitions to
    /// reflection, persists the finalized record (end timestamp + vector +
    /// history) through the storage collaborator, then transitions to idle,
    /// which performs terminal cleanup. Returns the finalized session as it
    /// was persisted.
    ///
    /// A storage failure propagates and leaves the machine in reflection;
    /// the caller may transition to idle to abandon the record (reflection's
    /// only legal exit).
    pub async fn end_session(&mut self) -> EngineResult<Option<Session>> {
        if self.state == SessionState::Idle {
            return Ok(None);
        }

        let vector = PleasureVector::finalize(&self.activated);
        self.transition(SessionState::Reflection)?;

        let now = Utc::now();
        {
            let session = self.session.as_mut().ok_or(EngineError::NoActiveSession)?;
            session.ended_at = Some(now);
            session.vector = Some(vector);
        }

        let finalized = self.session.clone().ok_or(EngineError::NoActiveSession)?;
        self.store.update_session(&finalized).await?;

        self.transition(SessionState::Idle)?;
        info!(
            session_id = %finalized.id,
            dimensions = finalized.vector.as_ref().map(|v| v.activations().len()).unwrap_or(0),
            "session finalized"
        );
        Ok(Some(finalized))
    }

    /// Record that `dim` was touched during the current session.
    ///
    /// First activation wins a position in the accumulator; re-activating
    /// an already-present dimension is a no-op, preserving insertion order.
    pub fn activate_dimension(&mut self, dim: Dimension) -> EngineResult<()> {
        if self.session.is_none() {
            return Err(EngineError::NoActiveSession);
        }
        if !self.activated.contains(&dim) {
            debug!(dimension = %dim, position = self.activated.len(), "dimension activated");
            self.activated.push(dim);
        }
        Ok(())
    }

    /// Remove `dim` from the accumulator, keeping the remaining order.
    pub fn deactivate_dimension(&mut self, dim: Dimension) -> EngineResult<()> {
        if self.session.is_none() {
            return Err(EngineError::NoActiveSession);
        }
        self.activated.retain(|d| *d != dim);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stubs::InMemorySessionStore;

    fn lifecycle() -> SessionLifecycle {
        SessionLifecycle::new(Arc::new(InMemorySessionStore::new()))
    }

    #[tokio::test]
    async fn test_start_session_enters_drift() {
        let mut lc = lifecycle();
        let session = lc.start_session("user-1").await.unwrap();
        assert_eq!(lc.state(), SessionState::Drift);
        assert_eq!(session.state, SessionState::Drift);
        assert_eq!(session.state_history, vec![SessionState::Idle]);
    }

    #[tokio::test]
    async fn test_double_start_rejected() {
        let mut lc = lifecycle();
        let first = lc.start_session("user-1").await.unwrap();
        let err = lc.start_session("user-1").await.unwrap_err();
        match err {
            EngineError::SessionAlreadyActive { session_id } => {
                assert_eq!(session_id, first.id);
            }
            other => panic!("expected SessionAlreadyActive, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_illegal_transition_reports_table_violation() {
        let mut lc = lifecycle();
        let err = lc.transition(SessionState::Mastery).unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidTransition {
                from: SessionState::Idle,
                to: SessionState::Mastery,
            }
        ));
    }

    #[tokio::test]
    async fn test_transition_appends_history() {
        let mut lc = lifecycle();
        lc.start_session("user-1").await.unwrap();
        lc.transition(SessionState::Mastery).unwrap();
        lc.transition(SessionState::SocialSync).unwrap();
        assert_eq!(
            lc.history(),
            &[SessionState::Idle, SessionState::Drift, SessionState::Mastery]
        );
        assert_eq!(lc.state(), SessionState::SocialSync);
    }

    #[tokio::test]
    async fn test_drift_reentry_keeps_start_time() {
        let mut lc = lifecycle();
        lc.start_session("user-1").await.unwrap();
        let started = lc.active_session().unwrap().started_at;
        lc.transition(SessionState::Mastery).unwrap();
        lc.transition(SessionState::Drift).unwrap();
        assert_eq!(lc.active_session().unwrap().started_at, started);
    }

    #[tokio::test]
    async fn test_end_session_when_idle_is_noop() {
        let mut lc = lifecycle();
        assert!(lc.end_session().await.unwrap().is_none());
        assert_eq!(lc.state(), SessionState::Idle);
    }

    #[tokio::test]
    async fn test_end_session_finalizes_and_cleans_up() {
        let mut lc = lifecycle();
        lc.start_session("user-1").await.unwrap();
        lc.activate_dimension(Dimension::Order).unwrap();
        lc.activate_dimension(Dimension::Mobility).unwrap();

        let ended = lc.end_session().await.unwrap().expect("finalized session");
        assert_eq!(ended.state, SessionState::Reflection);
        assert!(ended.ended_at.is_some());
        let vector = ended.vector.expect("vector");
        assert_eq!(vector.activation(Dimension::Order), Some(1.0));
        assert_eq!(vector.activation(Dimension::Mobility), Some(0.9));

        assert_eq!(lc.state(), SessionState::Idle);
        assert!(lc.history().is_empty());
        assert!(lc.active_session().is_none());
        assert!(lc.activated_dimensions().is_empty());
    }

    #[tokio::test]
    async fn test_end_session_persists_to_store() {
        let store = Arc::new(InMemorySessionStore::new());
        let mut lc = SessionLifecycle::new(store.clone());
        let session = lc.start_session("user-1").await.unwrap();
        lc.activate_dimension(Dimension::Food).unwrap();
        lc.end_session().await.unwrap();

        let stored = store.get_session(session.id).await.unwrap().expect("stored");
        assert!(stored.is_ended());
        assert!(stored.has_valid_embedding());
    }

    #[tokio::test]
    async fn test_activate_requires_active_session() {
        let mut lc = lifecycle();
        assert!(matches!(
            lc.activate_dimension(Dimension::Path),
            Err(EngineError::NoActiveSession)
        ));
        assert!(matches!(
            lc.deactivate_dimension(Dimension::Path),
            Err(EngineError::NoActiveSession)
        ));
    }

    #[tokio::test]
    async fn test_activation_order_and_dedup() {
        let mut lc = lifecycle();
        lc.start_session("user-1").await.unwrap();
        lc.activate_dimension(Dimension::Power).unwrap();
        lc.activate_dimension(Dimension::Order).unwrap();
        lc.activate_dimension(Dimension::Power).unwrap();
        assert_eq!(
            lc.activated_dimensions(),
            &[Dimension::Power, Dimension::Order]
        );

        lc.deactivate_dimension(Dimension::Power).unwrap();
        assert_eq!(lc.activated_dimensions(), &[Dimension::Order]);
    }
}
