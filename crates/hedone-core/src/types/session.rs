//! Session record and lifecycle states.
//!
//! A [`Session`] is one bounded user activity instance: a state history,
//! timestamps, and (once ended) a finalized [`PleasureVector`].
//! The [`SessionState`] transition table is directed and asymmetric;
//! legality checks live here so every consumer shares one table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Dimension, PleasureVector};

/// Lifecycle states of a session.
///
/// `Idle` is both the initial state and the state reached after any
/// session's terminal cleanup; there is no separate terminal state.
/// `Reflection` is transient and always auto-advances to `Idle`.
///
/// # Transition table
///
/// ```text
/// idle        -> drift
/// drift       -> mastery | social_sync | reflection
/// mastery     -> drift | social_sync | reflection
/// social_sync -> drift | mastery | reflection
/// reflection  -> idle
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No session in progress.
    #[default]
    Idle,
    /// Unstructured wandering; every session begins here.
    Drift,
    /// Focused, skillful engagement.
    Mastery,
    /// Attunement to other people.
    SocialSync,
    /// Transient wind-down before returning to idle.
    Reflection,
}

impl SessionState {
    /// States legally reachable from this one.
    ///
    /// The table is directed: membership of `b` in `a.allowed_transitions()`
    /// says nothing about the reverse direction.
    pub fn allowed_transitions(self) -> &'static [SessionState] {
        match self {
            Self::Idle => &[Self::Drift],
            Self::Drift => &[Self::Mastery, Self::SocialSync, Self::Reflection],
            Self::Mastery => &[Self::Drift, Self::SocialSync, Self::Reflection],
            Self::SocialSync => &[Self::Drift, Self::Mastery, Self::Reflection],
            Self::Reflection => &[Self::Idle],
        }
    }

    /// Check whether a direct transition to `target` is legal.
    #[inline]
    pub fn can_transition_to(self, target: SessionState) -> bool {
        self.allowed_transitions().contains(&target)
    }

    /// Canonical wire name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Drift => "drift",
            Self::Mastery => "mastery",
            Self::SocialSync => "social_sync",
            Self::Reflection => "reflection",
        }
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One bounded user activity instance.
///
/// Created by the storage collaborator on session start, mutated by every
/// lifecycle transition (the prior state is appended to `state_history`,
/// oldest first), and finalized on end (`ended_at` + `vector`). After
/// finalization the engine treats the record as immutable; the storage
/// collaborator may still update metadata it owns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Session identifier.
    pub id: Uuid,
    /// Owning user.
    pub user_id: String,
    /// Current (or terminal) state.
    pub state: SessionState,
    /// Append-only log of previously-occupied states, oldest first.
    pub state_history: Vec<SessionState>,
    /// When the session started (set on first entry into drift).
    pub started_at: DateTime<Utc>,
    /// When the session ended; `None` while in progress.
    pub ended_at: Option<DateTime<Utc>>,
    /// Finalized pleasure vector; `None` while in progress.
    pub vector: Option<PleasureVector>,
}

impl Session {
    /// Create a fresh session record for `user_id`.
    ///
    /// Starts in [`SessionState::Idle`] with an empty history; the lifecycle
    /// transitions it into drift immediately after creation.
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            state: SessionState::Idle,
            state_history: Vec::new(),
            started_at: Utc::now(),
            ended_at: None,
            vector: None,
        }
    }

    /// The dense embedding of the finalized vector, if one exists.
    ///
    /// Analytics callers additionally check the length; an absent vector or
    /// a wrong-length embedding is a skip condition, never a hard error.
    pub fn embedding(&self) -> Option<&[f32]> {
        self.vector.as_ref().map(|v| v.embedding())
    }

    /// True when this session carries a well-formed 16-length embedding.
    pub fn has_valid_embedding(&self) -> bool {
        self.embedding()
            .map(|e| e.len() == Dimension::COUNT)
            .unwrap_or(false)
    }

    /// True once the session has been finalized.
    pub fn is_ended(&self) -> bool {
        self.ended_at.is_some()
    }
}

impl PartialEq for Session {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Session {}
