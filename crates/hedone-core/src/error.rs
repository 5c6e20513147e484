//! Error types for hedone-core.
//!
//! This module defines the central error type [`EngineError`] used throughout
//! the engine, along with the [`EngineResult<T>`] type alias.
//!
//! All variants are local, recoverable, and caller-visible. Collaborator I/O
//! failures are wrapped and propagated, never swallowed. Malformed or missing
//! embeddings are NOT errors; analytics treat them as skip conditions.

use thiserror::Error;
use uuid::Uuid;

use crate::types::SessionState;

/// Top-level error type for engine operations.
///
/// # Examples
///
/// ```rust
/// use hedone_core::error::EngineError;
/// use hedone_core::types::SessionState;
///
/// let error = EngineError::InvalidTransition {
///     from: SessionState::Idle,
///     to: SessionState::Mastery,
/// };
/// assert!(error.to_string().contains("idle"));
/// assert!(error.to_string().contains("mastery"));
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// A state transition was attempted that the transition table forbids.
    ///
    /// The table is directed and asymmetric: `drift -> mastery` being legal
    /// says nothing about `mastery -> drift` (which happens to be legal) or
    /// `idle -> mastery` (which is not).
    #[error("Invalid transition: {from} -> {to}")]
    InvalidTransition {
        /// State the machine was in when the transition was attempted
        from: SessionState,
        /// Requested target state
        to: SessionState,
    },

    /// `start_session` was called while another session is active.
    ///
    /// Exactly one session may be active per user; a second start is
    /// rejected, not queued.
    #[error("Session already active: {session_id}")]
    SessionAlreadyActive {
        /// Identifier of the currently-active session
        session_id: Uuid,
    },

    /// An operation that requires an active session found none.
    #[error("No active session")]
    NoActiveSession,

    /// The storage collaborator reported an I/O failure.
    ///
    /// Retry/backoff is the collaborator's responsibility; the engine
    /// propagates the failure to its caller, except where a calling flow
    /// explicitly documents degradation (neighbor lookup).
    #[error("Storage error: {0}")]
    Storage(String),

    /// The AI rendering collaborator failed to produce text.
    #[error("Render error: {0}")]
    Render(String),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<config::ConfigError> for EngineError {
    fn from(err: config::ConfigError) -> Self {
        EngineError::Config(err.to_string())
    }
}

/// Result type alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
