//! Storage collaborator boundary.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::EngineResult;
use crate::types::Session;

/// Persistent session storage abstraction.
///
/// The engine owns no persistence schema or transport; it delegates all
/// session I/O through this boundary and awaits the results. Failures map
/// to [`crate::error::EngineError::Storage`] and propagate to the engine's
/// caller - retry and backoff are the collaborator's responsibility, and
/// the engine never retries. The only documented degradation is neighbor
/// lookup inside the session-comparison flow.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Create and persist a fresh session record for `user_id`.
    async fn create_session(&self, user_id: &str) -> EngineResult<Session>;

    /// Persist the current state of a session (finalization included).
    async fn update_session(&self, session: &Session) -> EngineResult<()>;

    /// Fetch up to `limit` of the user's sessions, ordered newest-first.
    async fn fetch_sessions(&self, user_id: &str, limit: usize) -> EngineResult<Vec<Session>>;

    /// Find up to `limit` sessions nearest to `embedding` by similarity.
    async fn find_neighbors(&self, embedding: &[f32], limit: usize) -> EngineResult<Vec<Session>>;

    /// Fetch a single session by id, if it exists.
    async fn get_session(&self, id: Uuid) -> EngineResult<Option<Session>>;
}
