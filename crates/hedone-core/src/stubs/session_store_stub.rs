//! In-memory stub implementation of SessionStore.
//!
//! Backs tests and early integration work: a HashMap behind an async RwLock,
//! with creation order standing in for persistence-layer recency and a
//! brute-force cosine scan standing in for the real similarity index.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::space::cosine_similarity;
use crate::traits::SessionStore;
use crate::types::Session;

#[derive(Debug, Default)]
struct Inner {
    sessions: HashMap<Uuid, Session>,
    /// Creation order, oldest first.
    order: Vec<Uuid>,
}

/// In-memory session store.
///
/// Not for production: data lives only as long as the process. Neighbor
/// search is an exact brute-force scan, which is fine at test scale.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    inner: RwLock<Inner>,
    /// When set, `find_neighbors` fails - lets tests exercise the documented
    /// degradation path in the session-comparison flow.
    fail_neighbor_lookups: AtomicBool,
}

impl InMemorySessionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a pre-built session record directly (test seeding).
    pub async fn seed_session(&self, session: Session) {
        let mut inner = self.inner.write().await;
        if !inner.sessions.contains_key(&session.id) {
            inner.order.push(session.id);
        }
        inner.sessions.insert(session.id, session);
    }

    /// Make subsequent `find_neighbors` calls fail.
    pub fn set_fail_neighbor_lookups(&self, fail: bool) {
        self.fail_neighbor_lookups.store(fail, Ordering::Relaxed);
    }

    /// Number of stored sessions.
    pub async fn len(&self) -> usize {
        self.inner.read().await.sessions.len()
    }

    /// True when nothing has been stored.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create_session(&self, user_id: &str) -> EngineResult<Session> {
        let session = Session::new(user_id);
        let mut inner = self.inner.write().await;
        inner.order.push(session.id);
        inner.sessions.insert(session.id, session.clone());
        Ok(session)
    }

    async fn update_session(&self, session: &Session) -> EngineResult<()> {
        let mut inner = self.inner.write().await;
        if !inner.sessions.contains_key(&session.id) {
            return Err(EngineError::Storage(format!(
                "unknown session: {}",
                session.id
            )));
        }
        inner.sessions.insert(session.id, session.clone());
        Ok(())
    }

    async fn fetch_sessions(&self, user_id: &str, limit: usize) -> EngineResult<Vec<Session>> {
        let inner = self.inner.read().await;
        Ok(inner
            .order
            .iter()
            .rev()
            .filter_map(|id| inner.sessions.get(id))
            .filter(|s| s.user_id == user_id)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn find_neighbors(&self, embedding: &[f32], limit: usize) -> EngineResult<Vec<Session>> {
        if self.fail_neighbor_lookups.load(Ordering::Relaxed) {
            return Err(EngineError::Storage("neighbor index unavailable".into()));
        }

        let inner = self.inner.read().await;
        let mut scored: Vec<(f32, &Session)> = inner
            .sessions
            .values()
            .filter(|s| s.has_valid_embedding())
            .map(|s| {
                let score = cosine_similarity(embedding, s.embedding().unwrap_or(&[]));
                (score, s)
            })
            .collect();

        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        Ok(scored
            .into_iter()
            .take(limit)
            .map(|(_, s)| s.clone())
            .collect())
    }

    async fn get_session(&self, id: Uuid) -> EngineResult<Option<Session>> {
        let inner = self.inner.read().await;
        Ok(inner.sessions.get(&id).cloned())
    }
}
