//! Hedone Core Library
//!
//! The session lifecycle state machine and pleasure-vector analytics engine
//! behind the Hedone app. The surrounding mobile client owns UI, capture
//! hardware, auth, persistence, and the hosted generative-AI calls; this
//! crate owns the parts with actual algorithmic content:
//!
//! - [`types`]: the closed 16-axis [`types::Dimension`] space,
//!   [`types::PleasureVector`], [`types::Session`], clusters, and findings
//! - [`lifecycle`]: the session state machine with asymmetric transition
//!   legality and session-scoped dimension accumulation
//! - [`space`]: embedding, normalization, similarity, nearest-neighbor
//!   ranking, centroid/variance, and bounded k-means clustering
//! - [`insight`]: pattern extraction into structured findings for the AI
//!   rendering collaborator
//! - [`traits`]: the storage and rendering collaborator boundaries
//! - [`stubs`]: in-memory collaborator implementations for tests
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use hedone_core::lifecycle::SessionLifecycle;
//! use hedone_core::stubs::InMemorySessionStore;
//! use hedone_core::types::Dimension;
//!
//! # async fn demo() -> hedone_core::error::EngineResult<()> {
//! let store = Arc::new(InMemorySessionStore::new());
//! let mut lifecycle = SessionLifecycle::new(store);
//!
//! lifecycle.start_session("user-1").await?;
//! lifecycle.activate_dimension(Dimension::SerendipityFollowing)?;
//! let ended = lifecycle.end_session().await?;
//! assert!(ended.is_some());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod insight;
pub mod lifecycle;
pub mod space;
pub mod stubs;
pub mod traits;
pub mod types;

// Re-exports for convenience
pub use config::EngineConfig;
pub use error::{EngineError, EngineResult};
pub use insight::InsightAnalytics;
pub use lifecycle::SessionLifecycle;
pub use types::{Dimension, PleasureVector, Session, SessionState};
