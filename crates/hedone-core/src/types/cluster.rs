//! Transient session groupings produced by clustering.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A non-empty set of sessions grouped by embedding proximity.
///
/// Clusters are transient: recomputed on demand from the supplied history,
/// never persisted by this engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionCluster {
    /// Mean embedding of the member sessions.
    pub centroid: Vec<f32>,
    /// Identifiers of the member sessions. Always non-empty.
    pub members: Vec<Uuid>,
}

impl SessionCluster {
    /// Number of member sessions.
    pub fn size(&self) -> usize {
        self.members.len()
    }
}
