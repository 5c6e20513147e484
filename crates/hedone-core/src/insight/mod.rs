//! Pattern extraction over session history.
//!
//! [`InsightAnalytics`] combines VectorSpace outputs (clusters, variance,
//! underexplored dimensions) into structured [`Finding`]s, hands them to the
//! AI rendering collaborator for prose, and matches the returned dimension
//! tags back to the closed enumeration. The engine supplies numbers and
//! dimension lists only - wording is entirely the collaborator's.
//!
//! All methods are read-only over their inputs; independent queries may run
//! concurrently against the same instance.

use std::sync::Arc;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::warn;

use crate::config::EngineConfig;
use crate::error::EngineResult;
use crate::space::{
    cluster_with_iterations, cosine_similarity, dimension_variance, dominant_dimensions,
    embed_profile,
};
use crate::traits::{InsightRenderer, SessionStore};
use crate::types::{Dimension, Finding, Insight, RenderedInsight, Session};

/// Number of dimensions reported on each side of the weekly variance split.
const VARIANCE_EXTREME_COUNT: usize = 3;

/// Canned prose for a session with no similar history. The renderer is not
/// invoked for this case.
const NOVEL_EXPERIENCE_TEXT: &str =
    "Nothing in your history looks like this session yet. You charted new territory.";

/// Analytics over historical sessions, rendered to prose by the AI
/// collaborator.
pub struct InsightAnalytics {
    store: Arc<dyn SessionStore>,
    renderer: Arc<dyn InsightRenderer>,
    config: EngineConfig,
}

impl InsightAnalytics {
    /// Create an analytics engine bound to its collaborators.
    pub fn new(
        store: Arc<dyn SessionStore>,
        renderer: Arc<dyn InsightRenderer>,
        config: EngineConfig,
    ) -> Self {
        Self {
            store,
            renderer,
            config,
        }
    }

    /// Compare a just-ended session against its nearest historical neighbors.
    ///
    /// Retrieves `neighbor_k` neighbors through the storage collaborator's
    /// similarity query. When none exist, the canned novel-experience
    /// insight is returned without invoking the renderer. The same applies
    /// when the session has no usable embedding, and when the lookup itself
    /// fails: this flow explicitly degrades a lookup failure to "no similar
    /// sessions found", with a warning.
    pub async fn session_comparison(&self, session: &Session) -> EngineResult<Insight> {
        let dominant = session
            .vector
            .as_ref()
            .map(|v| v.dominant_dimensions(self.config.session_dominant_threshold))
            .unwrap_or_default();

        let embedding = match session.embedding() {
            Some(emb) if emb.len() == Dimension::COUNT => emb,
            _ => return Ok(Self::novel_insight(session, dominant)),
        };

        let neighbors = match self
            .store
            .find_neighbors(embedding, self.config.neighbor_k)
            .await
        {
            Ok(neighbors) => neighbors,
            Err(e) => {
                warn!(session_id = %session.id, error = %e,
                    "neighbor lookup failed, degrading to novel-experience insight");
                Vec::new()
            }
        };

        let neighbors: Vec<&Session> = neighbors
            .iter()
            .filter(|n| n.id != session.id && n.has_valid_embedding())
            .collect();

        if neighbors.is_empty() {
            return Ok(Self::novel_insight(session, dominant));
        }

        let mean_similarity = neighbors
            .iter()
            .map(|n| cosine_similarity(embedding, n.embedding().unwrap_or(&[])))
            .sum::<f32>()
            / neighbors.len() as f32;

        let finding = Finding::SessionComparison {
            session_id: session.id,
            dominant,
            neighbor_count: neighbors.len(),
            mean_similarity,
            novel: false,
        };
        let rendered = self.renderer.render(&finding).await?;
        Ok(Self::into_insight(finding, rendered))
    }

    /// Weekly aggregate over a supplied session set.
    ///
    /// Clusters the sessions (`weekly_cluster_k`, seeded from config so
    /// repeated runs agree), computes per-dimension variance, and reports
    /// the 3 highest-variance dimensions as most-varied and the 3 lowest as
    /// least-explored, ties broken by enumeration order.
    pub async fn weekly(&self, sessions: &[Session]) -> EngineResult<Insight> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.config.cluster_seed);
        let clusters = cluster_with_iterations(
            sessions,
            self.config.weekly_cluster_k,
            self.config.kmeans_iterations,
            &mut rng,
        );
        let variance = dimension_variance(sessions);

        let finding = Finding::Weekly {
            session_count: sessions.len(),
            cluster_sizes: clusters.iter().map(|c| c.size()).collect(),
            most_varied: variance_extremes(&variance, true),
            least_explored: variance_extremes(&variance, false),
        };
        let rendered = self.renderer.render(&finding).await?;
        Ok(Self::into_insight(finding, rendered))
    }

    /// Suggest dimensions to explore next.
    ///
    /// Looks at the centroid of the user's most recent sessions
    /// (`recent_window`, newest-first from the storage collaborator) and
    /// flags dimensions whose magnitude falls below the underexplored
    /// threshold. When nothing is underexplored, falls back to `preferred` -
    /// the user's time-of-day preferred dimensions supplied by the profile
    /// layer.
    pub async fn next_suggestion(
        &self,
        user_id: &str,
        preferred: &[Dimension],
    ) -> EngineResult<Insight> {
        let recent = self
            .store
            .fetch_sessions(user_id, self.config.recent_window)
            .await?;
        let centroid = crate::space::centroid(&recent);

        let underexplored: Vec<Dimension> = Dimension::all()
            .filter(|d| centroid[d.index()] < self.config.underexplored_threshold)
            .collect();

        let from_profile_fallback = underexplored.is_empty();
        let suggested = if from_profile_fallback {
            preferred.to_vec()
        } else {
            underexplored
        };

        let finding = Finding::NextSuggestion {
            suggested,
            from_profile_fallback,
        };
        let rendered = self.renderer.render(&finding).await?;
        Ok(Self::into_insight(finding, rendered))
    }

    /// Profile-level trait dimensions.
    ///
    /// Normalizes a dense trait profile and reads it with the vector-level
    /// dominance rule at the trait threshold (0.6 by default) - a different
    /// threshold and a different ordering contract than session-level
    /// dominance, kept separate on purpose.
    pub fn profile_trait_dimensions(&self, profile: &[f32]) -> Vec<Dimension> {
        let normalized = embed_profile(profile);
        dominant_dimensions(&normalized, self.config.trait_dominant_threshold)
    }

    fn novel_insight(session: &Session, dominant: Vec<Dimension>) -> Insight {
        let tags = dominant.clone();
        Insight {
            finding: Finding::SessionComparison {
                session_id: session.id,
                dominant,
                neighbor_count: 0,
                mean_similarity: 0.0,
                novel: true,
            },
            text: NOVEL_EXPERIENCE_TEXT.to_string(),
            tags,
        }
    }

    fn into_insight(finding: Finding, rendered: RenderedInsight) -> Insight {
        let mut tags: Vec<Dimension> = Vec::new();
        for raw in &rendered.tags {
            if let Some(dim) = Dimension::from_name(raw) {
                if !tags.contains(&dim) {
                    tags.push(dim);
                }
            }
            // Unmatched free text is simply not tagged.
        }
        Insight {
            finding,
            text: rendered.text,
            tags,
        }
    }
}

/// The `count` highest- (or lowest-) variance dimensions, ties broken by
/// enumeration order.
fn variance_extremes(variance: &[f32], highest: bool) -> Vec<Dimension> {
    let mut order: Vec<usize> = (0..variance.len().min(Dimension::COUNT)).collect();
    order.sort_by(|&a, &b| {
        let cmp = variance[a]
            .partial_cmp(&variance[b])
            .unwrap_or(std::cmp::Ordering::Equal);
        let cmp = if highest { cmp.reverse() } else { cmp };
        cmp.then(a.cmp(&b))
    });
    order
        .into_iter()
        .take(VARIANCE_EXTREME_COUNT)
        .filter_map(Dimension::from_index)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variance_extremes_ranking() {
        let mut variance = vec![0.0f32; Dimension::COUNT];
        variance[Dimension::Food.index()] = 0.9;
        variance[Dimension::Order.index()] = 0.5;
        variance[Dimension::Power.index()] = 0.7;

        assert_eq!(
            variance_extremes(&variance, true),
            vec![Dimension::Food, Dimension::Power, Dimension::Order]
        );
    }

    #[test]
    fn test_variance_extremes_tie_break_by_enum_order() {
        let variance = vec![0.0f32; Dimension::COUNT];
        // All tied: the first three dimensions in enumeration order win.
        assert_eq!(
            variance_extremes(&variance, true),
            vec![Dimension::Order, Dimension::Enclosure, Dimension::Path]
        );
        assert_eq!(
            variance_extremes(&variance, false),
            vec![Dimension::Order, Dimension::Enclosure, Dimension::Path]
        );
    }
}
