//! Deterministic stub implementation of InsightRenderer.
//!
//! Produces fixed-template prose from the structured finding and echoes the
//! finding's dimensions back as tags, the way the hosted model is prompted
//! to. Same finding, same output - which is exactly what tests need.

use async_trait::async_trait;

use crate::error::EngineResult;
use crate::traits::InsightRenderer;
use crate::types::{Dimension, Finding, RenderedInsight};

/// Template-based renderer for tests and offline development.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateRenderer;

impl TemplateRenderer {
    /// Create a new template renderer.
    pub fn new() -> Self {
        Self
    }

    fn name_list(dims: &[Dimension]) -> String {
        if dims.is_empty() {
            return "nothing in particular".to_string();
        }
        dims.iter()
            .map(|d| d.name())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[async_trait]
impl InsightRenderer for TemplateRenderer {
    async fn render(&self, finding: &Finding) -> EngineResult<RenderedInsight> {
        let (text, tags) = match finding {
            Finding::SessionComparison {
                dominant,
                neighbor_count,
                mean_similarity,
                ..
            } => (
                format!(
                    "This session leaned on {}. It echoes {} earlier sessions (mean similarity {:.2}).",
                    Self::name_list(dominant),
                    neighbor_count,
                    mean_similarity
                ),
                dominant.clone(),
            ),
            Finding::Weekly {
                session_count,
                cluster_sizes,
                most_varied,
                least_explored,
            } => (
                format!(
                    "Across {} sessions in {} groups, {} moved the most while {} stayed quiet.",
                    session_count,
                    cluster_sizes.len(),
                    Self::name_list(most_varied),
                    Self::name_list(least_explored)
                ),
                most_varied
                    .iter()
                    .chain(least_explored.iter())
                    .copied()
                    .collect(),
            ),
            Finding::NextSuggestion {
                suggested,
                from_profile_fallback,
            } => (
                if *from_profile_fallback {
                    format!(
                        "You've been covering ground evenly; leaning into {} usually suits this time of day.",
                        Self::name_list(suggested)
                    )
                } else {
                    format!("You haven't touched {} lately. Worth a detour?", Self::name_list(suggested))
                },
                suggested.clone(),
            ),
        };

        Ok(RenderedInsight {
            text,
            tags: tags.into_iter().map(|d| d.name().to_string()).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_render_is_deterministic() {
        let renderer = TemplateRenderer::new();
        let finding = Finding::SessionComparison {
            session_id: Uuid::nil(),
            dominant: vec![Dimension::Path, Dimension::Food],
            neighbor_count: 3,
            mean_similarity: 0.82,
            novel: false,
        };
        let a = renderer.render(&finding).await.unwrap();
        let b = renderer.render(&finding).await.unwrap();
        assert_eq!(a, b);
        assert!(!a.text.is_empty());
        assert_eq!(a.tags, vec!["path".to_string(), "food".to_string()]);
    }

    #[tokio::test]
    async fn test_render_suggestion_fallback_wording() {
        let renderer = TemplateRenderer::new();
        let finding = Finding::NextSuggestion {
            suggested: vec![Dimension::Enclosure],
            from_profile_fallback: true,
        };
        let rendered = renderer.render(&finding).await.unwrap();
        assert!(rendered.text.contains("time of day"));
        assert_eq!(rendered.tags, vec!["enclosure".to_string()]);
    }
}
