//! Structured analytics findings and rendered insights.
//!
//! A [`Finding`] is the engine's half of the contract with the AI rendering
//! collaborator: structured numeric and dimension context, never wording.
//! The collaborator returns free text plus dimension tags, which the engine
//! matches back to the closed enumeration as a [`RenderedInsight`].

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Dimension;

/// A structured (non-prose) analytics result.
///
/// Handed to the AI rendering collaborator for natural-language rendering;
/// the engine supplies only the numbers and dimension lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Finding {
    /// Comparison of a just-ended session against its nearest neighbors.
    SessionComparison {
        /// The session being compared.
        session_id: Uuid,
        /// Session-level dominant dimensions of the ended session.
        dominant: Vec<Dimension>,
        /// How many historical neighbors were found.
        neighbor_count: usize,
        /// Mean cosine similarity to the neighbors (0.0 when none).
        mean_similarity: f32,
        /// True when no similar history exists and the canned novel-experience
        /// insight short-circuits the renderer.
        novel: bool,
    },

    /// Weekly aggregate over a supplied session set.
    Weekly {
        /// Number of sessions analyzed.
        session_count: usize,
        /// Member count of each discovered cluster.
        cluster_sizes: Vec<usize>,
        /// The 3 highest-variance dimensions, ties broken by enumeration order.
        most_varied: Vec<Dimension>,
        /// The 3 lowest-variance dimensions, ties broken by enumeration order.
        least_explored: Vec<Dimension>,
    },

    /// Suggestion for what to explore next.
    NextSuggestion {
        /// Dimensions to suggest: those whose recent centroid magnitude is
        /// below the underexplored threshold, or the user's time-of-day
        /// preferred dimensions when none are.
        suggested: Vec<Dimension>,
        /// True when the suggestion fell back to the profile's preferred
        /// dimensions because nothing was underexplored.
        from_profile_fallback: bool,
    },
}

/// Free text plus echoed dimension tags from the AI rendering collaborator.
///
/// The engine treats rendering as an opaque text-in/text-out call with no
/// retries and no schema beyond "non-empty string, plus zero or more
/// recognized dimension names".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedInsight {
    /// Rendered natural-language text. Non-empty.
    pub text: String,
    /// Dimension names echoed back from the text, as free text.
    pub tags: Vec<String>,
}

/// A finding together with its rendered prose and matched dimension tags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    /// The structured finding the prose was rendered from.
    pub finding: Finding,
    /// Natural-language text for the UI.
    pub text: String,
    /// Renderer tags that resolved to real dimensions; unmatched tags are
    /// dropped silently.
    pub tags: Vec<Dimension>,
}
