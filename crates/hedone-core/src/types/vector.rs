//! The pleasure vector: sparse activation map plus dense embedding.
//!
//! Two representations coexist and stay consistent:
//! - the *activation map*: only dimensions explicitly touched during a
//!   session, in first-activation order, with raw intensities;
//! - the dense 16-length *embedding*: derived, L2-normalized to unit length
//!   for similarity comparisons (the zero vector normalizes to itself).
//!
//! Session-level dominant dimensions (intensity above a threshold, sorted
//! descending) live here. The vector-level definition (fixed order, meets
//! threshold, unsorted) lives in [`crate::space`] - the two are distinct
//! operations and downstream consumers depend on each separately.

use serde::{Deserialize, Serialize};

use super::Dimension;
use crate::space::embed::embed_activations;

/// Number of activated dimensions treated as *primary* at finalization.
pub const PRIMARY_DIMENSION_COUNT: usize = 3;

/// Intensity floor at finalization: no activated dimension falls below this,
/// regardless of how late it was activated.
pub const INTENSITY_FLOOR: f32 = 0.3;

/// Per-position intensity decay at finalization.
pub const INTENSITY_DECAY_STEP: f32 = 0.1;

/// A mapping from [`Dimension`] to intensity, with a derived dense embedding.
///
/// Intensities live in `[0.0, 1.0]` by convention, though foreign producers
/// are not strictly clamped; the engine's own finalization rule always emits
/// values in `[0.3, 1.0]`.
///
/// # Representation invariant
///
/// `embedding` is the L2-normalized dense projection of `activations` for
/// every vector this engine constructs. Deserialized historical data may
/// carry a malformed embedding (wrong length); analytics treat that as a
/// skip condition, never a hard error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PleasureVector {
    /// Sparse activation map in first-activation order, duplicate-free.
    activations: Vec<(Dimension, f32)>,
    /// Dense 16-length embedding, L2-normalized.
    embedding: Vec<f32>,
}

impl PleasureVector {
    /// Build a vector from ordered `(dimension, intensity)` pairs.
    ///
    /// Later duplicates of a dimension are ignored; first activation wins
    /// and insertion order is preserved. The dense embedding is derived by
    /// writing each raw intensity at the dimension's fixed offset and
    /// L2-normalizing the result.
    pub fn from_activations<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (Dimension, f32)>,
    {
        let mut activations: Vec<(Dimension, f32)> = Vec::new();
        for (dim, intensity) in pairs {
            if !activations.iter().any(|(d, _)| *d == dim) {
                activations.push((dim, intensity));
            }
        }

        let embedding = embed_activations(&activations);
        Self {
            activations,
            embedding,
        }
    }

    /// Finalize a session's accumulator into its pleasure vector.
    ///
    /// Given the ordered accumulator `[d0, d1, d2, ...]`, the intensity for
    /// the dimension at position `i` is `max(0.3, 1.0 - i * 0.1)`: activation
    /// order drives a decaying-intensity heuristic with a floor. The first 3
    /// dimensions are *primary*, the remainder *secondary*.
    ///
    /// This rule is reproduced bit-for-bit for compatibility with historical
    /// data; it is a coarse proxy for duration-weighted intensity and must
    /// not be "improved" without a data migration.
    pub fn finalize(accumulator: &[Dimension]) -> Self {
        Self::from_activations(accumulator.iter().enumerate().map(|(i, &dim)| {
            let intensity = (1.0 - i as f32 * INTENSITY_DECAY_STEP).max(INTENSITY_FLOOR);
            (dim, intensity)
        }))
    }

    /// The sparse activation map, in first-activation order.
    pub fn activations(&self) -> &[(Dimension, f32)] {
        &self.activations
    }

    /// Raw intensity recorded for a dimension, if it was activated.
    pub fn activation(&self, dim: Dimension) -> Option<f32> {
        self.activations
            .iter()
            .find(|(d, _)| *d == dim)
            .map(|(_, v)| *v)
    }

    /// The dense L2-normalized embedding.
    pub fn embedding(&self) -> &[f32] {
        &self.embedding
    }

    /// True when no dimension was activated.
    pub fn is_empty(&self) -> bool {
        self.activations.is_empty()
    }

    /// Primary dimensions: the first 3 activated, in activation order.
    pub fn primary_dimensions(&self) -> Vec<Dimension> {
        self.activations
            .iter()
            .take(PRIMARY_DIMENSION_COUNT)
            .map(|(d, _)| *d)
            .collect()
    }

    /// Secondary dimensions: everything activated after the first 3.
    pub fn secondary_dimensions(&self) -> Vec<Dimension> {
        self.activations
            .iter()
            .skip(PRIMARY_DIMENSION_COUNT)
            .map(|(d, _)| *d)
            .collect()
    }

    /// Session-level dominant dimensions.
    ///
    /// Activation-map entries with intensity strictly above `threshold`,
    /// sorted descending by intensity (stable, so activation order breaks
    /// ties). Post-hoc analysis passes 0.3; profile-level trait analysis
    /// passes 0.6. The two contexts use different thresholds and must not
    /// be confused.
    ///
    /// Distinct from [`crate::space::dominant_dimensions`], which reads a
    /// dense vector in fixed enumeration order without sorting.
    pub fn dominant_dimensions(&self, threshold: f32) -> Vec<Dimension> {
        let mut dominant: Vec<(Dimension, f32)> = self
            .activations
            .iter()
            .filter(|(_, v)| *v > threshold)
            .copied()
            .collect();
        dominant.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        dominant.into_iter().map(|(d, _)| d).collect()
    }
}
