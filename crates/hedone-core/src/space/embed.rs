//! Embedding constructors: dense 16-vectors from the three producer shapes.
//!
//! Every producer funnels through the same L2 normalization so that cosine
//! comparisons across session, profile, and mission embeddings are valid.

use crate::types::{Dimension, Session};

use super::metrics::normalize;

/// Build a dense embedding from a sparse activation map.
///
/// Untouched dimensions are zero; each activated dimension's raw intensity
/// lands at its fixed offset; the result is L2-normalized (the zero vector
/// is returned unchanged).
pub fn embed_activations(activations: &[(Dimension, f32)]) -> Vec<f32> {
    let mut dense = vec![0.0f32; Dimension::COUNT];
    for (dim, intensity) in activations {
        dense[dim.index()] = *intensity;
    }
    normalize(&mut dense);
    dense
}

/// Build a dense embedding from a session's activation map.
///
/// A session without a vector embeds to the zero vector - untouched
/// dimensions are zero and there is nothing else to write.
pub fn embed_session(session: &Session) -> Vec<f32> {
    match &session.vector {
        Some(vector) => embed_activations(vector.activations()),
        None => vec![0.0f32; Dimension::COUNT],
    }
}

/// Normalize a trait-level profile vector.
///
/// The same normalization applied to a dense profile supplied by the
/// profile layer; the input is copied, not mutated.
pub fn embed_profile(profile: &[f32]) -> Vec<f32> {
    let mut dense = profile.to_vec();
    normalize(&mut dense);
    dense
}

/// One-hot embedding for a set of targeted mission dimensions.
///
/// Every targeted dimension is set to 1.0, the rest to 0.0, then normalized.
pub fn embed_mission(dimensions: &[Dimension]) -> Vec<f32> {
    let mut dense = vec![0.0f32; Dimension::COUNT];
    for dim in dimensions {
        dense[dim.index()] = 1.0;
    }
    normalize(&mut dense);
    dense
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::space::metrics::l2_norm;

    #[test]
    fn test_embed_activations_offsets_and_norm() {
        let emb = embed_activations(&[
            (Dimension::Mobility, 1.0),
            (Dimension::Anxiety, 0.5),
        ]);
        assert_eq!(emb.len(), Dimension::COUNT);
        assert!(emb[Dimension::Mobility.index()] > emb[Dimension::Anxiety.index()]);
        assert_eq!(emb[Dimension::Food.index()], 0.0);
        assert!((l2_norm(&emb) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_embed_empty_activations_is_zero() {
        let emb = embed_activations(&[]);
        assert!(emb.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_embed_mission_one_hot() {
        let emb = embed_mission(&[Dimension::Path, Dimension::Horizon]);
        let expected = 1.0 / 2.0f32.sqrt();
        assert!((emb[Dimension::Path.index()] - expected).abs() < 1e-6);
        assert!((emb[Dimension::Horizon.index()] - expected).abs() < 1e-6);
        assert_eq!(emb[Dimension::Order.index()], 0.0);
    }

    #[test]
    fn test_embed_session_reads_activation_map() {
        use crate::types::PleasureVector;

        let mut session = Session::new("user-1");
        session.vector = Some(PleasureVector::finalize(&[Dimension::Repetition]));
        let emb = embed_session(&session);
        assert!((emb[Dimension::Repetition.index()] - 1.0).abs() < 1e-6);

        let bare = Session::new("user-1");
        assert!(embed_session(&bare).iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_embed_profile_does_not_mutate_input() {
        let profile = vec![2.0; Dimension::COUNT];
        let emb = embed_profile(&profile);
        assert_eq!(profile[0], 2.0);
        assert!((l2_norm(&emb) - 1.0).abs() < 1e-6);
    }
}
