//! Aggregate computations over session histories.
//!
//! Historical sessions are read-only inputs borrowed from the storage
//! collaborator. Sessions with a missing or wrong-length embedding are
//! skipped, not zero-filled: one corrupt record must not distort or abort
//! an aggregate over many.

use tracing::debug;

use crate::types::{Dimension, Session};

use super::metrics::cosine_similarity;

/// Score sessions by cosine similarity to `query` and return the top `k`.
///
/// Sessions without a well-formed embedding are filtered out before
/// scoring. The sort is stable, so ties keep input order.
pub fn find_similar<'a>(
    query: &[f32],
    sessions: &'a [Session],
    k: usize,
) -> Vec<(&'a Session, f32)> {
    let mut scored: Vec<(&Session, f32)> = sessions
        .iter()
        .filter(|s| s.has_valid_embedding())
        .map(|s| {
            let score = cosine_similarity(query, s.embedding().unwrap_or(&[]));
            (s, score)
        })
        .collect();

    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(k);
    scored
}

/// Mean embedding across all sessions that carry one.
///
/// Returns the 16-zero vector when no session qualifies.
pub fn centroid(sessions: &[Session]) -> Vec<f32> {
    let mut sum = vec![0.0f32; Dimension::COUNT];
    let mut count = 0usize;

    for session in sessions {
        match session.embedding() {
            Some(emb) if emb.len() == Dimension::COUNT => {
                for (acc, x) in sum.iter_mut().zip(emb.iter()) {
                    *acc += x;
                }
                count += 1;
            }
            _ => {
                debug!(session_id = %session.id, "skipping session without valid embedding");
            }
        }
    }

    if count > 0 {
        for x in sum.iter_mut() {
            *x /= count as f32;
        }
    }
    sum
}

/// Per-dimension population variance around the centroid.
///
/// Same skip rule as [`centroid`]; a single qualifying session (or none)
/// yields all zeros.
pub fn dimension_variance(sessions: &[Session]) -> Vec<f32> {
    let mean = centroid(sessions);
    let mut sum_sq = vec![0.0f32; Dimension::COUNT];
    let mut count = 0usize;

    for session in sessions {
        if let Some(emb) = session.embedding() {
            if emb.len() == Dimension::COUNT {
                for (acc, (x, m)) in sum_sq.iter_mut().zip(emb.iter().zip(mean.iter())) {
                    let d = x - m;
                    *acc += d * d;
                }
                count += 1;
            }
        }
    }

    if count > 0 {
        for x in sum_sq.iter_mut() {
            *x /= count as f32;
        }
    }
    sum_sq
}

/// Vector-level dominant dimensions.
///
/// Dimensions whose value meets or exceeds `threshold`, in fixed
/// enumeration order - NOT sorted by magnitude. This deliberately differs
/// from the session-level definition
/// ([`crate::types::PleasureVector::dominant_dimensions`]: strictly above,
/// sorted descending); downstream consumers depend on each behavior
/// separately, so the two are kept as distinctly named operations.
///
/// A wrong-length vector yields the empty list.
pub fn dominant_dimensions(vector: &[f32], threshold: f32) -> Vec<Dimension> {
    if vector.len() != Dimension::COUNT {
        return Vec::new();
    }
    Dimension::all()
        .filter(|d| vector[d.index()] >= threshold)
        .collect()
}

/// Legacy two-bucket projection: sum of the first 7 dimensions vs. sum of
/// the last 9.
///
/// A crude linear split kept for visual fidelity with historical renderings.
/// It is NOT dimensionality reduction in any principled sense and must not
/// be mistaken for PCA. A wrong-length vector projects to `[0, 0]`.
pub fn legacy_projection(vector: &[f32]) -> [f32; 2] {
    if vector.len() != Dimension::COUNT {
        return [0.0, 0.0];
    }
    let first: f32 = vector[..7].iter().sum();
    let second: f32 = vector[7..].iter().sum();
    [first, second]
}
