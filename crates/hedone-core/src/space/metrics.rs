//! Dense vector similarity and distance primitives.
//!
//! All functions are total: degenerate inputs (empty vectors, mismatched
//! lengths, zero norms) yield defined neutral values rather than errors or
//! NaN. A single corrupt embedding must never abort an aggregate
//! computation, so the guards here return values that rank such inputs
//! harmlessly (zero similarity, infinite distance).

/// L2 norm (Euclidean length) of a vector.
#[inline]
pub fn l2_norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// Normalize a vector to unit length in-place.
///
/// Does nothing if the vector has zero magnitude: normalization of the zero
/// vector is a defined no-op, not an error.
#[inline]
pub fn normalize(v: &mut [f32]) {
    let norm = l2_norm(v);
    if norm > f32::EPSILON {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}

/// Cosine similarity between two dense vectors.
///
/// Returns 0.0 if either input is empty or the lengths mismatch, and 0.0 if
/// either norm is zero - guarding divide-by-zero rather than producing NaN.
/// The range is conceptually `[-1, 1]`, but pleasure dimensions are
/// non-negative so in practice scores land in `[0, 1]`.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.is_empty() || b.is_empty() || a.len() != b.len() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a = l2_norm(a);
    let norm_b = l2_norm(b);

    if norm_a < f32::EPSILON || norm_b < f32::EPSILON {
        return 0.0;
    }

    (dot / (norm_a * norm_b)).clamp(-1.0, 1.0)
}

/// Euclidean distance between two dense vectors.
///
/// Returns `+∞` for mismatched lengths: a sentinel meaning "incomparable",
/// chosen so that mismatched vectors always sort last in nearest-neighbor
/// ranking instead of crashing the ranking.
pub fn euclidean_distance(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return f32::INFINITY;
    }
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f32>()
        .sqrt()
}
