//! Bounded k-means-like clustering over session embeddings.
//!
//! The iteration count is fixed rather than convergence-checked, keeping
//! worst-case cost flat as history grows. Initial centroid selection takes
//! an injectable random source: callers that need reproducible output
//! (tests, scheduled analytics) use [`cluster_seeded`], which pins a
//! ChaCha8 stream to a seed. Each run owns its centroid and assignment
//! buffers outright, so concurrent clustering calls share no mutable state.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::types::{Dimension, Session, SessionCluster};

use super::metrics::euclidean_distance;

/// Fixed number of assign/recompute iterations per clustering run.
pub const KMEANS_ITERATIONS: usize = 10;

/// Cluster sessions by embedding proximity with the default iteration count.
///
/// See [`cluster_with_iterations`] for the full contract.
pub fn cluster<R: Rng + ?Sized>(
    sessions: &[Session],
    k: usize,
    rng: &mut R,
) -> Vec<SessionCluster> {
    cluster_with_iterations(sessions, k, KMEANS_ITERATIONS, rng)
}

/// Cluster sessions with a deterministic seed.
///
/// Same seed, same sessions, same `k` - same clusters. This is the
/// reproducibility guarantee the randomized sampling alone cannot give.
pub fn cluster_seeded(sessions: &[Session], k: usize, seed: u64) -> Vec<SessionCluster> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    cluster(sessions, k, &mut rng)
}

/// Cluster sessions by embedding proximity.
///
/// Sessions without a well-formed 16-length embedding are excluded from
/// assignment entirely, every iteration. Degenerate cases:
/// - no qualifying sessions: empty result (clusters are non-empty by
///   definition);
/// - fewer qualifying sessions than `k` (or `k == 0` with any input):
///   a single cluster containing all of them - not an error.
///
/// Otherwise: seed `k` centroids by sampling `k` distinct sessions'
/// embeddings uniformly without replacement, then run a fixed number of
/// iterations - assign each session to the nearest centroid by Euclidean
/// distance, recompute each non-empty cluster's centroid as the mean of
/// its members, and leave empty clusters' centroids unchanged (no
/// reseeding). Only non-empty clusters are returned, so the result count
/// may be less than `k`.
pub fn cluster_with_iterations<R: Rng + ?Sized>(
    sessions: &[Session],
    k: usize,
    iterations: usize,
    rng: &mut R,
) -> Vec<SessionCluster> {
    let qualifying: Vec<&Session> = sessions
        .iter()
        .filter(|s| s.has_valid_embedding())
        .collect();

    if qualifying.is_empty() {
        return Vec::new();
    }

    let embeddings: Vec<&[f32]> = qualifying
        .iter()
        .map(|s| s.embedding().unwrap_or(&[]))
        .collect();

    if k == 0 || qualifying.len() < k {
        debug!(
            qualifying = qualifying.len(),
            k, "degenerate clustering input, returning single cluster"
        );
        let members = qualifying.iter().map(|s| s.id).collect();
        return vec![SessionCluster {
            centroid: mean_of(&embeddings),
            members,
        }];
    }

    let n = qualifying.len();
    let mut centroids: Vec<Vec<f32>> = rand::seq::index::sample(rng, n, k)
        .iter()
        .map(|i| embeddings[i].to_vec())
        .collect();
    let mut assignments = vec![0usize; n];

    for _ in 0..iterations {
        for (i, emb) in embeddings.iter().enumerate() {
            let mut best = 0usize;
            let mut best_dist = f32::INFINITY;
            for (c, centroid) in centroids.iter().enumerate() {
                let dist = euclidean_distance(emb, centroid);
                if dist < best_dist {
                    best_dist = dist;
                    best = c;
                }
            }
            assignments[i] = best;
        }

        let mut sums = vec![vec![0.0f32; Dimension::COUNT]; k];
        let mut counts = vec![0usize; k];
        for (i, &c) in assignments.iter().enumerate() {
            counts[c] += 1;
            for (acc, x) in sums[c].iter_mut().zip(embeddings[i].iter()) {
                *acc += x;
            }
        }
        for (c, &count) in counts.iter().enumerate() {
            if count > 0 {
                for x in sums[c].iter_mut() {
                    *x /= count as f32;
                }
                centroids[c] = std::mem::take(&mut sums[c]);
            }
        }
    }

    let mut member_ids: Vec<Vec<uuid::Uuid>> = vec![Vec::new(); k];
    for (i, &c) in assignments.iter().enumerate() {
        member_ids[c].push(qualifying[i].id);
    }

    centroids
        .into_iter()
        .zip(member_ids)
        .filter(|(_, members)| !members.is_empty())
        .map(|(centroid, members)| SessionCluster { centroid, members })
        .collect()
}

fn mean_of(embeddings: &[&[f32]]) -> Vec<f32> {
    let mut sum = vec![0.0f32; Dimension::COUNT];
    let mut count = 0usize;
    for emb in embeddings {
        if emb.len() == Dimension::COUNT {
            for (acc, x) in sum.iter_mut().zip(emb.iter()) {
                *acc += x;
            }
            count += 1;
        }
    }
    if count > 0 {
        for x in sum.iter_mut() {
            *x /= count as f32;
        }
    }
    sum
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PleasureVector;
    use std::collections::HashSet;

    fn session_with(dims: &[Dimension]) -> Session {
        let mut s = Session::new("user-1");
        s.vector = Some(PleasureVector::finalize(dims));
        s
    }

    #[test]
    fn test_no_qualifying_sessions_is_empty() {
        let sessions = vec![Session::new("user-1"), Session::new("user-1")];
        assert!(cluster_seeded(&sessions, 2, 7).is_empty());
    }

    #[test]
    fn test_fewer_than_k_returns_single_cluster() {
        let sessions = vec![
            session_with(&[Dimension::Order]),
            session_with(&[Dimension::Food]),
        ];
        let clusters = cluster_seeded(&sessions, 4, 7);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].size(), 2);
    }

    #[test]
    fn test_every_qualifying_session_in_exactly_one_cluster() {
        let sessions: Vec<Session> = vec![
            session_with(&[Dimension::Order]),
            session_with(&[Dimension::Order, Dimension::Enclosure]),
            session_with(&[Dimension::Food]),
            session_with(&[Dimension::Food, Dimension::Mobility]),
            session_with(&[Dimension::Power]),
            Session::new("user-1"), // no embedding, excluded
        ];
        let clusters = cluster_seeded(&sessions, 2, 42);
        assert!(!clusters.is_empty() && clusters.len() <= 2);

        let assigned: Vec<uuid::Uuid> =
            clusters.iter().flat_map(|c| c.members.iter().copied()).collect();
        let unique: HashSet<_> = assigned.iter().copied().collect();
        assert_eq!(assigned.len(), unique.len(), "no session in two clusters");
        assert_eq!(assigned.len(), 5, "all qualifying sessions assigned");
    }

    #[test]
    fn test_separated_groups_split_cleanly() {
        // Two tight groups on disjoint dimensions must not end up merged.
        let mut sessions = Vec::new();
        for _ in 0..4 {
            sessions.push(session_with(&[Dimension::Order, Dimension::Enclosure]));
            sessions.push(session_with(&[Dimension::Food, Dimension::Mobility]));
        }
        let clusters = cluster_seeded(&sessions, 2, 3);
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].size() + clusters[1].size(), 8);

        for c in &clusters {
            assert_eq!(c.size(), 4, "groups should split 4/4");
        }
    }

    #[test]
    fn test_same_seed_same_clusters() {
        let sessions: Vec<Session> = (0..12)
            .map(|i| {
                let d = Dimension::from_index(i % Dimension::COUNT).unwrap();
                session_with(&[d, Dimension::Path])
            })
            .collect();
        let a = cluster_seeded(&sessions, 3, 99);
        let b = cluster_seeded(&sessions, 3, 99);
        assert_eq!(a, b);
    }

    #[test]
    fn test_cluster_centroid_is_member_mean() {
        let sessions = vec![
            session_with(&[Dimension::Order]),
            session_with(&[Dimension::Order]),
        ];
        let clusters = cluster_seeded(&sessions, 4, 1);
        assert_eq!(clusters.len(), 1);
        // Both members are the identical one-hot vector; so is the mean.
        assert!((clusters[0].centroid[Dimension::Order.index()] - 1.0).abs() < 1e-6);
    }
}
