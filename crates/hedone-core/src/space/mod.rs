//! VectorSpace: pure functions over 16-length embeddings and session sets.
//!
//! Nothing in this module holds mutable state; every function reads its
//! inputs and returns fresh values, so independent analytics queries may
//! run in parallel.

pub mod clustering;
pub mod embed;
pub mod metrics;

mod aggregate;

pub use aggregate::{
    centroid, dimension_variance, dominant_dimensions, find_similar, legacy_projection,
};
pub use clustering::{cluster, cluster_seeded, cluster_with_iterations, KMEANS_ITERATIONS};
pub use embed::{embed_activations, embed_mission, embed_profile, embed_session};
pub use metrics::{cosine_similarity, euclidean_distance, l2_norm, normalize};
