use std::collections::HashMap;

use linfa::traits::{Fit, Predict};
use linfa::DatasetBase;
use linfa_clustering::KMeans;
use rand_xoshiro::rand_core::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

use super::features::FeatureMatrix;

/// Fixed seed so repeated builds over an unchanged snapshot produce
/// identical labels
const KMEANS_SEED: u64 = 42;
const MAX_ITERATIONS: u64 = 300;
const TOLERANCE: f64 = 1e-4;

/// Mapping from movie id to its affinity group label
///
/// Valid only for the snapshot it was built from; a new snapshot gets a new
/// assignment. Label numbering is meaningful within one assignment only.
#[derive(Debug, Clone, Default)]
pub struct ClusterAssignment {
    labels: HashMap<Uuid, usize>,
}

impl ClusterAssignment {
    /// An assignment over an empty catalog
    pub fn empty() -> Self {
        Self::default()
    }

    /// Group label of a movie, or `None` when the movie was not part of the
    /// snapshot this assignment was built from
    pub fn label_of(&self, movie_id: &Uuid) -> Option<usize> {
        self.labels.get(movie_id).copied()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Partitions the snapshot into at most `cluster_count` affinity groups
///
/// The effective group count is capped at the number of movies, so a small
/// catalog degrades gracefully instead of failing. An empty snapshot yields
/// an empty assignment.
pub fn assign_clusters(
    features: &FeatureMatrix,
    cluster_count: usize,
) -> AppResult<ClusterAssignment> {
    if features.is_empty() {
        return Ok(ClusterAssignment::empty());
    }

    let effective_k = cluster_count.clamp(1, features.len());
    if effective_k < cluster_count {
        tracing::debug!(
            requested = cluster_count,
            effective = effective_k,
            movies = features.len(),
            "Capping cluster count to catalog size"
        );
    }

    let dataset = DatasetBase::from(features.records().clone());
    let rng = Xoshiro256Plus::seed_from_u64(KMEANS_SEED);

    let model = KMeans::params_with_rng(effective_k, rng)
        .max_n_iterations(MAX_ITERATIONS)
        .tolerance(TOLERANCE)
        .fit(&dataset)
        .map_err(|e| AppError::Internal(format!("k-means fit failed: {}", e)))?;

    let predictions = model.predict(dataset);
    let labels = features
        .ids()
        .iter()
        .copied()
        .zip(predictions.targets.iter().copied())
        .collect();

    Ok(ClusterAssignment { labels })
}
