//! Content-based recommendation engine
//!
//! The catalog snapshot is partitioned into affinity groups by k-means over
//! per-movie features, the user's dominant group is inferred from their
//! watch history, and the highest-rated unseen movies of that group are
//! returned. The model is rebuilt from scratch for every request; nothing is
//! shared or cached across calls.

mod clustering;
mod features;
mod preference;

pub use clustering::{assign_clusters, ClusterAssignment};
pub use features::{extract_features, genre_tag_count, FeatureMatrix, FEATURE_DIM};
pub use preference::dominant_group;

use std::collections::HashSet;

use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{Movie, User};

/// Features and cluster labels built from one catalog snapshot
///
/// Exposed for diagnostics and tests; `Recommender::recommend` builds one
/// internally per request.
#[derive(Debug, Clone)]
pub struct RecommendationModel {
    features: FeatureMatrix,
    assignment: ClusterAssignment,
}

impl RecommendationModel {
    pub fn features(&self) -> &FeatureMatrix {
        &self.features
    }

    pub fn assignment(&self) -> &ClusterAssignment {
        &self.assignment
    }
}

/// Extracts features and clusters the snapshot in one pass
pub fn build_model(catalog: &[Movie], cluster_count: usize) -> AppResult<RecommendationModel> {
    let features = extract_features(catalog)?;
    let assignment = assign_clusters(&features, cluster_count)?;
    Ok(RecommendationModel {
        features,
        assignment,
    })
}

/// Selects recommendations for a user over a borrowed catalog snapshot
pub struct Recommender<'a> {
    catalog: &'a [Movie],
    cluster_count: usize,
}

impl<'a> Recommender<'a> {
    /// Creates a recommender over a catalog snapshot
    ///
    /// The snapshot should be id-ordered so cluster labels are a function of
    /// catalog content rather than of store iteration order.
    pub fn new(catalog: &'a [Movie], cluster_count: usize) -> Self {
        Self {
            catalog,
            cluster_count,
        }
    }

    /// Returns up to `count` unseen movies ranked by rating descending
    ///
    /// Users with no usable preference signal (nothing watched, or nothing
    /// watched that is still in the catalog) get the highest-rated catalog
    /// movies overall. Otherwise candidates are restricted to the user's
    /// dominant affinity group, which may return fewer than `count` movies.
    pub fn recommend(&self, user: &User, count: usize) -> AppResult<Vec<Movie>> {
        let watched: HashSet<Uuid> = user.watched.iter().copied().collect();

        if watched.is_empty() {
            tracing::debug!(user_id = %user.id, "No watch history, using top-rated fallback");
            return Ok(self.top_rated(&watched, count));
        }

        let model = build_model(self.catalog, self.cluster_count)?;

        let Some(group) = dominant_group(&user.watched, model.assignment()) else {
            tracing::debug!(
                user_id = %user.id,
                "Watch history matches nothing in the catalog, using top-rated fallback"
            );
            return Ok(self.top_rated(&watched, count));
        };

        let candidates: Vec<Movie> = self
            .catalog
            .iter()
            .filter(|m| model.assignment().label_of(&m.id) == Some(group))
            .filter(|m| !watched.contains(&m.id))
            .cloned()
            .collect();

        tracing::debug!(
            user_id = %user.id,
            group,
            candidates = candidates.len(),
            "Ranking candidates from dominant group"
        );

        Ok(rank_by_rating(candidates, count))
    }

    /// Cold-start fallback: best-rated catalog movies the user has not seen
    fn top_rated(&self, watched: &HashSet<Uuid>, count: usize) -> Vec<Movie> {
        let candidates: Vec<Movie> = self
            .catalog
            .iter()
            .filter(|m| !watched.contains(&m.id))
            .cloned()
            .collect();
        rank_by_rating(candidates, count)
    }
}

/// Sorts by rating descending and truncates
///
/// Equal ratings order by movie id so repeated calls over an unchanged
/// catalog return identical sequences.
fn rank_by_rating(mut candidates: Vec<Movie>, count: usize) -> Vec<Movie> {
    candidates.sort_by(|a, b| {
        b.rating_or_min()
            .partial_cmp(&a.rating_or_min())
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.id.cmp(&b.id))
    });
    candidates.truncate(count);
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(title: &str, genre: &str, year: i32, rating: f64) -> Movie {
        Movie::new(
            title.to_string(),
            genre.to_string(),
            year,
            String::new(),
            Some(rating),
        )
    }

    fn user() -> User {
        User::new(
            "ada".to_string(),
            "ada@example.com".to_string(),
            "hash".to_string(),
        )
    }

    /// Sorted snapshot, the order handlers hand to the recommender
    fn snapshot(mut movies: Vec<Movie>) -> Vec<Movie> {
        movies.sort_by_key(|m| m.id);
        movies
    }

    #[test]
    fn test_cold_start_returns_top_rated() {
        let catalog = snapshot(vec![
            movie("Low", "drama", 2000, 5.5),
            movie("High", "drama", 2001, 9.1),
            movie("Mid", "drama", 2002, 7.3),
        ]);
        let recommender = Recommender::new(&catalog, 5);

        let result = recommender.recommend(&user(), 2).unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].title, "High");
        assert_eq!(result[1].title, "Mid");
    }

    #[test]
    fn test_cold_start_caps_at_catalog_size() {
        let catalog = snapshot(vec![movie("Only", "drama", 2000, 6.0)]);
        let recommender = Recommender::new(&catalog, 5);

        let result = recommender.recommend(&user(), 5).unwrap();
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_empty_catalog_returns_empty() {
        let catalog: Vec<Movie> = Vec::new();
        let recommender = Recommender::new(&catalog, 5);

        let result = recommender.recommend(&user(), 5).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_history_outside_catalog_falls_back() {
        let catalog = snapshot(vec![
            movie("A", "drama", 2000, 8.0),
            movie("B", "drama", 2001, 7.0),
        ]);
        let recommender = Recommender::new(&catalog, 2);

        let mut veteran = user();
        veteran.watch(Uuid::new_v4());

        let fresh = user();

        // Same fallback as a brand-new user over the same catalog
        assert_eq!(
            recommender.recommend(&veteran, 5).unwrap(),
            recommender.recommend(&fresh, 5).unwrap()
        );
    }

    #[test]
    fn test_recommends_unseen_movies_from_dominant_group() {
        // Two era-separated groups: {A, B} recent, {C} old
        let a = movie("A", "action,sci-fi", 2010, 9.0);
        let b = movie("B", "action", 2012, 7.0);
        let c = movie("C", "drama", 1950, 5.0);
        let catalog = snapshot(vec![a.clone(), b.clone(), c.clone()]);

        let mut watcher = user();
        watcher.watch(a.id);

        let recommender = Recommender::new(&catalog, 2);
        let result = recommender.recommend(&watcher, 5).unwrap();

        // A is watched, C is in the other group
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, b.id);
    }

    #[test]
    fn test_watched_movies_never_recommended() {
        let movies: Vec<Movie> = (0..6)
            .map(|i| movie(&format!("M{}", i), "drama", 2010 + i, 6.0 + i as f64 * 0.3))
            .collect();
        let catalog = snapshot(movies);

        let mut binger = user();
        for m in catalog.iter().take(3) {
            binger.watch(m.id);
        }

        let recommender = Recommender::new(&catalog, 2);
        let result = recommender.recommend(&binger, 10).unwrap();

        for recommended in &result {
            assert!(!binger.has_watched(&recommended.id));
        }
    }

    #[test]
    fn test_group_results_ranked_by_rating() {
        let catalog = snapshot(vec![
            movie("Seed", "action", 2010, 6.0),
            movie("Best", "action", 2011, 9.0),
            movie("Good", "action", 2012, 8.0),
            movie("Okay", "action", 2013, 7.0),
            movie("Far", "drama", 1950, 9.9),
        ]);
        let seed = catalog.iter().find(|m| m.title == "Seed").unwrap();

        let mut watcher = user();
        watcher.watch(seed.id);

        let recommender = Recommender::new(&catalog, 2);
        let result = recommender.recommend(&watcher, 5).unwrap();

        let titles: Vec<&str> = result.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["Best", "Good", "Okay"]);
    }

    #[test]
    fn test_repeated_calls_are_identical() {
        let movies: Vec<Movie> = (0..12)
            .map(|i| {
                movie(
                    &format!("M{}", i),
                    if i % 2 == 0 { "drama" } else { "action,thriller" },
                    1960 + i * 5,
                    5.0 + (i % 5) as f64,
                )
            })
            .collect();
        let catalog = snapshot(movies);

        let mut watcher = user();
        watcher.watch(catalog[0].id);
        watcher.watch(catalog[4].id);

        let recommender = Recommender::new(&catalog, 4);
        let first = recommender.recommend(&watcher, 5).unwrap();
        let second = recommender.recommend(&watcher, 5).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_build_model_labels_whole_catalog() {
        let catalog = snapshot(vec![
            movie("A", "drama", 1990, 7.0),
            movie("B", "action", 2000, 8.0),
            movie("C", "comedy", 2010, 6.0),
        ]);

        let model = build_model(&catalog, 5).unwrap();

        assert_eq!(model.features().len(), 3);
        assert_eq!(model.assignment().len(), 3);
        for m in &catalog {
            assert!(model.assignment().label_of(&m.id).is_some());
        }
    }
}
