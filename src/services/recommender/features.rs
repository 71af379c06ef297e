use ndarray::Array2;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::Movie;

/// Feature dimensions per movie: rating, release year, genre tag count
pub const FEATURE_DIM: usize = 3;

/// Dense numeric features for a catalog snapshot
///
/// One row per movie, in the same order as `ids`. Values are fed to the
/// clusterer exactly as extracted; no scaling is applied, so release year
/// dominates euclidean distances.
#[derive(Debug, Clone)]
pub struct FeatureMatrix {
    ids: Vec<Uuid>,
    records: Array2<f64>,
}

impl FeatureMatrix {
    /// Movie ids aligned with the matrix rows
    pub fn ids(&self) -> &[Uuid] {
        &self.ids
    }

    /// The raw feature rows
    pub fn records(&self) -> &Array2<f64> {
        &self.records
    }

    /// Number of movies in the snapshot
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Converts a catalog snapshot into a feature matrix
///
/// Fails with [`AppError::InvalidItem`] when a movie carries no usable
/// rating; catalog integrity is owned by the store, not the recommender.
pub fn extract_features(catalog: &[Movie]) -> AppResult<FeatureMatrix> {
    let mut ids = Vec::with_capacity(catalog.len());
    let mut data = Vec::with_capacity(catalog.len() * FEATURE_DIM);

    for movie in catalog {
        let rating = movie
            .rating
            .filter(|r| r.is_finite())
            .ok_or_else(|| AppError::InvalidItem(format!("movie {} has no rating", movie.id)))?;

        data.push(rating);
        data.push(f64::from(movie.release_year));
        data.push(genre_tag_count(&movie.genre) as f64);
        ids.push(movie.id);
    }

    let records = Array2::from_shape_vec((catalog.len(), FEATURE_DIM), data)
        .map_err(|e| AppError::Internal(format!("feature matrix shape: {}", e)))?;

    Ok(FeatureMatrix { ids, records })
}

/// Number of non-empty comma-separated tags in a genre descriptor
pub fn genre_tag_count(genre: &str) -> usize {
    genre.split(',').filter(|tag| !tag.trim().is_empty()).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(title: &str, genre: &str, year: i32, rating: Option<f64>) -> Movie {
        Movie::new(title.to_string(), genre.to_string(), year, String::new(), rating)
    }

    #[test]
    fn test_genre_tag_count() {
        assert_eq!(genre_tag_count(""), 0);
        assert_eq!(genre_tag_count("drama"), 1);
        assert_eq!(genre_tag_count("action,sci-fi,thriller"), 3);
        assert_eq!(genre_tag_count("action, , sci-fi,"), 2);
    }

    #[test]
    fn test_rows_align_with_ids() {
        let movies = vec![
            movie("A", "action,sci-fi", 1999, Some(8.7)),
            movie("B", "drama", 1972, Some(9.2)),
        ];
        let features = extract_features(&movies).unwrap();

        assert_eq!(features.len(), 2);
        assert_eq!(features.ids(), &[movies[0].id, movies[1].id]);
        assert_eq!(features.records().shape(), &[2, FEATURE_DIM]);
        assert_eq!(features.records()[[0, 0]], 8.7);
        assert_eq!(features.records()[[0, 1]], 1999.0);
        assert_eq!(features.records()[[0, 2]], 2.0);
        assert_eq!(features.records()[[1, 2]], 1.0);
    }

    #[test]
    fn test_empty_catalog_gives_empty_matrix() {
        let features = extract_features(&[]).unwrap();
        assert!(features.is_empty());
        assert_eq!(features.records().nrows(), 0);
    }

    #[test]
    fn test_missing_rating_is_invalid() {
        let movies = vec![movie("A", "drama", 2001, None)];
        let err = extract_features(&movies).unwrap_err();
        assert!(matches!(err, AppError::InvalidItem(_)));
    }

    #[test]
    fn test_non_finite_rating_is_invalid() {
        let movies = vec![movie("A", "drama", 2001, Some(f64::NAN))];
        let err = extract_features(&movies).unwrap_err();
        assert!(matches!(err, AppError::InvalidItem(_)));
    }
}
