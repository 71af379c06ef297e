use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A catalog entry eligible for recommendation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    /// Unique identifier for the movie
    pub id: Uuid,
    /// Title of the movie
    pub title: String,
    /// Comma-separated genre tags (e.g. "drama,thriller")
    pub genre: String,
    /// Year of release
    pub release_year: i32,
    /// Short plot summary
    pub description: String,
    /// Average rating on a 0.0-10.0 scale; absent for unrated entries
    pub rating: Option<f64>,
    /// When the movie was added to the catalog
    pub created_at: DateTime<Utc>,
}

impl Movie {
    /// Creates a new movie with a fresh id
    pub fn new(
        title: String,
        genre: String,
        release_year: i32,
        description: String,
        rating: Option<f64>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            genre,
            release_year,
            description,
            rating,
            created_at: Utc::now(),
        }
    }

    /// Rating used for ranking; unrated movies sort below everything else
    pub fn rating_or_min(&self) -> f64 {
        self.rating.unwrap_or(f64::NEG_INFINITY)
    }
}
