use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered account with its watch history
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    /// Unique identifier for the user
    pub id: Uuid,
    /// Display name
    pub username: String,
    /// Email address, unique across the store
    pub email: String,
    /// Argon2 hash of the account password
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Ids of movies the user has watched, in watch order
    pub watched: Vec<Uuid>,
    /// When the account was created
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Creates a new user with an empty watch history
    pub fn new(username: String, email: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            username,
            email,
            password_hash,
            watched: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Records that the user watched a movie; watching twice is a no-op
    pub fn watch(&mut self, movie_id: Uuid) {
        if !self.watched.contains(&movie_id) {
            self.watched.push(movie_id);
        }
    }

    pub fn has_watched(&self, movie_id: &Uuid) -> bool {
        self.watched.contains(movie_id)
    }
}
