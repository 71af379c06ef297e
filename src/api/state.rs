use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::config::Config;
use crate::models::{Movie, User};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub inner: Arc<RwLock<AppStateInner>>,
}

/// Inner state that can be modified
pub struct AppStateInner {
    pub movies: HashMap<Uuid, Movie>,
    pub users: HashMap<Uuid, User>,
}

impl AppState {
    /// Creates a new empty application state
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            inner: Arc::new(RwLock::new(AppStateInner {
                movies: HashMap::new(),
                users: HashMap::new(),
            })),
        }
    }
}

impl AppStateInner {
    /// Id-ordered copy of the catalog for one recommendation computation
    ///
    /// Sorting makes the snapshot independent of map iteration order, so a
    /// rebuilt model over an unchanged catalog sees identical input.
    pub fn catalog_snapshot(&self) -> Vec<Movie> {
        let mut movies: Vec<Movie> = self.movies.values().cloned().collect();
        movies.sort_by_key(|m| m.id);
        movies
    }

    pub fn email_registered(&self, email: &str) -> bool {
        self.users.values().any(|u| u.email == email)
    }
}
