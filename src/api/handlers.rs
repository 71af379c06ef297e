use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::request_id::RequestId;
use crate::models::{Movie, User};
use crate::services::{auth, recommender::Recommender};

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateMovieRequest {
    pub title: String,
    pub genre: String,
    pub release_year: i32,
    pub description: String,
    pub rating: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct MovieResponse {
    pub id: Uuid,
    pub title: String,
    pub genre: String,
    pub release_year: i32,
    pub description: String,
    pub rating: Option<f64>,
}

impl From<&Movie> for MovieResponse {
    fn from(movie: &Movie) -> Self {
        Self {
            id: movie.id,
            title: movie.title.clone(),
            genre: movie.genre.clone(),
            release_year: movie.release_year,
            description: movie.description.clone(),
            rating: movie.rating,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListMoviesQuery {
    #[serde(default)]
    pub skip: usize,
    #[serde(default = "default_list_limit")]
    pub limit: usize,
}

fn default_list_limit() -> usize {
    100
}

#[derive(Debug, Deserialize)]
pub struct RecommendationsQuery {
    pub count: Option<usize>,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Register a new user
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let password_hash = auth::hash_password(&request.password)?;

    let mut inner = state.inner.write().await;
    if inner.email_registered(&request.email) {
        return Err(AppError::InvalidInput("Email already registered".to_string()));
    }

    let user = User::new(request.username, request.email, password_hash);
    let response = UserResponse::from(&user);
    inner.users.insert(user.id, user);

    Ok((StatusCode::CREATED, Json(response)))
}

/// Add a movie to the catalog
pub async fn create_movie(
    State(state): State<AppState>,
    Json(request): Json<CreateMovieRequest>,
) -> AppResult<(StatusCode, Json<MovieResponse>)> {
    if let Some(rating) = request.rating {
        if !rating.is_finite() || !(0.0..=10.0).contains(&rating) {
            return Err(AppError::InvalidInput(format!(
                "Rating must be between 0.0 and 10.0, got {}",
                rating
            )));
        }
    }

    let movie = Movie::new(
        request.title,
        request.genre,
        request.release_year,
        request.description,
        request.rating,
    );
    let response = MovieResponse::from(&movie);

    let mut inner = state.inner.write().await;
    inner.movies.insert(movie.id, movie);

    Ok((StatusCode::CREATED, Json(response)))
}

/// List catalog movies, id-ordered and paginated
pub async fn get_movies(
    State(state): State<AppState>,
    Query(params): Query<ListMoviesQuery>,
) -> Json<Vec<MovieResponse>> {
    let inner = state.inner.read().await;
    let movies: Vec<MovieResponse> = inner
        .catalog_snapshot()
        .iter()
        .skip(params.skip)
        .take(params.limit)
        .map(MovieResponse::from)
        .collect();
    Json(movies)
}

/// Record that a user watched a movie; repeat watches are no-ops
pub async fn watch_movie(
    State(state): State<AppState>,
    Path((user_id, movie_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<Value>> {
    let mut inner = state.inner.write().await;

    if !inner.movies.contains_key(&movie_id) {
        return Err(AppError::MovieNotFound(movie_id));
    }

    let user = inner
        .users
        .get_mut(&user_id)
        .ok_or(AppError::UserNotFound(user_id))?;
    user.watch(movie_id);

    Ok(Json(json!({ "message": "Movie watched successfully" })))
}

/// Recommend unseen movies for a user
pub async fn get_recommendations(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(user_id): Path<Uuid>,
    Query(params): Query<RecommendationsQuery>,
) -> AppResult<Json<Vec<MovieResponse>>> {
    let count = params.count.unwrap_or(state.config.recommendation_count);

    let inner = state.inner.read().await;
    let user = inner
        .users
        .get(&user_id)
        .ok_or(AppError::UserNotFound(user_id))?;

    let catalog = inner.catalog_snapshot();

    tracing::info!(
        request_id = %request_id,
        user_id = %user_id,
        catalog_size = catalog.len(),
        watched = user.watched.len(),
        count,
        "Computing recommendations"
    );

    let recommender = Recommender::new(&catalog, state.config.cluster_count);
    let recommendations = recommender.recommend(user, count)?;

    Ok(Json(
        recommendations.iter().map(MovieResponse::from).collect(),
    ))
}
