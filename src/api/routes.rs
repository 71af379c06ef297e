use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::request_id::{make_span_with_request_id, request_id_middleware};

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes
///
/// Request-id assignment runs outermost so the trace span and every handler
/// see the id; CORS is wide open, matching the deployment behind a gateway.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Users
        .route("/users", post(handlers::create_user))
        .route(
            "/users/:user_id/watch/:movie_id",
            post(handlers::watch_movie),
        )
        .route(
            "/users/:user_id/recommendations",
            get(handlers::get_recommendations),
        )
        // Movies
        .route("/movies", get(handlers::get_movies))
        .route("/movies", post(handlers::create_movie))
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
