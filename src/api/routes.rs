use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers;
use super::AppState;
use crate::middleware::request_id::{make_span_with_request_id, request_id_middleware};

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        // Catalog
        .route("/songs", get(handlers::get_songs).post(handlers::create_song))
        .route("/songs/:song_id", get(handlers::get_song))
        // Ratings and preferences
        .route("/ratings", post(handlers::rate_song))
        .route("/users/:user_id/ratings", get(handlers::get_user_ratings))
        .route(
            "/users/:user_id/preferences",
            get(handlers::get_preferences).put(handlers::set_preferences),
        )
        // Recommendations
        .route(
            "/recommendations/similar/:song_id",
            get(handlers::similar_songs),
        )
        .route("/recommendations/genre", get(handlers::genre_recommendations))
        .route("/recommendations/popular", get(handlers::popular_songs))
        .route(
            "/users/:user_id/recommendations",
            get(handlers::personal_recommendations),
        )
        .route(
            "/users/:user_id/recommendations/genre",
            get(handlers::preferred_genre_recommendations),
        )
        // Maintenance
        .route("/admin/reload", post(handlers::reload))
}
