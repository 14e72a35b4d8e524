//! API routes.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{get_job_status, health, start_transcode, upload_subtitle};
use crate::state::AppState;

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    let admin_routes = Router::new()
        .route("/movies/:movie_id/transcode", post(start_transcode))
        .route("/movies/:movie_id/subtitles", post(upload_subtitle))
        .route("/jobs/:job_id", get(get_job_status));

    Router::new()
        .route("/health", get(health))
        .nest("/admin", admin_routes)
        .layer(DefaultBodyLimit::max(state.config.max_body_size))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
