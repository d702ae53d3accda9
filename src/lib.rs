pub mod catalog;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod naming;
pub mod storage;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use models::AppState;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

/// Build the full application router over shared state. Stored files are
/// served straight from the upload directory; axum's default body limit is
/// lifted because the upload handler enforces its own ceiling.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::index_handler))
        .route("/upload", post(handlers::upload_handler))
        .route("/videos", get(handlers::list_videos_handler))
        .route("/video/:id", get(handlers::get_video_handler))
        .nest_service("/uploads", ServeDir::new(&state.config.upload_dir))
        .layer(DefaultBodyLimit::disable())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
