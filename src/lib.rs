pub mod app_state;
pub mod clients;
pub mod config;
pub mod error;
pub mod prompt;
pub mod routes;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use app_state::AppState;
pub use config::Config;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health",           get(routes::health::handler))
        .route("/upload",           post(routes::upload::handler))
        .route("/synthesize_audio", post(routes::synthesize::handler))
        // 5 MB body limit — 1 MB headroom above the vision API's 4 MB image cap.
        .layer(DefaultBodyLimit::max(5 * 1024 * 1024))
        // Allow the frontend (any local origin) to reach this localhost server.
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
