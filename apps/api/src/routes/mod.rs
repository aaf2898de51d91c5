pub mod health;
pub mod index;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::conversion::handlers;
use crate::state::AppState;

/// Room for multipart boundaries and part headers on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state
        .config
        .max_upload_bytes
        .saturating_add(MULTIPART_OVERHEAD_BYTES);

    Router::new()
        .route("/", get(index::index_handler))
        .route("/health", get(health::health_handler))
        .route(
            "/convert",
            post(handlers::handle_convert).layer(DefaultBodyLimit::max(body_limit)),
        )
        .route("/download/:file_name", get(handlers::handle_download))
        .with_state(state)
}
