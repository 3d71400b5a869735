pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::intake::upload::{MAX_FILES, MAX_FILE_BYTES};
use crate::screening::handlers;
use crate::state::AppState;

/// Room for the text fields and multipart framing on top of the file bytes.
const FORM_OVERHEAD_BYTES: usize = 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/analyze", post(handlers::handle_analyze))
        .route("/api/analyses/:id", get(handlers::handle_get_analysis))
        .layer(DefaultBodyLimit::max(
            MAX_FILES * MAX_FILE_BYTES + FORM_OVERHEAD_BYTES,
        ))
        .with_state(state)
}
