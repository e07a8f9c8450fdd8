pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::chat::handlers::handle_chat;
use crate::resume::handlers::handle_upload_resume;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/upload-resume",
            post(handle_upload_resume).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/api/chat", post(handle_chat))
        .with_state(state)
}
