use axum::{extract::rejection::JsonRejection, extract::State, Json};

use crate::chat::orchestrator::{ChatRequest, ChatResponse};
use crate::errors::AppError;
use crate::state::AppState;

/// POST /api/chat
///
/// Body: `{ "contextId"?: string, "message": string }`. A malformed body is a
/// validation error like a missing message.
pub async fn handle_chat(
    State(state): State<AppState>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    let Json(request) = body?;
    let response = state.chat.handle(request).await?;
    Ok(Json(response))
}
