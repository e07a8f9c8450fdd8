use axum::{
    extract::multipart::{MultipartError, MultipartRejection},
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;
use crate::storage::StorageError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Server-side variants log the underlying cause and answer with a generic
/// message; upstream details never reach the client.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Persistence error: {0}")]
    Persistence(#[from] StorageError),

    #[error("Orchestration error: {0}")]
    Orchestration(#[from] LlmError),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<MultipartRejection> for AppError {
    fn from(rejection: MultipartRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<MultipartError> for AppError {
    fn from(e: MultipartError) -> Self {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(e.body_text())
        } else {
            AppError::Validation(format!("Invalid multipart body: {}", e.body_text()))
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::PayloadTooLarge(msg) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "PAYLOAD_TOO_LARGE",
                msg.clone(),
            ),
            AppError::Persistence(e) => {
                tracing::error!("Persistence error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "PERSISTENCE_ERROR",
                    "A storage error occurred".to_string(),
                )
            }
            AppError::Orchestration(e) => {
                tracing::error!("Orchestration error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "ORCHESTRATION_ERROR",
                    "Chat failed".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn render(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_validation_is_400_with_message() {
        let (status, body) = render(AppError::Validation("message is required".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(body["error"]["message"], "message is required");
    }

    #[tokio::test]
    async fn test_orchestration_hides_upstream_detail() {
        let err = AppError::Orchestration(LlmError::Api {
            status: 401,
            message: "invalid x-api-key sk-secret".to_string(),
        });
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], "ORCHESTRATION_ERROR");
        assert!(!body.to_string().contains("sk-secret"));
    }

    #[tokio::test]
    async fn test_persistence_is_500() {
        let err = AppError::Persistence(StorageError::InvalidKey("../x".into()));
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], "PERSISTENCE_ERROR");
        assert!(!body.to_string().contains("../x"));
    }
}
