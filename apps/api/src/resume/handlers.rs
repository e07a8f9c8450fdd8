use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};

use crate::errors::AppError;
use crate::resume::ingest::{ingest_resume, UploadResponse};
use crate::state::AppState;

const FILE_FIELD: &str = "file";

/// POST /api/upload-resume
///
/// Takes the first multipart part named `file` that carries a filename.
/// Other parts are skipped.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, AppError> {
    let mut multipart = multipart?;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let Some(filename) = field.file_name().map(str::to_owned) else {
            continue;
        };
        let content_type = field.content_type().map(str::to_owned);
        let bytes = field.bytes().await?;

        let outcome = ingest_resume(&state.contexts, &filename, content_type, bytes).await?;
        return Ok(Json(outcome.into()));
    }

    Err(AppError::Validation("No file uploaded".to_string()))
}
