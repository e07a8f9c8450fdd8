//! Upload pipeline: store bytes → extract text → score → create context.

use std::path::Path;

use bytes::Bytes;
use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::resume::extract::{extract_text, ExtractionStrategy};
use crate::resume::models::{ContextId, ResumeScore, SignalVector, UploadedResume};
use crate::resume::scoring::score_resume;
use crate::resume::store::{upload_key, ContextStore};

/// Response body of `POST /api/upload-resume`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub context_id: ContextId,
    pub score: u8,
    pub signals: SignalVector,
}

#[derive(Debug)]
pub struct IngestOutcome {
    pub context_id: ContextId,
    pub score: ResumeScore,
    pub strategy: ExtractionStrategy,
}

impl From<IngestOutcome> for UploadResponse {
    fn from(outcome: IngestOutcome) -> Self {
        Self {
            context_id: outcome.context_id,
            score: outcome.score.score,
            signals: outcome.score.signals,
        }
    }
}

/// Longest stem kept from a client filename. Leaves room for the
/// `<millis>_<hex>_` prefix and the fs store's temp-file suffix under the
/// usual 255-byte name limit.
pub const MAX_STEM_CHARS: usize = 100;
/// Suffixes longer than this are not treated as an extension.
pub const MAX_EXTENSION_CHARS: usize = 16;

/// Replaces every character outside `[A-Za-z0-9_.-]` with `_` and caps the
/// stem at `MAX_STEM_CHARS`, keeping the extension.
pub fn sanitize_filename(name: &str) -> String {
    let safe: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if safe.is_empty() {
        return "resume".to_string();
    }

    // Everything is ASCII from here on, so byte slicing is char slicing.
    let (stem, extension) = match safe.rfind('.') {
        Some(dot) if dot > 0 && safe.len() - dot - 1 <= MAX_EXTENSION_CHARS => {
            safe.split_at(dot)
        }
        _ => (safe.as_str(), ""),
    };
    if stem.len() <= MAX_STEM_CHARS {
        return safe;
    }
    format!("{}{extension}", &stem[..MAX_STEM_CHARS])
}

/// `<unix millis>_<8 hex>_<sanitized name>`.
pub fn stored_filename(original_filename: &str, millis: i64, nonce: &Uuid) -> String {
    let nonce = nonce.simple().to_string();
    format!(
        "{millis}_{}_{}",
        &nonce[..8],
        sanitize_filename(original_filename)
    )
}

/// Derives the storage identity of a new upload.
pub fn prepare_upload(
    original_filename: &str,
    content_type: Option<String>,
    byte_size: u64,
) -> UploadedResume {
    // Client-supplied names may carry directories; keep only the last segment.
    let base = original_filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original_filename);
    let stored = stored_filename(base, Utc::now().timestamp_millis(), &Uuid::new_v4());
    let extension = Path::new(&stored)
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    UploadedResume {
        original_filename: base.to_string(),
        storage_key: upload_key(&stored),
        stored_filename: stored,
        extension,
        content_type,
        byte_size,
    }
}

/// Runs the full upload pipeline. Extraction never fails; storage faults do.
pub async fn ingest_resume(
    store: &ContextStore,
    original_filename: &str,
    content_type: Option<String>,
    bytes: Bytes,
) -> Result<IngestOutcome, AppError> {
    let resume = prepare_upload(original_filename, content_type, bytes.len() as u64);
    store.save_upload(&resume, bytes).await?;

    let extraction = extract_text(store.blobs(), &resume).await;
    if extraction.degraded {
        warn!(
            "Extraction degraded for {} ({}), continuing with fallback text",
            resume.stored_filename,
            extraction.strategy.as_str()
        );
    }

    let score = score_resume(&extraction.text);
    let record = store
        .create_context(&resume, &extraction.text, score)
        .await?;

    info!(
        context_id = %record.context_id,
        strategy = extraction.strategy.as_str(),
        text_len = record.extracted_text_length,
        score = score.score,
        "Resume ingested"
    );

    Ok(IngestOutcome {
        context_id: record.context_id,
        score,
        strategy: extraction.strategy,
    })
}
