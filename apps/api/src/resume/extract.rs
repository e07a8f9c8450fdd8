//! Extraction Strategy Selector: turns a stored upload into best-effort text.
//!
//! Never fails. Degradation rules:
//! - PDF: parser error or panic → placeholder asking for education/projects/skills
//! - Image: always a placeholder (no OCR)
//! - Anything else: lossy UTF-8 read; an unreadable upload yields `""`
//!
//! The plain-text branch falls back to `""`, never to a placeholder.

use bytes::Bytes;
use serde::Serialize;
use tracing::warn;

use crate::resume::models::UploadedResume;
use crate::storage::BlobStore;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStrategy {
    Pdf,
    Image,
    PlainText,
}

impl ExtractionStrategy {
    /// Picks a strategy from a lower-cased extension (no leading dot).
    pub fn for_extension(extension: &str) -> Self {
        let ext = extension.trim_start_matches('.').to_ascii_lowercase();
        if ext == "pdf" {
            ExtractionStrategy::Pdf
        } else if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            ExtractionStrategy::Image
        } else {
            ExtractionStrategy::PlainText
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionStrategy::Pdf => "pdf",
            ExtractionStrategy::Image => "image",
            ExtractionStrategy::PlainText => "plain_text",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub text: String,
    pub strategy: ExtractionStrategy,
    /// True when the text is a placeholder or an empty fallback rather than
    /// content read from the file.
    pub degraded: bool,
}

pub fn pdf_placeholder(stored_filename: &str) -> String {
    format!(
        "PDF resume uploaded: {stored_filename}. If text extraction is incomplete, \
         ask the user to paste education, projects, and skills."
    )
}

pub fn image_placeholder(stored_filename: &str) -> String {
    format!(
        "Image resume uploaded: {stored_filename}. \
         Ask user to confirm key details (education, projects, skills)."
    )
}

/// Extracts text for a stored upload, reading its bytes back from `store`.
pub async fn extract_text(store: &dyn BlobStore, resume: &UploadedResume) -> Extraction {
    let strategy = ExtractionStrategy::for_extension(&resume.extension);
    if strategy == ExtractionStrategy::Image {
        return extract_loaded(strategy, &resume.stored_filename, None).await;
    }

    let bytes = match store.get(&resume.storage_key).await {
        Ok(Some(bytes)) => Some(bytes),
        Ok(None) => {
            warn!("Stored upload {} is missing", resume.storage_key);
            None
        }
        Err(e) => {
            warn!("Failed to read stored upload {}: {e}", resume.storage_key);
            None
        }
    };
    extract_loaded(strategy, &resume.stored_filename, bytes).await
}

/// Applies `strategy` to already-loaded bytes. `None` means the upload could
/// not be read.
pub async fn extract_loaded(
    strategy: ExtractionStrategy,
    stored_filename: &str,
    bytes: Option<Bytes>,
) -> Extraction {
    match strategy {
        ExtractionStrategy::Image => Extraction {
            text: image_placeholder(stored_filename),
            strategy,
            degraded: true,
        },
        ExtractionStrategy::PlainText => match bytes {
            Some(bytes) => Extraction {
                text: String::from_utf8_lossy(&bytes).into_owned(),
                strategy,
                degraded: false,
            },
            None => Extraction {
                text: String::new(),
                strategy,
                degraded: true,
            },
        },
        ExtractionStrategy::Pdf => match bytes {
            Some(bytes) => match parse_pdf(bytes).await {
                Ok(text) => Extraction {
                    text,
                    strategy,
                    degraded: false,
                },
                Err(reason) => {
                    warn!("PDF parse failed for {stored_filename}, falling back to placeholder context: {reason}");
                    Extraction {
                        text: pdf_placeholder(stored_filename),
                        strategy,
                        degraded: true,
                    }
                }
            },
            None => Extraction {
                text: pdf_placeholder(stored_filename),
                strategy,
                degraded: true,
            },
        },
    }
}

/// Runs the PDF parser on the blocking pool. A parser panic surfaces as a
/// `JoinError` and is treated like any other parse failure.
async fn parse_pdf(bytes: Bytes) -> Result<String, String> {
    match tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes)).await {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(e.to_string()),
        Err(e) => Err(format!("parser task aborted: {e}")),
    }
}
