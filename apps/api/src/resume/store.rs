//! Context Store: owns the durable layout of uploads, extracted text and
//! context records on top of a `BlobStore`.
//!
//! Layout:
//! - `uploads/<stored filename>`            original bytes
//! - `extracted/<stored filename>.txt`      extracted text
//! - `contexts/<context id>.json`           `ContextRecord`
//!
//! Records are written once and never updated or deleted.

use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use tracing::{debug, info, warn};

use crate::resume::models::{ContextId, ContextRecord, ResumeScore, UploadedResume};
use crate::storage::{BlobStore, StorageError};

/// A context record together with its extracted text, as read back for chat.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedContext {
    pub record: ContextRecord,
    /// Empty when the extracted-text blob has gone missing.
    pub text: String,
}

#[derive(Clone)]
pub struct ContextStore {
    blobs: Arc<dyn BlobStore>,
}

pub fn upload_key(stored_filename: &str) -> String {
    format!("uploads/{stored_filename}")
}

pub fn extracted_key(extracted_file: &str) -> String {
    format!("extracted/{extracted_file}")
}

pub fn context_key(context_id: &ContextId) -> String {
    format!("contexts/{context_id}.json")
}

impl ContextStore {
    pub fn new(blobs: Arc<dyn BlobStore>) -> Self {
        Self { blobs }
    }

    pub fn blobs(&self) -> &dyn BlobStore {
        self.blobs.as_ref()
    }

    /// Persists the raw upload bytes under `uploads/`.
    pub async fn save_upload(
        &self,
        resume: &UploadedResume,
        bytes: Bytes,
    ) -> Result<(), StorageError> {
        self.blobs.put(&resume.storage_key, bytes).await
    }

    /// Writes the extracted text, then the record. The id is only handed out
    /// once both writes have succeeded, so a failure never leaves a returned
    /// id pointing at partial state.
    pub async fn create_context(
        &self,
        resume: &UploadedResume,
        extracted_text: &str,
        score: ResumeScore,
    ) -> Result<ContextRecord, StorageError> {
        let extracted_file = format!("{}.txt", resume.stored_filename);
        self.blobs
            .put(
                &extracted_key(&extracted_file),
                Bytes::from(extracted_text.to_owned()),
            )
            .await?;

        let record = ContextRecord {
            context_id: ContextId::new(),
            original_filename: resume.original_filename.clone(),
            resume_file: resume.stored_filename.clone(),
            extracted_file,
            extracted_text_length: extracted_text.chars().count(),
            byte_size: resume.byte_size,
            content_type: resume.content_type.clone(),
            score,
            created_at: Utc::now(),
        };

        let json = serde_json::to_vec_pretty(&record)?;
        self.blobs
            .put(&context_key(&record.context_id), Bytes::from(json))
            .await?;

        info!(
            "Created context {} for {} (score {})",
            record.context_id, record.resume_file, record.score.score
        );
        Ok(record)
    }

    /// Looks up a context by its raw client-supplied id.
    ///
    /// Malformed ids, unknown ids and unreadable records are all `Ok(None)`;
    /// only storage faults are errors. A record whose extracted text is gone
    /// resolves with empty text.
    pub async fn load_context(
        &self,
        raw_id: &str,
    ) -> Result<Option<ResolvedContext>, StorageError> {
        let context_id: ContextId = match raw_id.parse() {
            Ok(id) => id,
            Err(_) => {
                debug!("Ignoring malformed context id {raw_id:?}");
                return Ok(None);
            }
        };

        let Some(raw_record) = self.blobs.get(&context_key(&context_id)).await? else {
            debug!("Context {context_id} not found");
            return Ok(None);
        };

        let record: ContextRecord = match serde_json::from_slice(&raw_record) {
            Ok(record) => record,
            Err(e) => {
                warn!("Context {context_id} record is unreadable, ignoring it: {e}");
                return Ok(None);
            }
        };

        let text = match self.blobs.get(&extracted_key(&record.extracted_file)).await? {
            Some(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            None => {
                warn!(
                    "Context {context_id} references missing extracted text {}",
                    record.extracted_file
                );
                String::new()
            }
        };

        Ok(Some(ResolvedContext { record, text }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resume::models::SignalVector;
    use crate::storage::{FsBlobStore, MemoryBlobStore};

    fn resume(stored_filename: &str) -> UploadedResume {
        UploadedResume {
            original_filename: "My CV.txt".to_string(),
            stored_filename: stored_filename.to_string(),
            extension: "txt".to_string(),
            content_type: Some("text/plain".to_string()),
            byte_size: 42,
            storage_key: upload_key(stored_filename),
        }
    }

    fn score_80() -> ResumeScore {
        ResumeScore {
            score: 80,
            signals: SignalVector {
                projects: true,
                internships: false,
                leadership: true,
                impact: true,
                skills: true,
            },
        }
    }

    #[tokio::test]
    async fn test_create_then_load_round_trip() {
        let store = ContextStore::new(Arc::new(MemoryBlobStore::new()));
        let record = store
            .create_context(&resume("1_ab12cd34_My_CV.txt"), "Built things", score_80())
            .await
            .unwrap();

        assert_eq!(record.resume_file, "1_ab12cd34_My_CV.txt");
        assert_eq!(record.extracted_file, "1_ab12cd34_My_CV.txt.txt");
        assert_eq!(record.extracted_text_length, 12);

        let loaded = store
            .load_context(&record.context_id.to_string())
            .await
            .unwrap()
            .expect("context should resolve");
        assert_eq!(loaded.record, record);
        assert_eq!(loaded.record.score, score_80());
        assert_eq!(loaded.text, "Built things");
    }

    #[tokio::test]
    async fn test_text_length_counts_characters() {
        let store = ContextStore::new(Arc::new(MemoryBlobStore::new()));
        let record = store
            .create_context(&resume("1_ab12cd34_cv.txt"), "Résumé", ResumeScore::default())
            .await
            .unwrap();
        assert_eq!(record.extracted_text_length, 6);
    }

    #[tokio::test]
    async fn test_unknown_and_malformed_ids_are_none() {
        let store = ContextStore::new(Arc::new(MemoryBlobStore::new()));
        assert!(store
            .load_context(&ContextId::new().to_string())
            .await
            .unwrap()
            .is_none());
        assert!(store
            .load_context("1700000000000_resume.pdf")
            .await
            .unwrap()
            .is_none());
        assert!(store.load_context("../../etc/passwd").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_missing_extracted_text_resolves_empty() {
        let blobs = Arc::new(MemoryBlobStore::new());
        let store = ContextStore::new(blobs.clone());
        let record = store
            .create_context(&resume("1_ab12cd34_cv.txt"), "Led a team", score_80())
            .await
            .unwrap();

        blobs.remove(&extracted_key(&record.extracted_file)).await;

        let loaded = store
            .load_context(&record.context_id.to_string())
            .await
            .unwrap()
            .expect("record itself still exists");
        assert_eq!(loaded.text, "");
        assert_eq!(loaded.record.score.score, 80);
    }

    #[tokio::test]
    async fn test_corrupt_record_is_none() {
        let blobs = Arc::new(MemoryBlobStore::new());
        let store = ContextStore::new(blobs.clone());
        let id = ContextId::new();
        blobs
            .put(&context_key(&id), Bytes::from_static(b"{not json"))
            .await
            .unwrap();
        assert!(store.load_context(&id.to_string()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_fs_layout() {
        let dir = tempfile::tempdir().unwrap();
        let store = ContextStore::new(Arc::new(FsBlobStore::new(dir.path())));
        let upload = resume("1_ab12cd34_cv.txt");
        store
            .save_upload(&upload, Bytes::from_static(b"Built things"))
            .await
            .unwrap();
        let record = store
            .create_context(&upload, "Built things", score_80())
            .await
            .unwrap();

        assert!(dir.path().join("uploads/1_ab12cd34_cv.txt").is_file());
        assert!(dir.path().join("extracted/1_ab12cd34_cv.txt.txt").is_file());
        let ctx_path = dir
            .path()
            .join("contexts")
            .join(format!("{}.json", record.context_id));
        let json: serde_json::Value =
            serde_json::from_slice(&std::fs::read(ctx_path).unwrap()).unwrap();
        assert_eq!(json["score"]["score"], 80);
        assert_eq!(json["score"]["signals"]["leadership"], true);
        assert_eq!(json["resumeFile"], "1_ab12cd34_cv.txt");
    }

    #[tokio::test]
    async fn test_write_failure_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocked");
        std::fs::write(&blocker, b"file").unwrap();
        let store = ContextStore::new(Arc::new(FsBlobStore::new(&blocker)));

        let result = store
            .create_context(&resume("1_ab12cd34_cv.txt"), "text", score_80())
            .await;
        assert!(result.is_err());
    }
}
