use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque handle a client holds after upload. Never a filesystem path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContextId(Uuid);

impl ContextId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ContextId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ContextId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// An uploaded resume as stored. Immutable once written.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedResume {
    pub original_filename: String,
    /// `<millis>_<8 hex>_<sanitized name>`; unique per upload.
    pub stored_filename: String,
    /// Lower-cased extension without the dot; empty when the name has none.
    pub extension: String,
    pub content_type: Option<String>,
    pub byte_size: u64,
    /// Blob-store key of the original bytes.
    pub storage_key: String,
}

/// Fixed five-key presence map. The key set is closed by construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalVector {
    pub projects: bool,
    pub internships: bool,
    pub leadership: bool,
    pub impact: bool,
    pub skills: bool,
}

impl SignalVector {
    pub const LEN: usize = 5;

    pub fn count(&self) -> usize {
        [
            self.projects,
            self.internships,
            self.leadership,
            self.impact,
            self.skills,
        ]
        .into_iter()
        .filter(|s| *s)
        .count()
    }
}

/// Heuristic score: 0–100 in steps of 20.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeScore {
    pub score: u8,
    pub signals: SignalVector,
}

/// Persisted link between an upload, its extracted text and its score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextRecord {
    pub context_id: ContextId,
    pub original_filename: String,
    pub resume_file: String,
    pub extracted_file: String,
    /// Length of the extracted text in characters.
    pub extracted_text_length: usize,
    pub byte_size: u64,
    pub content_type: Option<String>,
    pub score: ResumeScore,
    pub created_at: DateTime<Utc>,
}
