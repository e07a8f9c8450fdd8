use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::chat::prompts::GroundedPrompt;
use crate::llm_client::{http_client, ChatModel, LlmError};

const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com";
/// The Gemini model used for chat. Hardcoded, like the Claude model.
pub const MODEL: &str = "gemini-2.5-pro";

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
pub struct CandidatePart {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    pub prompt_token_count: Option<u32>,
    pub candidates_token_count: Option<u32>,
}

impl GenerateContentResponse {
    /// Concatenates the text parts of the first candidate.
    pub fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

/// Gemini `generateContent` client. The combined grounded prompt is the only
/// user part.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: String, timeout: Duration) -> Result<Self, LlmError> {
        Self::with_base_url(api_key, timeout, GEMINI_API_URL)
    }

    pub fn with_base_url(
        api_key: String,
        timeout: Duration,
        base_url: &str,
    ) -> Result<Self, LlmError> {
        Ok(Self {
            client: http_client(timeout)?,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn generate(&self, prompt: &str) -> Result<GenerateContentResponse, LlmError> {
        let request_body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(format!(
                "{}/v1beta/models/{MODEL}:generateContent",
                self.base_url
            ))
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GeminiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let parsed: GenerateContentResponse = serde_json::from_str(&body)?;

        if let Some(usage) = &parsed.usage_metadata {
            debug!(
                "Gemini call succeeded: prompt_tokens={:?}, candidate_tokens={:?}",
                usage.prompt_token_count, usage.candidates_token_count
            );
        }
        Ok(parsed)
    }
}

#[async_trait]
impl ChatModel for GeminiClient {
    fn mode(&self) -> String {
        format!("live (gemini, {MODEL})")
    }

    async fn complete(&self, prompt: &GroundedPrompt) -> Result<String, LlmError> {
        self.generate(&prompt.combined())
            .await?
            .text()
            .ok_or(LlmError::EmptyContent)
    }
}
