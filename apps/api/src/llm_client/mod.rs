/// LLM Client: the single point of entry for generative-model calls.
///
/// ARCHITECTURAL RULE: No other module may call a model API directly.
/// Chat goes through a `ChatModel`, chosen once at startup:
/// - credential configured → `AnthropicClient` or `GeminiClient`
/// - no credential → `OfflineStubClient` (deterministic prompt echo)
///
/// Every implementation takes one grounded prompt and returns one reply.
/// No retries, no conversation history.
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::info;

use crate::chat::prompts::GroundedPrompt;
use crate::config::{Config, LlmProvider};

pub mod anthropic;
pub mod gemini;
pub mod offline;

pub use anthropic::AnthropicClient;
pub use gemini::GeminiClient;
pub use offline::OfflineStubClient;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("LLM call timed out after {0:?}")]
    Timeout(Duration),
}

#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Human-readable mode for logs, e.g. `live (anthropic, claude-sonnet-4-5)`.
    fn mode(&self) -> String;

    /// Produces exactly one reply for one grounded prompt.
    async fn complete(&self, prompt: &GroundedPrompt) -> Result<String, LlmError>;
}

/// Shared HTTP client construction for the live backends.
pub(crate) fn http_client(timeout: Duration) -> Result<Client, LlmError> {
    Ok(Client::builder().timeout(timeout).build()?)
}

/// Selects the live or offline client from configuration.
pub fn build_chat_model(config: &Config) -> Result<Arc<dyn ChatModel>, LlmError> {
    let model: Arc<dyn ChatModel> = match (&config.llm_api_key, config.llm_provider) {
        (None, _) => Arc::new(OfflineStubClient),
        (Some(key), LlmProvider::Anthropic) => {
            Arc::new(AnthropicClient::new(key.clone(), config.llm_timeout)?)
        }
        (Some(key), LlmProvider::Gemini) => {
            Arc::new(GeminiClient::new(key.clone(), config.llm_timeout)?)
        }
    };
    info!("Chat model initialized: {}", model.mode());
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned()).unwrap()
    }

    #[test]
    fn test_no_credential_selects_offline() {
        let model = build_chat_model(&config(&[])).unwrap();
        assert_eq!(model.mode(), "offline");
    }

    #[test]
    fn test_anthropic_credential_selects_live() {
        let model = build_chat_model(&config(&[("ANTHROPIC_API_KEY", "k")])).unwrap();
        assert!(model.mode().starts_with("live (anthropic"));
    }

    #[test]
    fn test_gemini_credential_selects_live() {
        let model = build_chat_model(&config(&[
            ("LLM_PROVIDER", "gemini"),
            ("GEMINI_API_KEY", "k"),
        ]))
        .unwrap();
        assert!(model.mode().starts_with("live (gemini"));
    }

    #[test]
    fn test_other_providers_key_does_not_enable_live() {
        let model = build_chat_model(&config(&[
            ("LLM_PROVIDER", "gemini"),
            ("ANTHROPIC_API_KEY", "k"),
        ]))
        .unwrap();
        assert_eq!(model.mode(), "offline");
    }
}
