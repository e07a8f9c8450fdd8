use async_trait::async_trait;

use crate::chat::prompts::{excerpt, GroundedPrompt};
use crate::llm_client::{ChatModel, LlmError};

/// Characters of the user prompt echoed back in offline mode.
pub const OFFLINE_USER_PREVIEW_CHARS: usize = 500;

pub const OFFLINE_REPLY_PREFIX: &str = "[DEV MODE]";

/// Used when no model credential is configured. Echoes the grounded prompt so
/// the whole pipeline can be exercised without a network.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineStubClient;

#[async_trait]
impl ChatModel for OfflineStubClient {
    fn mode(&self) -> String {
        "offline".to_string()
    }

    async fn complete(&self, prompt: &GroundedPrompt) -> Result<String, LlmError> {
        Ok(format!(
            "{OFFLINE_REPLY_PREFIX} {}\n\n{}",
            prompt.system,
            excerpt(&prompt.user, OFFLINE_USER_PREVIEW_CHARS)
        ))
    }
}
