//! Chat Orchestrator: one stateless, grounded turn per request.
//!
//! Flow: validate → resolve context (or fall back to ungrounded) → build
//! prompt → one model call under a hard timeout → one reply.
//!
//! Which `ChatModel` answers (live or offline) is fixed at startup; the
//! orchestrator treats both the same.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::chat::prompts::{build_prompt, GroundedPrompt};
use crate::errors::AppError;
use crate::llm_client::{ChatModel, LlmError};
use crate::resume::store::{ContextStore, ResolvedContext};

/// Request body of `POST /api/chat`. Both fields are optional at the type
/// level so a missing `message` becomes a validation error, not a rejection.
/// `contextId` is taken as any JSON value; only a string can name a context.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub context_id: Option<Value>,
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

/// Where a turn's grounding came from.
#[derive(Debug)]
pub enum Grounding {
    Resolved(Box<ResolvedContext>),
    Absent,
}

impl Grounding {
    pub fn context(&self) -> Option<&ResolvedContext> {
        match self {
            Grounding::Resolved(ctx) => Some(&**ctx),
            Grounding::Absent => None,
        }
    }
}

#[derive(Clone)]
pub struct ChatOrchestrator {
    contexts: ContextStore,
    model: Arc<dyn ChatModel>,
    timeout: Duration,
}

impl ChatOrchestrator {
    pub fn new(contexts: ContextStore, model: Arc<dyn ChatModel>, timeout: Duration) -> Self {
        Self {
            contexts,
            model,
            timeout,
        }
    }

    /// Runs one chat turn. Unknown or malformed context ids, including
    /// non-string ones, degrade to an ungrounded turn; model failures and timeouts are errors and are never
    /// retried.
    pub async fn handle(&self, request: ChatRequest) -> Result<ChatResponse, AppError> {
        let message = request
            .message
            .filter(|m| !m.is_empty())
            .ok_or_else(|| AppError::Validation("message is required".to_string()))?;

        let context_id = request.context_id.as_ref().and_then(Value::as_str);
        let grounding = self.resolve(context_id).await?;
        let prompt = build_prompt(&message, grounding.context());
        let reply = self.complete(&prompt).await?;

        info!(
            grounded = grounding.context().is_some(),
            reply_len = reply.len(),
            "Chat turn completed"
        );
        Ok(ChatResponse { reply })
    }

    async fn resolve(&self, context_id: Option<&str>) -> Result<Grounding, AppError> {
        let Some(raw_id) = context_id.map(str::trim).filter(|id| !id.is_empty()) else {
            return Ok(Grounding::Absent);
        };

        match self.contexts.load_context(raw_id).await? {
            Some(ctx) => Ok(Grounding::Resolved(Box::new(ctx))),
            None => {
                debug!("Context {raw_id:?} unresolved, continuing ungrounded");
                Ok(Grounding::Absent)
            }
        }
    }

    async fn complete(&self, prompt: &GroundedPrompt) -> Result<String, LlmError> {
        match tokio::time::timeout(self.timeout, self.model.complete(prompt)).await {
            Ok(result) => result,
            Err(_) => Err(LlmError::Timeout(self.timeout)),
        }
    }
}
