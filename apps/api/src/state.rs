use crate::chat::orchestrator::ChatOrchestrator;
use crate::config::Config;
use crate::resume::store::ContextStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Durable context records, extracted text and raw uploads.
    pub contexts: ContextStore,
    /// Chat turns. Holds the model chosen at startup (live or offline).
    pub chat: ChatOrchestrator,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config, contexts: ContextStore, chat: ChatOrchestrator) -> Self {
        Self {
            contexts,
            chat,
            config,
        }
    }
}
