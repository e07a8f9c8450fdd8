mod chat;
mod config;
mod errors;
mod llm_client;
mod resume;
mod routes;
mod state;
mod storage;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::chat::orchestrator::ChatOrchestrator;
use crate::config::Config;
use crate::llm_client::build_chat_model;
use crate::resume::store::ContextStore;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::build_blob_store;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on invalid or incomplete env)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Placement API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize blob storage for uploads, extracted text and context records
    let blobs = build_blob_store(&config).await?;
    let contexts = ContextStore::new(blobs);

    // Initialize chat model (live when a credential is set, offline otherwise)
    let model = build_chat_model(&config)?;
    let chat = ChatOrchestrator::new(contexts.clone(), model, config.llm_timeout);

    let state = AppState::new(config.clone(), contexts, chat);

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
