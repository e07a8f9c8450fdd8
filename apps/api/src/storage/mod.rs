//! Blob storage: the durable put/get surface the context store is built on.
//!
//! Keys are `/`-separated logical paths (`uploads/..`, `extracted/..`,
//! `contexts/..`). Every backend maps a missing key to `Ok(None)`; only real
//! faults surface as `StorageError`.
//!
//! The backend is picked once at startup from `STORAGE_BACKEND` and carried in
//! `AppState` as `Arc<dyn BlobStore>`.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use tracing::info;

use crate::config::{Config, StorageBackend};

pub mod fs;
pub mod memory;
pub mod redis;
pub mod s3;

pub use fs::FsBlobStore;
pub use memory::MemoryBlobStore;
pub use self::redis::RedisBlobStore;
pub use s3::S3BlobStore;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invalid storage key '{0}'")]
    InvalidKey(String),

    #[error("I/O error on '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("S3 error on '{key}': {message}")]
    S3 { key: String, message: String },

    #[error("Redis error: {0}")]
    Redis(#[from] ::redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Short backend name for logs ("fs", "memory", "s3", "redis").
    fn backend(&self) -> &'static str;

    /// Writes `bytes` under `key`, replacing any previous value.
    async fn put(&self, key: &str, bytes: Bytes) -> Result<(), StorageError>;

    /// Reads the value under `key`, or `None` if nothing was ever written there.
    async fn get(&self, key: &str) -> Result<Option<Bytes>, StorageError>;
}

/// Rejects keys that could escape the store's namespace on a filesystem.
pub fn validate_key(key: &str) -> Result<(), StorageError> {
    let bad = key.is_empty()
        || key.starts_with('/')
        || key.contains('\\')
        || key.split('/').any(|seg| seg.is_empty() || seg == "." || seg == "..");
    if bad {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(())
}

/// Builds the configured backend.
pub async fn build_blob_store(config: &Config) -> anyhow::Result<Arc<dyn BlobStore>> {
    let store: Arc<dyn BlobStore> = match &config.storage {
        StorageBackend::Fs => Arc::new(FsBlobStore::new(config.data_dir.clone())),
        StorageBackend::Memory => Arc::new(MemoryBlobStore::new()),
        StorageBackend::S3(s3_config) => Arc::new(S3BlobStore::connect(s3_config).await),
        StorageBackend::Redis { url } => Arc::new(RedisBlobStore::connect(url).await?),
    };
    info!("Blob store initialized (backend: {})", store.backend());
    Ok(store)
}
