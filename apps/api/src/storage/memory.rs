use std::collections::HashMap;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::RwLock;

use crate::storage::{validate_key, BlobStore, StorageError};

/// Process-local store. Contents vanish on restart.
#[derive(Default)]
pub struct MemoryBlobStore {
    blobs: RwLock<HashMap<String, Bytes>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops a key. Only tests use this, to simulate lost blobs.
    #[cfg(test)]
    pub async fn remove(&self, key: &str) {
        self.blobs.write().await.remove(key);
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn put(&self, key: &str, bytes: Bytes) -> Result<(), StorageError> {
        validate_key(key)?;
        self.blobs.write().await.insert(key.to_string(), bytes);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Bytes>, StorageError> {
        validate_key(key)?;
        Ok(self.blobs.read().await.get(key).cloned())
    }
}
