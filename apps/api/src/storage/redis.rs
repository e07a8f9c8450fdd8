use async_trait::async_trait;
use bytes::Bytes;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use tracing::info;

use crate::storage::{validate_key, BlobStore, StorageError};

const KEY_NAMESPACE: &str = "placement";

/// Blob store on Redis strings. One multiplexed connection is shared by all
/// requests; cloning it is cheap.
pub struct RedisBlobStore {
    conn: MultiplexedConnection,
}

impl RedisBlobStore {
    pub async fn connect(url: &str) -> Result<Self, StorageError> {
        let client = redis::Client::open(url)?;
        let conn = client.get_multiplexed_async_connection().await?;
        info!("Redis connection established");
        Ok(Self { conn })
    }
}

fn namespaced(key: &str) -> String {
    format!("{KEY_NAMESPACE}:{key}")
}

#[async_trait]
impl BlobStore for RedisBlobStore {
    fn backend(&self) -> &'static str {
        "redis"
    }

    async fn put(&self, key: &str, bytes: Bytes) -> Result<(), StorageError> {
        validate_key(key)?;
        let mut conn = self.conn.clone();
        conn.set::<_, _, ()>(namespaced(key), bytes.as_ref()).await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Bytes>, StorageError> {
        validate_key(key)?;
        let mut conn = self.conn.clone();
        let value: Option<Vec<u8>> = conn.get(namespaced(key)).await?;
        Ok(value.map(Bytes::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_namespaced() {
        assert_eq!(namespaced("contexts/a.json"), "placement:contexts/a.json");
    }
}
