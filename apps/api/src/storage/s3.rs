use async_trait::async_trait;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use tracing::debug;

use crate::config::S3Config;
use crate::storage::{validate_key, BlobStore, StorageError};

/// Blob store on an S3 bucket (MinIO locally, AWS in production).
pub struct S3BlobStore {
    client: aws_sdk_s3::Client,
    bucket: String,
    prefix: String,
}

impl S3BlobStore {
    /// Constructs an S3 client from static credentials and a custom endpoint.
    pub async fn connect(config: &S3Config) -> Self {
        let credentials = Credentials::new(
            &config.access_key_id,
            &config.secret_access_key,
            None,
            None,
            "placement-static",
        );

        let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials)
            .endpoint_url(&config.endpoint)
            .load()
            .await;

        // MinIO only serves path-style URLs.
        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(true)
            .build();

        Self {
            client: aws_sdk_s3::Client::from_conf(s3_config),
            bucket: config.bucket.clone(),
            prefix: config.prefix.trim_matches('/').to_string(),
        }
    }

    fn object_key(&self, key: &str) -> String {
        object_key(&self.prefix, key)
    }
}

fn object_key(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}/{key}")
    }
}

fn content_type_for(key: &str) -> &'static str {
    if key.ends_with(".json") {
        "application/json"
    } else if key.ends_with(".txt") {
        "text/plain; charset=utf-8"
    } else {
        "application/octet-stream"
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    fn backend(&self) -> &'static str {
        "s3"
    }

    async fn put(&self, key: &str, bytes: Bytes) -> Result<(), StorageError> {
        validate_key(key)?;
        let object_key = self.object_key(key);
        let len = bytes.len();

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&object_key)
            .body(ByteStream::from(bytes))
            .content_type(content_type_for(key))
            .send()
            .await
            .map_err(|e| StorageError::S3 {
                key: key.to_string(),
                message: DisplayErrorContext(&e).to_string(),
            })?;

        debug!("Uploaded {len} bytes to s3://{}/{}", self.bucket, object_key);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Bytes>, StorageError> {
        validate_key(key)?;
        let object_key = self.object_key(key);

        let output = match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(&object_key)
            .send()
            .await
        {
            Ok(output) => output,
            Err(e) if e.as_service_error().is_some_and(|se| se.is_no_such_key()) => {
                return Ok(None)
            }
            Err(e) => {
                return Err(StorageError::S3 {
                    key: key.to_string(),
                    message: DisplayErrorContext(&e).to_string(),
                })
            }
        };

        let data = output.body.collect().await.map_err(|e| StorageError::S3 {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(Some(data.into_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_key_prefix() {
        assert_eq!(object_key("", "contexts/a.json"), "contexts/a.json");
        assert_eq!(
            object_key("placement", "contexts/a.json"),
            "placement/contexts/a.json"
        );
    }

    #[test]
    fn test_content_type_by_suffix() {
        assert_eq!(content_type_for("contexts/a.json"), "application/json");
        assert_eq!(
            content_type_for("extracted/a.pdf.txt"),
            "text/plain; charset=utf-8"
        );
        assert_eq!(
            content_type_for("uploads/a.pdf"),
            "application/octet-stream"
        );
    }
}
