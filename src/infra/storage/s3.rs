use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::{Client, primitives::ByteStream};
use bytes::Bytes;
use tracing::debug;

use super::{Storage, StorageError};

/// Build an S3 client from the ambient AWS configuration (credentials,
/// region).
pub async fn connect() -> Client {
    let config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    Client::new(&config)
}

/// S3-backed storage scoped to a single bucket.
#[derive(Debug, Clone)]
pub struct S3Storage {
    client: Client,
    bucket: String,
}

impl S3Storage {
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }
}

#[async_trait]
impl Storage for S3Storage {
    async fn read(&self, key: &str) -> Result<Bytes, StorageError> {
        debug!(bucket = %self.bucket, key, "downloading object");
        let output = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|err| {
                if err
                    .as_service_error()
                    .is_some_and(|service| service.is_no_such_key())
                {
                    StorageError::not_found(key)
                } else {
                    StorageError::remote(err)
                }
            })?;

        let data = output.body.collect().await.map_err(StorageError::remote)?;
        Ok(data.into_bytes())
    }

    async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        let head = self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await;

        match head {
            Ok(_) => Ok(true),
            Err(err)
                if err
                    .as_service_error()
                    .is_some_and(|service| service.is_not_found()) =>
            {
                Ok(false)
            }
            Err(err) => Err(StorageError::remote(err)),
        }
    }

    async fn write(&self, key: &str, data: Bytes, content_type: &str) -> Result<(), StorageError> {
        debug!(bucket = %self.bucket, key, bytes = data.len(), "uploading object");
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(StorageError::remote)?;
        Ok(())
    }
}
