//! Storage backends for generator inputs and the rendered site.

mod fs;
pub mod s3;

pub use fs::FsStorage;
pub use s3::S3Storage;

use std::error::Error as StdError;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("object `{key}` not found")]
    NotFound { key: String },
    #[error("storage key escapes the storage root")]
    InvalidKey,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("remote storage request failed")]
    Remote {
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
}

impl StorageError {
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    pub fn remote(source: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Self::Remote {
            source: source.into(),
        }
    }
}

/// A flat, key-addressed object store.
///
/// Generator inputs and the rendered site both move through this interface;
/// the filesystem and S3 implementations differ only in where the bytes
/// live.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Read the full contents of the object at `key`.
    async fn read(&self, key: &str) -> Result<Bytes, StorageError>;

    /// Metadata-only existence probe. A missing object is `Ok(false)`;
    /// `Err` is reserved for probe failures.
    async fn exists(&self, key: &str) -> Result<bool, StorageError>;

    /// Overwrite the object at `key` with `data`. The filesystem backend
    /// ignores `content_type`.
    async fn write(&self, key: &str, data: Bytes, content_type: &str) -> Result<(), StorageError>;
}
