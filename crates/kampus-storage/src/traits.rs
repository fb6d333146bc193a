//! Storage abstraction trait
//!
//! This module defines the Storage trait that the file manager writes through.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures::Stream;
use std::path::PathBuf;
use std::pin::Pin;
use thiserror::Error;
use tokio::io::AsyncRead;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Read failed: {0}")]
    ReadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Filesystem facts about a stored object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectMetadata {
    pub size_bytes: u64,
    pub created: Option<DateTime<Utc>>,
    pub modified: DateTime<Utc>,
}

/// Storage abstraction trait
///
/// **Key format:** `{category}/{stored_name}`. See the crate root documentation.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Write everything `reader` yields to `storage_key` and return the byte count.
    ///
    /// Never overwrites an existing object. If the copy fails part way, the partial
    /// file is removed before the error is returned.
    async fn write_stream(
        &self,
        storage_key: &str,
        reader: &mut (dyn AsyncRead + Send + Unpin),
    ) -> StorageResult<u64>;

    /// Delete an object. A missing object is reported as `NotFound`.
    async fn delete(&self, storage_key: &str) -> StorageResult<()>;

    /// Check if an object exists
    async fn exists(&self, storage_key: &str) -> StorageResult<bool>;

    /// Size in bytes as recorded by the filesystem
    async fn content_length(&self, storage_key: &str) -> StorageResult<u64>;

    /// Size and timestamps of an object
    async fn metadata(&self, storage_key: &str) -> StorageResult<ObjectMetadata>;

    /// Read at most `limit` bytes from the start of an object
    async fn read_prefix(&self, storage_key: &str, limit: usize) -> StorageResult<Vec<u8>>;

    /// Download an object as a stream of chunks
    async fn download_stream(
        &self,
        storage_key: &str,
    ) -> StorageResult<Pin<Box<dyn Stream<Item = Result<Bytes, StorageError>> + Send>>>;

    /// Resolve a key to a validated filesystem path, for readers that need one
    /// (archive listing).
    async fn local_path(&self, storage_key: &str) -> StorageResult<PathBuf>;
}
