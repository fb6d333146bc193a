use crate::keys::TEMP_DIR;
use crate::traits::{ObjectMetadata, Storage, StorageError, StorageResult};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures::Stream;
use futures::StreamExt;
use kampus_core::UploadCategory;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use tokio::fs;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};

/// Local filesystem storage rooted at the uploads directory
#[derive(Clone, Debug)]
pub struct LocalStorage {
    base_path: PathBuf,
    /// `base_path` resolved once at construction
    canonical_base: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// Creates the root and one directory per upload category plus `temp/` if they are
    /// missing. Existing directories are left alone.
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();

        let subdirs = UploadCategory::ALL
            .iter()
            .map(|c| c.as_str())
            .chain(std::iter::once(TEMP_DIR));
        for subdir in subdirs {
            let dir = base_path.join(subdir);
            fs::create_dir_all(&dir).await.map_err(|e| {
                StorageError::ConfigError(format!(
                    "Failed to create storage directory {}: {}",
                    dir.display(),
                    e
                ))
            })?;
        }

        let canonical_base = fs::canonicalize(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!("Failed to canonicalize base path: {}", e))
        })?;

        tracing::debug!(root = %canonical_base.display(), "Local storage directories ready");

        Ok(LocalStorage {
            base_path,
            canonical_base,
        })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Convert storage key to filesystem path with security validation
    ///
    /// Rejects traversal sequences, absolute keys and anything that resolves outside
    /// the base directory.
    async fn key_to_path(&self, storage_key: &str) -> StorageResult<PathBuf> {
        if storage_key.is_empty()
            || storage_key.contains("..")
            || storage_key.starts_with('/')
            || storage_key.contains('\\')
            || storage_key.contains('\0')
        {
            return Err(StorageError::InvalidKey(
                "Storage key contains invalid characters".to_string(),
            ));
        }

        let path = self.base_path.join(storage_key);

        // Existing files (and symlinks) must resolve under the root
        if let Ok(canonical) = fs::canonicalize(&path).await {
            if canonical.strip_prefix(&self.canonical_base).is_err() {
                return Err(StorageError::InvalidKey(
                    "Storage key resolves outside storage directory".to_string(),
                ));
            }
        } else if let Some(parent) = path.parent() {
            if let Ok(parent_canonical) = fs::canonicalize(parent).await {
                if parent_canonical.strip_prefix(&self.canonical_base).is_err() {
                    return Err(StorageError::InvalidKey(
                        "Storage key resolves outside storage directory".to_string(),
                    ));
                }
            }
        }

        Ok(path)
    }

    async fn ensure_exists(&self, path: &Path, storage_key: &str) -> StorageResult<()> {
        if !fs::try_exists(path).await.unwrap_or(false) {
            return Err(StorageError::NotFound(storage_key.to_string()));
        }
        Ok(())
    }
}

fn map_read_error(storage_key: &str, path: &Path, e: std::io::Error) -> StorageError {
    if e.kind() == std::io::ErrorKind::NotFound {
        StorageError::NotFound(storage_key.to_string())
    } else {
        StorageError::ReadFailed(format!("Failed to read {}: {}", path.display(), e))
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn write_stream(
        &self,
        storage_key: &str,
        reader: &mut (dyn AsyncRead + Send + Unpin),
    ) -> StorageResult<u64> {
        let path = self.key_to_path(storage_key).await?;
        let start = std::time::Instant::now();

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|e| {
                StorageError::WriteFailed(format!(
                    "Failed to create file {}: {}",
                    path.display(),
                    e
                ))
            })?;

        let written = async {
            let bytes_copied = tokio::io::copy(reader, &mut file).await?;
            file.flush().await?;
            file.sync_all().await?;
            Ok::<u64, std::io::Error>(bytes_copied)
        }
        .await;

        let bytes_copied = match written {
            Ok(n) => n,
            Err(e) => {
                drop(file);
                if let Err(cleanup) = fs::remove_file(&path).await {
                    tracing::warn!(
                        path = %path.display(),
                        error = %cleanup,
                        "Failed to remove partial file"
                    );
                }
                return Err(StorageError::WriteFailed(format!(
                    "Failed to write stream to file {}: {}",
                    path.display(),
                    e
                )));
            }
        };

        tracing::info!(
            path = %path.display(),
            key = %storage_key,
            size_bytes = bytes_copied,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage stream write successful"
        );

        Ok(bytes_copied)
    }

    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        let path = self.key_to_path(storage_key).await?;
        let start = std::time::Instant::now();

        fs::remove_file(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::NotFound(storage_key.to_string())
            } else {
                StorageError::DeleteFailed(format!(
                    "Failed to delete file {}: {}",
                    path.display(),
                    e
                ))
            }
        })?;

        tracing::info!(
            path = %path.display(),
            key = %storage_key,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage delete successful"
        );

        Ok(())
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        let path = self.key_to_path(storage_key).await?;
        Ok(fs::try_exists(&path).await.unwrap_or(false))
    }

    async fn content_length(&self, storage_key: &str) -> StorageResult<u64> {
        let path = self.key_to_path(storage_key).await?;
        let meta = fs::metadata(&path)
            .await
            .map_err(|e| map_read_error(storage_key, &path, e))?;
        Ok(meta.len())
    }

    async fn metadata(&self, storage_key: &str) -> StorageResult<ObjectMetadata> {
        let path = self.key_to_path(storage_key).await?;
        let meta = fs::metadata(&path)
            .await
            .map_err(|e| map_read_error(storage_key, &path, e))?;

        if !meta.is_file() {
            return Err(StorageError::NotFound(storage_key.to_string()));
        }

        let modified = meta
            .modified()
            .map_err(|e| map_read_error(storage_key, &path, e))?;

        Ok(ObjectMetadata {
            size_bytes: meta.len(),
            // Not every filesystem records a birth time
            created: meta.created().ok().map(DateTime::<Utc>::from),
            modified: DateTime::<Utc>::from(modified),
        })
    }

    async fn read_prefix(&self, storage_key: &str, limit: usize) -> StorageResult<Vec<u8>> {
        let path = self.key_to_path(storage_key).await?;
        let file = fs::File::open(&path)
            .await
            .map_err(|e| map_read_error(storage_key, &path, e))?;

        let mut buf = Vec::with_capacity(limit);
        file.take(limit as u64)
            .read_to_end(&mut buf)
            .await
            .map_err(|e| map_read_error(storage_key, &path, e))?;

        Ok(buf)
    }

    async fn download_stream(
        &self,
        storage_key: &str,
    ) -> StorageResult<Pin<Box<dyn Stream<Item = Result<Bytes, StorageError>> + Send>>> {
        let path = self.key_to_path(storage_key).await?;
        let start = std::time::Instant::now();

        self.ensure_exists(&path, storage_key).await?;

        let file = fs::File::open(&path)
            .await
            .map_err(|e| map_read_error(storage_key, &path, e))?;

        let reader = tokio_util::io::ReaderStream::new(file);

        let stream = reader.map(|result| {
            result.map_err(|e| StorageError::ReadFailed(format!("Failed to read chunk: {}", e)))
        });

        let key = storage_key.to_string();
        let path_display = path.display().to_string();
        let logged_stream = stream.map(move |item| {
            if item.is_err() {
                tracing::error!(
                    path = %path_display,
                    key = %key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Local storage stream download error"
                );
            }
            item
        });

        Ok(Box::pin(logged_stream))
    }

    async fn local_path(&self, storage_key: &str) -> StorageResult<PathBuf> {
        self.key_to_path(storage_key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use tempfile::tempdir;

    async fn write_bytes(storage: &LocalStorage, key: &str, data: &[u8]) -> StorageResult<u64> {
        let mut reader = data;
        storage.write_stream(key, &mut reader).await
    }

    #[tokio::test]
    async fn test_new_creates_category_directories() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("uploads");
        LocalStorage::new(&root).await.unwrap();

        for name in ["notes", "projects", "questions", "temp"] {
            assert!(root.join(name).is_dir(), "{} missing", name);
        }

        // Idempotent on an existing tree
        LocalStorage::new(&root).await.unwrap();
    }

    #[tokio::test]
    async fn test_write_and_stream_back() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        let written = write_bytes(&storage, "notes/a.pdf", b"test data").await.unwrap();
        assert_eq!(written, 9);
        assert!(storage.exists("notes/a.pdf").await.unwrap());
        assert_eq!(storage.content_length("notes/a.pdf").await.unwrap(), 9);

        let mut stream = storage.download_stream("notes/a.pdf").await.unwrap();
        let mut downloaded = Vec::new();
        while let Some(chunk) = stream.next().await {
            downloaded.extend_from_slice(&chunk.unwrap());
        }
        assert_eq!(downloaded, b"test data");
    }

    #[tokio::test]
    async fn test_write_never_overwrites() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        write_bytes(&storage, "notes/a.pdf", b"first").await.unwrap();
        let result = write_bytes(&storage, "notes/a.pdf", b"second").await;
        assert!(matches!(result, Err(StorageError::WriteFailed(_))));

        let prefix = storage.read_prefix("notes/a.pdf", 64).await.unwrap();
        assert_eq!(prefix, b"first");
    }

    #[tokio::test]
    async fn test_read_prefix_is_bounded() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        write_bytes(&storage, "projects/a.txt", b"0123456789").await.unwrap();
        let prefix = storage.read_prefix("projects/a.txt", 4).await.unwrap();
        assert_eq!(prefix, b"0123");
    }

    #[tokio::test]
    async fn test_delete_twice_reports_not_found() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        write_bytes(&storage, "questions/q.png", b"png").await.unwrap();
        storage.delete("questions/q.png").await.unwrap();
        assert!(!storage.exists("questions/q.png").await.unwrap());

        let again = storage.delete("questions/q.png").await;
        assert!(matches!(again, Err(StorageError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_metadata() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        write_bytes(&storage, "notes/m.pdf", b"12345").await.unwrap();
        let meta = storage.metadata("notes/m.pdf").await.unwrap();
        assert_eq!(meta.size_bytes, 5);
        assert!(meta.modified <= Utc::now());

        let missing = storage.metadata("notes/none.pdf").await;
        assert!(matches!(missing, Err(StorageError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_path_traversal_rejected() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        let result = storage.download_stream("../../../etc/passwd").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));

        let result = storage.delete("../etc/passwd").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));

        let result = storage.delete("/etc/passwd").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));

        let result = write_bytes(&storage, "notes/..", b"x").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));
    }

    #[tokio::test]
    async fn test_local_path_resolves_under_canonical_root() {
        let dir = tempdir().unwrap();
        // Non-canonical root: the `.` component must not break the prefix check
        let storage = LocalStorage::new(dir.path().join(".")).await.unwrap();
        write_bytes(&storage, "notes/a.pdf", b"x").await.unwrap();

        let path = storage.local_path("notes/a.pdf").await.unwrap();
        assert!(path.ends_with("notes/a.pdf"));
        assert!(path.is_file());
        // New keys resolve through their existing parent directory
        assert!(storage.local_path("projects/new.zip").await.is_ok());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlink_out_of_root_rejected() {
        let outside = tempdir().unwrap();
        let secret = outside.path().join("secret.txt");
        std::fs::write(&secret, b"secret").unwrap();

        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();
        std::os::unix::fs::symlink(&secret, dir.path().join("notes").join("link.txt")).unwrap();

        let result = storage.local_path("notes/link.txt").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));
        let result = storage.download_stream("notes/link.txt").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));
    }

    #[tokio::test]
    async fn test_download_missing_file() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        let result = storage.download_stream("notes/missing.pdf").await;
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }
}
