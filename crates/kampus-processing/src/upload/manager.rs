//! File manager
//!
//! Composes validation, naming, storage and archive inspection into the operations
//! request handlers call: save, replace, delete, describe and open.

use chrono::Utc;
use kampus_core::{
    ArchiveKind, ArchiveReport, FileInfo, Locale, PolicyTable, StoredFileDescriptor,
    UploadCategory,
};
use kampus_storage::{generate_stored_name, split_storage_key, storage_key, Storage, StorageError};
use std::sync::Arc;
use std::time::Instant;
use tokio::io::AsyncRead;

use super::error::UploadError;
use super::types::{DownloadStream, IncomingFile};
use crate::archive::ArchiveInspector;
use crate::sanitize::sanitize_filename;
use crate::validator::{UploadValidator, SNIFF_PREFIX_BYTES};

/// An upload that passed the pre-write checks
struct Admitted<'a> {
    filename: String,
    extension: String,
    reader: &'a mut (dyn AsyncRead + Send + Unpin),
}

/// Upload orchestrator
///
/// Cheap to share behind `Arc`; holds no per-request state. Category directories
/// are created by the storage backend when it is constructed, before the first
/// request reaches this type.
pub struct FileManager {
    storage: Arc<dyn Storage>,
    validator: UploadValidator,
    inspector: ArchiveInspector,
    locale: Locale,
    strict_content_sniffing: bool,
}

impl FileManager {
    pub fn new(storage: Arc<dyn Storage>, policies: Arc<PolicyTable>) -> Self {
        Self {
            storage,
            validator: UploadValidator::new(policies),
            inspector: ArchiveInspector::new(),
            locale: Locale::default(),
            strict_content_sniffing: false,
        }
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    /// Also check the first bytes of every written file against the category's
    /// MIME allow-list.
    pub fn with_strict_content_sniffing(mut self, enabled: bool) -> Self {
        self.strict_content_sniffing = enabled;
        self
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn policies(&self) -> &PolicyTable {
        self.validator.policies()
    }

    /// Validate and persist an upload.
    ///
    /// On any rejection no file is left in the category directory.
    #[tracing::instrument(skip_all, fields(category = %category, actor_id = actor_id))]
    pub async fn save(
        &self,
        file: Option<IncomingFile<'_>>,
        category: UploadCategory,
        actor_id: i64,
    ) -> Result<StoredFileDescriptor, UploadError> {
        let admitted = self.admit(file, category, actor_id)?;
        self.store(admitted, category, actor_id).await
    }

    /// Replace a stored file with a new upload.
    ///
    /// The new upload's filename and declared size are checked first; once they pass,
    /// the previous file is removed (a missing one is fine) and the new one is saved.
    #[tracing::instrument(skip_all, fields(category = %category, actor_id = actor_id))]
    pub async fn replace(
        &self,
        old_relative_path: &str,
        file: Option<IncomingFile<'_>>,
        category: UploadCategory,
        actor_id: i64,
    ) -> Result<StoredFileDescriptor, UploadError> {
        let old_key = self.resolve_key(old_relative_path)?;
        if !old_key.starts_with(&format!("{}/", category)) {
            return Err(UploadError::InvalidPath(old_relative_path.to_string()));
        }

        let admitted = self.admit(file, category, actor_id)?;

        match self.storage.delete(&old_key).await {
            Ok(()) => {
                tracing::info!(key = %old_key, "Previous file removed before replace");
            }
            Err(StorageError::NotFound(_)) => {
                tracing::debug!(key = %old_key, "Previous file already gone");
            }
            Err(e) => return Err(UploadError::DeleteFailed(e)),
        }

        self.store(admitted, category, actor_id).await
    }

    /// Remove a stored file. A missing file is reported as `NotFound`.
    pub async fn delete_file(&self, relative_path: &str) -> Result<(), UploadError> {
        let key = self.resolve_key(relative_path)?;

        match self.storage.delete(&key).await {
            Ok(()) => Ok(()),
            Err(StorageError::NotFound(_)) => {
                tracing::warn!(key = %key, "Delete requested for missing file");
                Err(UploadError::NotFound(key))
            }
            Err(StorageError::InvalidKey(reason)) => Err(UploadError::InvalidPath(reason)),
            Err(e) => {
                tracing::error!(key = %key, error = %e, "File delete failed");
                Err(UploadError::DeleteFailed(e))
            }
        }
    }

    /// Summarize a stored zip/rar file.
    ///
    /// `Ok(None)` for any other extension. A corrupt archive is an
    /// [`ArchiveReport::Unreadable`], not an error.
    pub async fn extract_archive_info(
        &self,
        relative_path: &str,
    ) -> Result<Option<ArchiveReport>, UploadError> {
        let key = self.resolve_key(relative_path)?;
        let extension = UploadValidator::extension_of(&key).unwrap_or_default();
        if ArchiveKind::from_extension(&extension).is_none() {
            return Ok(None);
        }

        if !self.storage.exists(&key).await.map_err(map_read_error)? {
            return Err(UploadError::NotFound(key));
        }

        let path = self.storage.local_path(&key).await.map_err(map_read_error)?;
        let inspector = self.inspector;
        let start = Instant::now();

        let report = tokio::task::spawn_blocking(move || inspector.describe(&path))
            .await
            .map_err(|e| UploadError::ReadFailed(format!("Archive inspection task failed: {}", e)))?;

        tracing::debug!(
            key = %key,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            unreadable = report.as_ref().map(|r| r.is_error()).unwrap_or(false),
            "Archive inspected"
        );

        Ok(report)
    }

    /// Size, timestamps and guessed MIME type of a stored file; `None` if absent.
    pub async fn file_info(&self, relative_path: &str) -> Result<Option<FileInfo>, UploadError> {
        let key = self.resolve_key(relative_path)?;

        let metadata = match self.storage.metadata(&key).await {
            Ok(metadata) => metadata,
            Err(StorageError::NotFound(_)) => return Ok(None),
            Err(e) => return Err(map_read_error(e)),
        };

        let mime_type = mime_guess::from_path(&key)
            .first_or_octet_stream()
            .essence_str()
            .to_string();

        Ok(Some(FileInfo {
            size_bytes: metadata.size_bytes,
            created: metadata.created,
            modified: metadata.modified,
            mime_type,
        }))
    }

    /// Stream a stored file's contents.
    pub async fn open(&self, relative_path: &str) -> Result<DownloadStream, UploadError> {
        let key = self.resolve_key(relative_path)?;
        self.storage
            .download_stream(&key)
            .await
            .map_err(map_read_error)
    }

    /// Pre-write checks: presence, extension, declared size.
    fn admit<'a>(
        &self,
        file: Option<IncomingFile<'a>>,
        category: UploadCategory,
        actor_id: i64,
    ) -> Result<Admitted<'a>, UploadError> {
        let Some(file) = file else {
            tracing::warn!(actor_id, category = %category, "Upload without a file part");
            return Err(UploadError::NoFile);
        };

        let filename = file
            .original_filename
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string();
        if filename.is_empty() {
            tracing::warn!(actor_id, category = %category, "Upload with an empty filename");
            return Err(UploadError::NoFile);
        }

        tracing::info!(
            actor_id,
            category = %category,
            filename = %filename,
            declared_size = ?file.declared_size,
            "Upload attempt"
        );

        if !self.validator.check_extension(&filename, category) {
            tracing::warn!(
                actor_id,
                category = %category,
                filename = %filename,
                "Upload rejected: extension not allowed"
            );
            return Err(UploadError::UnsupportedType { filename });
        }

        if !self.validator.check_size(file.declared_size, category) {
            tracing::warn!(
                actor_id,
                category = %category,
                filename = %filename,
                size_bytes = ?file.declared_size,
                "Upload rejected: declared size over limit"
            );
            return Err(UploadError::TooLarge {
                max_mb: self.policies().get(category).max_size_mb(),
            });
        }

        let extension = UploadValidator::extension_of(&filename).unwrap_or_default();

        Ok(Admitted {
            filename,
            extension,
            reader: file.reader,
        })
    }

    /// Write, re-check the materialized file, and describe it.
    async fn store(
        &self,
        admitted: Admitted<'_>,
        category: UploadCategory,
        actor_id: i64,
    ) -> Result<StoredFileDescriptor, UploadError> {
        let start = Instant::now();
        let original_name = sanitize_filename(&admitted.filename);
        let stored_name = generate_stored_name(&admitted.filename, category);
        let key = storage_key(category, &stored_name);

        let written = self
            .storage
            .write_stream(&key, admitted.reader)
            .await
            .map_err(|e| {
                tracing::error!(
                    actor_id,
                    category = %category,
                    stored_name = %stored_name,
                    error = %e,
                    "Upload write failed"
                );
                UploadError::SaveFailed(e)
            })?;

        tracing::debug!(
            stored_name = %stored_name,
            size_bytes = written,
            "Upload written, checking content"
        );

        let size_bytes = match self.verify_written(&key, category).await {
            Ok(size) => size,
            Err(e) => {
                tracing::error!(
                    actor_id,
                    category = %category,
                    stored_name = %stored_name,
                    reason = %e,
                    "Written file failed content checks, removing"
                );
                self.discard(&key).await;
                return Err(e);
            }
        };

        tracing::info!(
            actor_id,
            category = %category,
            filename = %original_name,
            stored_name = %stored_name,
            size_bytes,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Upload stored"
        );

        Ok(StoredFileDescriptor {
            original_name,
            stored_name,
            relative_path: key,
            size_bytes,
            category,
            extension: admitted.extension,
            uploaded_at: Utc::now(),
            owner_actor_id: actor_id,
        })
    }

    /// Post-write checks; returns the size read back from disk.
    async fn verify_written(
        &self,
        key: &str,
        category: UploadCategory,
    ) -> Result<u64, UploadError> {
        let path = self.storage.local_path(key).await.map_err(map_read_error)?;
        self.validator
            .check_content_safety(&path, category)
            .map_err(UploadError::Rejected)?;

        let size = self
            .storage
            .content_length(key)
            .await
            .map_err(map_read_error)?;
        if self.validator.check_actual_size(size, category).is_err() {
            return Err(UploadError::TooLarge {
                max_mb: self.policies().get(category).max_size_mb(),
            });
        }

        if self.strict_content_sniffing {
            let prefix = self
                .storage
                .read_prefix(key, SNIFF_PREFIX_BYTES)
                .await
                .map_err(map_read_error)?;
            let extension = UploadValidator::extension_of(key).unwrap_or_default();
            self.validator
                .sniff_content(&prefix, &extension)
                .map_err(UploadError::Rejected)?;
        }

        Ok(size)
    }

    async fn discard(&self, key: &str) {
        if let Err(e) = self.storage.delete(key).await {
            tracing::error!(key = %key, error = %e, "Failed to remove rejected upload");
        }
    }

    /// Validate a `<category>/<stored_name>` reference.
    fn resolve_key(&self, relative_path: &str) -> Result<String, UploadError> {
        let trimmed = relative_path.trim();
        match split_storage_key(trimmed) {
            Some((_, stored_name)) if !stored_name.contains("..") && !stored_name.contains('\\') => {
                Ok(trimmed.to_string())
            }
            _ => Err(UploadError::InvalidPath(relative_path.to_string())),
        }
    }
}

fn map_read_error(err: StorageError) -> UploadError {
    match err {
        StorageError::NotFound(key) => UploadError::NotFound(key),
        StorageError::InvalidKey(reason) => UploadError::InvalidPath(reason),
        other => UploadError::ReadFailed(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kampus_storage::LocalStorage;
    use std::io::{Cursor, Write};
    use std::path::Path;
    use tempfile::{tempdir, TempDir};
    use zip::write::{FileOptions, ZipWriter};
    use zip::CompressionMethod;

    const PDF_BYTES: &[u8] = b"%PDF-1.4\n1 0 obj\n<< /Type /Catalog >>\nendobj\ntrailer\n%%EOF\n";

    async fn manager_with(policies: PolicyTable) -> (TempDir, FileManager) {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();
        let manager = FileManager::new(Arc::new(storage), Arc::new(policies));
        (dir, manager)
    }

    async fn manager() -> (TempDir, FileManager) {
        manager_with(PolicyTable::default()).await
    }

    fn count_files(dir: &Path) -> usize {
        std::fs::read_dir(dir).unwrap().count()
    }

    fn zip_bytes(entries: usize) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default().compression_method(CompressionMethod::Stored);
        for i in 0..entries {
            zip.start_file(format!("entry_{:02}.txt", i), options).unwrap();
            zip.write_all(b"hello").unwrap();
        }
        zip.finish().unwrap().into_inner()
    }

    async fn save_bytes(
        manager: &FileManager,
        filename: &str,
        data: &[u8],
        category: UploadCategory,
    ) -> Result<StoredFileDescriptor, UploadError> {
        let mut reader = data;
        let file = IncomingFile::new(filename, &mut reader)
            .with_declared_size(Some(data.len() as u64));
        manager.save(Some(file), category, 7).await
    }

    #[tokio::test]
    async fn test_save_pdf_into_notes() {
        let (dir, manager) = manager().await;

        let descriptor = save_bytes(&manager, "lecture.pdf", PDF_BYTES, UploadCategory::Notes)
            .await
            .unwrap();

        assert_eq!(descriptor.category, UploadCategory::Notes);
        assert_eq!(descriptor.extension, "pdf");
        assert_eq!(descriptor.record_file_type(), "PDF");
        assert_eq!(descriptor.original_name, "lecture.pdf");
        assert_eq!(descriptor.owner_actor_id, 7);
        assert_eq!(descriptor.size_bytes, PDF_BYTES.len() as u64);
        assert!(descriptor.stored_name.starts_with("notes_"));
        assert!(descriptor.stored_name.ends_with(".pdf"));
        assert_eq!(
            descriptor.relative_path,
            format!("notes/{}", descriptor.stored_name)
        );

        let on_disk = dir.path().join("notes").join(&descriptor.stored_name);
        assert_eq!(std::fs::read(on_disk).unwrap(), PDF_BYTES);
        assert_eq!(count_files(&dir.path().join("notes")), 1);
    }

    #[tokio::test]
    async fn test_unsupported_extension_writes_nothing() {
        let (dir, manager) = manager().await;

        let err = save_bytes(&manager, "malware.exe", b"MZ\x90\x00", UploadCategory::Projects)
            .await
            .unwrap_err();

        assert!(matches!(err, UploadError::UnsupportedType { ref filename } if filename == "malware.exe"));
        assert_eq!(
            err.message(Locale::Tr),
            "Desteklenmeyen dosya türü: malware.exe"
        );
        for category in UploadCategory::ALL {
            assert_eq!(count_files(&dir.path().join(category.as_str())), 0);
        }
    }

    #[tokio::test]
    async fn test_rejections_leave_directory_unchanged() {
        let (dir, manager) = manager().await;
        save_bytes(&manager, "keep.pdf", PDF_BYTES, UploadCategory::Questions)
            .await
            .unwrap();
        let questions = dir.path().join("questions");
        let before = count_files(&questions);

        for name in ["photo.jpg", "notes.docx", "code.zip", "noextension", "x.PNG.exe"] {
            let result = save_bytes(&manager, name, b"data", UploadCategory::Questions).await;
            assert!(result.is_err(), "{name} should be rejected");
        }

        assert_eq!(count_files(&questions), before);
    }

    #[tokio::test]
    async fn test_missing_file_and_empty_name() {
        let (_dir, manager) = manager().await;

        let err = manager
            .save(None, UploadCategory::Notes, 1)
            .await
            .unwrap_err();
        assert!(matches!(err, UploadError::NoFile));
        assert_eq!(err.message(Locale::Tr), "Dosya seçilmedi");

        let err = save_bytes(&manager, "   ", PDF_BYTES, UploadCategory::Notes)
            .await
            .unwrap_err();
        assert!(matches!(err, UploadError::NoFile));
    }

    #[tokio::test]
    async fn test_declared_size_boundary() {
        let (dir, manager) = manager_with(
            PolicyTable::default().with_max_size(UploadCategory::Questions, PDF_BYTES.len() as u64),
        )
        .await;

        // Exactly at the limit
        save_bytes(&manager, "exact.pdf", PDF_BYTES, UploadCategory::Questions)
            .await
            .unwrap();

        // One byte over, declared
        let mut reader: &[u8] = PDF_BYTES;
        let file = IncomingFile::new("over.pdf", &mut reader)
            .with_declared_size(Some(PDF_BYTES.len() as u64 + 1));
        let err = manager
            .save(Some(file), UploadCategory::Questions, 7)
            .await
            .unwrap_err();
        assert!(matches!(err, UploadError::TooLarge { .. }));

        assert_eq!(count_files(&dir.path().join("questions")), 1);
    }

    #[tokio::test]
    async fn test_actual_size_enforced_when_length_undeclared() {
        let (dir, manager) =
            manager_with(PolicyTable::default().with_max_size(UploadCategory::Notes, 8)).await;

        let mut reader: &[u8] = PDF_BYTES;
        let file = IncomingFile::new("big.pdf", &mut reader);
        let err = manager
            .save(Some(file), UploadCategory::Notes, 7)
            .await
            .unwrap_err();

        assert!(matches!(err, UploadError::TooLarge { max_mb: 0 }));
        assert_eq!(count_files(&dir.path().join("notes")), 0);
    }

    #[tokio::test]
    async fn test_renamed_zip_passes_heuristic_by_default() {
        let (dir, manager) = manager().await;

        let descriptor = save_bytes(&manager, "data.pdf", &zip_bytes(2), UploadCategory::Questions)
            .await
            .unwrap();

        assert_eq!(descriptor.extension, "pdf");
        assert_eq!(count_files(&dir.path().join("questions")), 1);
    }

    #[tokio::test]
    async fn test_strict_sniffing_catches_renamed_zip() {
        let (dir, manager) = manager().await;
        let manager = manager.with_strict_content_sniffing(true);

        let err = save_bytes(&manager, "data.pdf", &zip_bytes(2), UploadCategory::Questions)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            UploadError::Rejected(crate::ValidationError::ContentMismatch { .. })
        ));
        assert_eq!(count_files(&dir.path().join("questions")), 0);

        // Genuine content still goes through
        save_bytes(&manager, "real.pdf", PDF_BYTES, UploadCategory::Questions)
            .await
            .unwrap();
        save_bytes(&manager, "main.py", b"print('merhaba')\n", UploadCategory::Projects)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_strict_sniffing_accepts_shebang_script() {
        let (dir, manager) = manager().await;
        let manager = manager.with_strict_content_sniffing(true);

        let descriptor = save_bytes(
            &manager,
            "main.py",
            b"#!/usr/bin/env python3\nprint('merhaba')\n",
            UploadCategory::Projects,
        )
        .await
        .unwrap();

        assert_eq!(descriptor.extension, "py");
        assert_eq!(count_files(&dir.path().join("projects")), 1);
    }

    #[tokio::test]
    async fn test_strict_sniffing_accepts_docx_container() {
        let (dir, manager) = manager().await;
        let manager = manager.with_strict_content_sniffing(true);

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default().compression_method(CompressionMethod::Stored);
        for (name, body) in [
            ("[Content_Types].xml", "<Types/>"),
            ("_rels/.rels", "<Relationships/>"),
            ("word/document.xml", "<w:document/>"),
        ] {
            zip.start_file(name, options).unwrap();
            zip.write_all(body.as_bytes()).unwrap();
        }
        let docx = zip.finish().unwrap().into_inner();

        let descriptor = save_bytes(&manager, "odev.docx", &docx, UploadCategory::Notes)
            .await
            .unwrap();

        assert_eq!(descriptor.extension, "docx");
        assert_eq!(count_files(&dir.path().join("notes")), 1);
    }

    #[tokio::test]
    async fn test_save_then_delete_removes_only_that_file() {
        let (dir, manager) = manager().await;
        let first = save_bytes(&manager, "a.pdf", PDF_BYTES, UploadCategory::Notes)
            .await
            .unwrap();
        let second = save_bytes(&manager, "b.pdf", PDF_BYTES, UploadCategory::Notes)
            .await
            .unwrap();
        assert_ne!(first.stored_name, second.stored_name);

        manager.delete_file(&first.relative_path).await.unwrap();

        let notes = dir.path().join("notes");
        assert!(!notes.join(&first.stored_name).exists());
        assert!(notes.join(&second.stored_name).exists());
        assert_eq!(count_files(&notes), 1);
    }

    #[tokio::test]
    async fn test_double_delete_reports_not_found() {
        let (_dir, manager) = manager().await;
        let descriptor = save_bytes(&manager, "a.png", b"\x89PNG\r\n\x1a\n", UploadCategory::Notes)
            .await
            .unwrap();

        assert!(manager.delete_file(&descriptor.relative_path).await.is_ok());
        let err = manager
            .delete_file(&descriptor.relative_path)
            .await
            .unwrap_err();
        assert!(matches!(err, UploadError::NotFound(_)));
        assert_eq!(err.message(Locale::En), "File not found");
    }

    #[tokio::test]
    async fn test_invalid_references_are_rejected() {
        let (_dir, manager) = manager().await;
        for path in ["../secret.pdf", "/etc/passwd", "notes/../../x", "temp/x.pdf", "notes"] {
            let err = manager.delete_file(path).await.unwrap_err();
            assert!(matches!(err, UploadError::InvalidPath(_)), "{path}");
        }
    }

    #[tokio::test]
    async fn test_replace_removes_previous_file() {
        let (dir, manager) = manager().await;
        let old = save_bytes(&manager, "v1.zip", &zip_bytes(1), UploadCategory::Projects)
            .await
            .unwrap();

        let data = zip_bytes(3);
        let mut reader: &[u8] = &data;
        let file = IncomingFile::new("v2.zip", &mut reader);
        let new = manager
            .replace(&old.relative_path, Some(file), UploadCategory::Projects, 7)
            .await
            .unwrap();

        let projects = dir.path().join("projects");
        assert!(!projects.join(&old.stored_name).exists());
        assert!(projects.join(&new.stored_name).exists());
        assert_eq!(count_files(&projects), 1);
    }

    #[tokio::test]
    async fn test_replace_tolerates_missing_previous_file() {
        let (_dir, manager) = manager().await;
        let mut reader: &[u8] = PDF_BYTES;
        let file = IncomingFile::new("new.pdf", &mut reader);

        let descriptor = manager
            .replace(
                "notes/notes_20240101_000000_deadbeef.pdf",
                Some(file),
                UploadCategory::Notes,
                3,
            )
            .await
            .unwrap();
        assert_eq!(descriptor.owner_actor_id, 3);
    }

    #[tokio::test]
    async fn test_replace_keeps_previous_file_when_new_one_is_rejected() {
        let (dir, manager) = manager().await;
        let old = save_bytes(&manager, "v1.pdf", PDF_BYTES, UploadCategory::Notes)
            .await
            .unwrap();

        let mut reader: &[u8] = b"MZ";
        let file = IncomingFile::new("v2.exe", &mut reader);
        let err = manager
            .replace(&old.relative_path, Some(file), UploadCategory::Notes, 7)
            .await
            .unwrap_err();

        assert!(matches!(err, UploadError::UnsupportedType { .. }));
        assert!(dir.path().join("notes").join(&old.stored_name).exists());
    }

    #[tokio::test]
    async fn test_replace_rejects_category_mismatch() {
        let (_dir, manager) = manager().await;
        let mut reader: &[u8] = PDF_BYTES;
        let file = IncomingFile::new("new.pdf", &mut reader);

        let err = manager
            .replace("projects/p.pdf", Some(file), UploadCategory::Notes, 7)
            .await
            .unwrap_err();
        assert!(matches!(err, UploadError::InvalidPath(_)));
    }

    #[tokio::test]
    async fn test_archive_info_for_fifteen_entry_zip() {
        let (_dir, manager) = manager().await;
        let descriptor = save_bytes(&manager, "project.zip", &zip_bytes(15), UploadCategory::Projects)
            .await
            .unwrap();
        assert!(descriptor.is_archive());

        let report = manager
            .extract_archive_info(&descriptor.relative_path)
            .await
            .unwrap()
            .unwrap();
        let summary = report.summary().unwrap();
        assert_eq!(summary.entry_count, 15);
        assert_eq!(summary.sample_entries.len(), 10);
        assert_eq!(summary.sample_entries[0], "entry_00.txt");
        assert_eq!(summary.sample_entries[9], "entry_09.txt");
        assert_eq!(summary.total_uncompressed_size, 75);
    }

    #[tokio::test]
    async fn test_archive_info_for_text_file_is_none() {
        let (_dir, manager) = manager().await;
        let descriptor = save_bytes(&manager, "readme.txt", b"hello", UploadCategory::Projects)
            .await
            .unwrap();

        let report = manager
            .extract_archive_info(&descriptor.relative_path)
            .await
            .unwrap();
        assert!(report.is_none());
    }

    #[tokio::test]
    async fn test_archive_info_for_missing_zip() {
        let (_dir, manager) = manager().await;
        let err = manager
            .extract_archive_info("projects/gone.zip")
            .await
            .unwrap_err();
        assert!(matches!(err, UploadError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_file_info() {
        let (_dir, manager) = manager().await;
        let descriptor = save_bytes(&manager, "lecture.pdf", PDF_BYTES, UploadCategory::Notes)
            .await
            .unwrap();

        let info = manager
            .file_info(&descriptor.relative_path)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(info.size_bytes, PDF_BYTES.len() as u64);
        assert_eq!(info.mime_type, "application/pdf");

        assert!(manager
            .file_info("notes/missing.pdf")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_open_streams_contents() {
        use futures::StreamExt;

        let (_dir, manager) = manager().await;
        let descriptor = save_bytes(&manager, "lecture.pdf", PDF_BYTES, UploadCategory::Notes)
            .await
            .unwrap();

        let mut stream = manager.open(&descriptor.relative_path).await.unwrap();
        let mut body = Vec::new();
        while let Some(chunk) = stream.next().await {
            body.extend_from_slice(&chunk.unwrap());
        }
        assert_eq!(body, PDF_BYTES);

        assert!(matches!(
            manager.open("notes/missing.pdf").await,
            Err(UploadError::NotFound(_))
        ));
    }
}
