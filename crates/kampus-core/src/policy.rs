//! Upload policies
//!
//! The per-category table of allowed extensions, allowed MIME types and size limits.
//! A [`PolicyTable`] is built once at startup and shared read-only (behind `Arc`) by the
//! validator and the file manager; nothing mutates it afterwards.

use std::collections::BTreeSet;

use crate::models::UploadCategory;

const MB: u64 = 1024 * 1024;

const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PolicyError {
    #[error("Unknown upload category: {0}")]
    UnknownCategory(String),
}

/// Immutable upload rules for one category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPolicy {
    allowed_extensions: BTreeSet<String>,
    allowed_mime_types: BTreeSet<String>,
    max_size_bytes: u64,
}

impl UploadPolicy {
    pub fn new(extensions: &[&str], mime_types: &[&str], max_size_bytes: u64) -> Self {
        Self {
            allowed_extensions: extensions.iter().map(|e| e.to_lowercase()).collect(),
            allowed_mime_types: mime_types.iter().map(|m| m.to_lowercase()).collect(),
            max_size_bytes,
        }
    }

    /// Lowercase extensions without the leading dot
    pub fn allowed_extensions(&self) -> &BTreeSet<String> {
        &self.allowed_extensions
    }

    pub fn allowed_mime_types(&self) -> &BTreeSet<String> {
        &self.allowed_mime_types
    }

    pub fn max_size_bytes(&self) -> u64 {
        self.max_size_bytes
    }

    /// Limit in whole megabytes, as shown to users
    pub fn max_size_mb(&self) -> u64 {
        self.max_size_bytes / MB
    }

    pub fn allows_extension(&self, extension: &str) -> bool {
        self.allowed_extensions.contains(&extension.to_lowercase())
    }

    pub fn allows_mime_type(&self, mime_type: &str) -> bool {
        self.allowed_mime_types.contains(&mime_type.to_lowercase())
    }
}

/// Policies for every upload category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyTable {
    notes: UploadPolicy,
    projects: UploadPolicy,
    questions: UploadPolicy,
}

impl PolicyTable {
    pub fn get(&self, category: UploadCategory) -> &UploadPolicy {
        match category {
            UploadCategory::Notes => &self.notes,
            UploadCategory::Projects => &self.projects,
            UploadCategory::Questions => &self.questions,
        }
    }

    /// Policy lookup by category name. Never falls back to another category.
    pub fn lookup(&self, category: &str) -> Result<&UploadPolicy, PolicyError> {
        let category: UploadCategory = category.parse()?;
        Ok(self.get(category))
    }

    /// Same table with a different size limit for one category.
    pub fn with_max_size(mut self, category: UploadCategory, max_size_bytes: u64) -> Self {
        let policy = match category {
            UploadCategory::Notes => &mut self.notes,
            UploadCategory::Projects => &mut self.projects,
            UploadCategory::Questions => &mut self.questions,
        };
        policy.max_size_bytes = max_size_bytes;
        self
    }
}

impl Default for PolicyTable {
    fn default() -> Self {
        Self {
            notes: UploadPolicy::new(
                &["pdf", "docx", "png", "jpg", "jpeg", "gif", "bmp"],
                &[
                    "application/pdf",
                    DOCX_MIME,
                    "image/png",
                    "image/jpeg",
                    "image/gif",
                    "image/bmp",
                ],
                50 * MB,
            ),
            // Archive and source types are listed with the aliases different MIME
            // databases report for them.
            projects: UploadPolicy::new(
                &["zip", "rar", "pdf", "docx", "txt", "py", "cpp", "h", "ino"],
                &[
                    "application/zip",
                    "application/x-zip-compressed",
                    "application/x-rar-compressed",
                    "application/vnd.rar",
                    "application/pdf",
                    DOCX_MIME,
                    "text/plain",
                    "text/x-python",
                    "text/x-script.python",
                    "text/x-c",
                    "text/x-csrc",
                    "text/x-chdr",
                    "text/x-c++src",
                    "text/x-c++hdr",
                    "text/x-c++",
                    "text/x-h",
                    "text/x-arduino",
                ],
                100 * MB,
            ),
            questions: UploadPolicy::new(
                &["pdf", "png"],
                &["application/pdf", "image/png"],
                100 * MB,
            ),
        }
    }
}
