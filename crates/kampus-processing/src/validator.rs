use kampus_core::{PolicyTable, UploadCategory};
use std::path::Path;
use std::sync::Arc;

/// Bytes read from the start of a written file for magic-byte inspection
pub const SNIFF_PREFIX_BYTES: usize = 8 * 1024;

const UNDETERMINED_MIME: &str = "application/octet-stream";

/// Extensions whose content is a generic container format
const CONTAINER_ALIASES: &[(&str, &str)] = &[("docx", "application/zip")];

/// Source and text extensions; any `text/*` detection is acceptable
const TEXT_EXTENSIONS: &[&str] = &["txt", "py", "cpp", "h", "ino"];

/// Validation failures for uploads
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("File too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge { size: u64, max: u64 },

    #[error("Unsafe file extension: {extension}")]
    UnsafeExtension { extension: String },

    #[error("Unsafe MIME type: {mime_type}")]
    UnsafeMimeType { mime_type: String },

    #[error("Content looks like {detected}, which is not allowed")]
    ContentMismatch { detected: String },
}

/// Upload validator
///
/// Pure checks against the shared [`PolicyTable`]. Nothing here touches the
/// filesystem; `check_content_safety` only looks at the path string.
#[derive(Debug, Clone)]
pub struct UploadValidator {
    policies: Arc<PolicyTable>,
}

impl UploadValidator {
    pub fn new(policies: Arc<PolicyTable>) -> Self {
        Self { policies }
    }

    pub fn policies(&self) -> &PolicyTable {
        &self.policies
    }

    /// Lowercase text after the final `.`, or `None` when there is no dot.
    pub fn extension_of(filename: &str) -> Option<String> {
        filename
            .rsplit_once('.')
            .map(|(_, extension)| extension.to_lowercase())
    }

    /// Extension must exist and be allowed for the category. Fails closed.
    pub fn check_extension(&self, filename: &str, category: UploadCategory) -> bool {
        match Self::extension_of(filename) {
            Some(extension) => self.policies.get(category).allows_extension(&extension),
            None => false,
        }
    }

    /// Declared length must not exceed the category limit.
    ///
    /// A missing length passes; the transport's request ceiling and the post-write
    /// size check cover that case.
    pub fn check_size(&self, declared_length: Option<u64>, category: UploadCategory) -> bool {
        match declared_length {
            Some(length) => length <= self.policies.get(category).max_size_bytes(),
            None => true,
        }
    }

    /// Size of a materialized file against the category limit.
    pub fn check_actual_size(
        &self,
        size: u64,
        category: UploadCategory,
    ) -> Result<(), ValidationError> {
        let max = self.policies.get(category).max_size_bytes();
        if size > max {
            return Err(ValidationError::FileTooLarge { size, max });
        }
        Ok(())
    }

    /// Re-check a written path: extension again, then the MIME type guessed from it.
    ///
    /// The guess is extension driven, so a renamed file with an allowed extension
    /// passes. An undeterminable MIME type is not a rejection on its own.
    pub fn check_content_safety(
        &self,
        path: &Path,
        category: UploadCategory,
    ) -> Result<(), ValidationError> {
        let policy = self.policies.get(category);
        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default();

        let extension = Self::extension_of(filename).unwrap_or_default();
        if !policy.allows_extension(&extension) {
            return Err(ValidationError::UnsafeExtension { extension });
        }

        let guesses = Self::guess_mime_types(path);
        if guesses.is_empty() || guesses.iter().any(|m| policy.allows_mime_type(m)) {
            return Ok(());
        }

        Err(ValidationError::UnsafeMimeType {
            mime_type: guesses[0].clone(),
        })
    }

    /// Magic-byte check of the start of a file against what its extension implies.
    ///
    /// Unrecognised content passes. Container formats match their generic container
    /// type (a docx is a zip) and source files match any `text/*` detection, so a
    /// shebang script stays a valid `.py`.
    pub fn sniff_content(&self, prefix: &[u8], extension: &str) -> Result<(), ValidationError> {
        let Some(kind) = infer::get(prefix) else {
            return Ok(());
        };

        let detected = kind.mime_type();
        if Self::content_matches_extension(detected, extension) {
            Ok(())
        } else {
            Err(ValidationError::ContentMismatch {
                detected: detected.to_string(),
            })
        }
    }

    fn content_matches_extension(detected: &str, extension: &str) -> bool {
        let extension = extension.to_lowercase();

        if TEXT_EXTENSIONS.contains(&extension.as_str()) && detected.starts_with("text/") {
            return true;
        }

        if CONTAINER_ALIASES
            .iter()
            .any(|(ext, container)| *ext == extension && *container == detected)
        {
            return true;
        }

        mime_guess::from_ext(&extension)
            .iter()
            .any(|mime| mime.essence_str() == detected)
    }

    /// MIME types the path's extension maps to, excluding the generic fallback.
    pub fn guess_mime_types(path: &Path) -> Vec<String> {
        mime_guess::from_path(path)
            .iter()
            .map(|mime| mime.essence_str().to_string())
            .filter(|mime| mime != UNDETERMINED_MIME)
            .collect()
    }
}
