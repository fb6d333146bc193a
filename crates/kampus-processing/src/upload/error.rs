use kampus_core::{Locale, Message, PolicyError};
use kampus_storage::StorageError;

use crate::validator::ValidationError;

/// Why an upload operation did not succeed.
///
/// Every variant renders to a user-facing message through [`UploadError::message`].
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("No file selected")]
    NoFile,

    #[error("Invalid category: {0}")]
    InvalidCategory(String),

    #[error("Unsupported file type: {filename}")]
    UnsupportedType { filename: String },

    #[error("File too large (max {max_mb}MB)")]
    TooLarge { max_mb: u64 },

    #[error("Rejected after write: {0}")]
    Rejected(ValidationError),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid file path: {0}")]
    InvalidPath(String),

    #[error("Save failed: {0}")]
    SaveFailed(#[source] StorageError),

    #[error("Delete failed: {0}")]
    DeleteFailed(#[source] StorageError),

    #[error("Read failed: {0}")]
    ReadFailed(String),
}

impl UploadError {
    /// Message shown to the user, in the portal's UI language
    pub fn message(&self, locale: Locale) -> String {
        let message = match self {
            UploadError::NoFile => Message::NoFileSelected,
            UploadError::InvalidCategory(_) => Message::InvalidCategory,
            UploadError::UnsupportedType { filename } => Message::UnsupportedType { filename },
            UploadError::TooLarge { max_mb } => Message::TooLarge { max_mb: *max_mb },
            UploadError::Rejected(ValidationError::UnsafeExtension { extension }) => {
                Message::UnsafeExtension { extension }
            }
            UploadError::Rejected(ValidationError::UnsafeMimeType { mime_type }) => {
                Message::UnsafeMimeType { mime_type }
            }
            UploadError::Rejected(ValidationError::ContentMismatch { detected }) => {
                Message::UnsafeMimeType {
                    mime_type: detected,
                }
            }
            UploadError::Rejected(other) => {
                return Message::SaveFailed {
                    reason: &other.to_string(),
                }
                .render(locale)
            }
            UploadError::NotFound(_) => Message::NotFound,
            UploadError::InvalidPath(_) => Message::InvalidPath,
            UploadError::SaveFailed(e) => {
                return Message::SaveFailed {
                    reason: &e.to_string(),
                }
                .render(locale)
            }
            UploadError::DeleteFailed(e) => {
                return Message::DeleteFailed {
                    reason: &e.to_string(),
                }
                .render(locale)
            }
            UploadError::ReadFailed(reason) => Message::SaveFailed { reason },
        };
        message.render(locale)
    }

    /// Rejections caused by the upload itself rather than the server
    pub fn is_client_error(&self) -> bool {
        !matches!(
            self,
            UploadError::SaveFailed(_) | UploadError::DeleteFailed(_) | UploadError::ReadFailed(_)
        )
    }
}

impl From<PolicyError> for UploadError {
    fn from(err: PolicyError) -> Self {
        match err {
            PolicyError::UnknownCategory(category) => UploadError::InvalidCategory(category),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turkish_rejection_messages() {
        assert_eq!(UploadError::NoFile.message(Locale::Tr), "Dosya seçilmedi");
        assert_eq!(
            UploadError::TooLarge { max_mb: 50 }.message(Locale::Tr),
            "Dosya boyutu çok büyük. Maksimum: 50MB"
        );
        assert_eq!(
            UploadError::Rejected(ValidationError::UnsafeExtension {
                extension: "exe".to_string()
            })
            .message(Locale::Tr),
            "Güvenli olmayan dosya uzantısı: .exe"
        );
        assert_eq!(
            UploadError::NotFound("notes/x.pdf".to_string()).message(Locale::Tr),
            "Dosya bulunamadı"
        );
    }

    #[test]
    fn test_english_messages_and_storage_reasons() {
        let err = UploadError::SaveFailed(StorageError::WriteFailed("disk full".to_string()));
        assert!(err.message(Locale::En).starts_with("File save error:"));
        assert!(err.message(Locale::En).contains("disk full"));
        assert!(!err.is_client_error());

        let err = UploadError::Rejected(ValidationError::ContentMismatch {
            detected: "application/zip".to_string(),
        });
        assert_eq!(err.message(Locale::En), "Unsafe file type: application/zip");
        assert!(err.is_client_error());
    }

    #[test]
    fn test_unknown_category_maps_to_invalid_category() {
        let err: UploadError = PolicyError::UnknownCategory("temp".to_string()).into();
        assert_eq!(err.message(Locale::Tr), "Geçersiz dosya türü");
    }
}
