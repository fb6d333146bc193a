//! Request handlers

pub mod archive;
pub mod delete;
pub mod download;
pub mod health;
pub mod info;
pub mod upload;

use kampus_core::{Locale, UploadCategory};
use kampus_processing::UploadError;
use kampus_storage::storage_key;
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::HttpAppError;

/// Outcome of an operation that returns no payload
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

/// Parse the `{category}` path segment. Unknown names never fall back to another category.
pub(crate) fn parse_category(raw: &str, locale: Locale) -> Result<UploadCategory, HttpAppError> {
    raw.parse::<UploadCategory>()
        .map_err(|e| HttpAppError::from_upload(UploadError::from(e), locale))
}

/// `<category>/<stored_name>` reference for a path pair.
pub(crate) fn relative_path(
    raw_category: &str,
    stored_name: &str,
    locale: Locale,
) -> Result<String, HttpAppError> {
    let category = parse_category(raw_category, locale)?;
    Ok(storage_key(category, stored_name))
}
