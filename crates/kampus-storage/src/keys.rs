//! Shared name and key generation.
//!
//! Stored name format: `{category}_{YYYYMMDD_HHMMSS}_{8 hex}.{ext}`.
//! Key format: `{category}/{stored_name}`.

use chrono::Utc;
use kampus_core::UploadCategory;
use uuid::Uuid;

/// Scratch directory created next to the category directories
pub const TEMP_DIR: &str = "temp";

/// Generate a storage name for an upload.
///
/// The extension is the lowercase text after the final `.` of `original_filename`;
/// callers must reject names without a dot before calling. The random suffix gives
/// 2^32 names per category per second, and no on-disk collision check is made.
pub fn generate_stored_name(original_filename: &str, category: UploadCategory) -> String {
    let extension = original_filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default();
    let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
    let suffix = Uuid::new_v4().simple().to_string();

    format!("{}_{}_{}.{}", category, timestamp, &suffix[..8], extension)
}

/// Storage key for a stored name in a category directory.
pub fn storage_key(category: UploadCategory, stored_name: &str) -> String {
    format!("{}/{}", category, stored_name)
}

/// Split a storage key into its category and stored name.
///
/// Returns `None` for anything that is not exactly `{category}/{name}` with a known
/// category and a non-empty name.
pub fn split_storage_key(storage_key: &str) -> Option<(UploadCategory, &str)> {
    let (category, stored_name) = storage_key.split_once('/')?;
    if stored_name.is_empty() || stored_name.contains('/') {
        return None;
    }
    let category = category.parse().ok()?;
    Some((category, stored_name))
}
