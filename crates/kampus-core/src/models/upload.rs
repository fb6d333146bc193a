use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use utoipa::ToSchema;

use crate::policy::PolicyError;

/// Upload category
///
/// Every upload, lookup and delete is scoped to exactly one category. Each category
/// owns its own directory under the uploads root and its own policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UploadCategory {
    Notes,
    Projects,
    Questions,
}

impl UploadCategory {
    pub const ALL: [UploadCategory; 3] = [
        UploadCategory::Notes,
        UploadCategory::Projects,
        UploadCategory::Questions,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UploadCategory::Notes => "notes",
            UploadCategory::Projects => "projects",
            UploadCategory::Questions => "questions",
        }
    }
}

impl FromStr for UploadCategory {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "notes" => Ok(UploadCategory::Notes),
            "projects" => Ok(UploadCategory::Projects),
            "questions" => Ok(UploadCategory::Questions),
            other => Err(PolicyError::UnknownCategory(other.to_string())),
        }
    }
}

impl Display for UploadCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

/// Metadata for a successfully stored upload
///
/// `relative_path` (`<category>/<stored_name>`) is the only reference a caller needs to
/// persist on its own record; it is accepted back by delete, replace, download and inspect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StoredFileDescriptor {
    /// Sanitized client filename, for display only
    pub original_name: String,
    pub stored_name: String,
    pub relative_path: String,
    /// Size read back from disk after the write
    pub size_bytes: u64,
    #[serde(rename = "file_type")]
    pub category: UploadCategory,
    /// Lowercase extension without the dot
    pub extension: String,
    pub uploaded_at: DateTime<Utc>,
    pub owner_actor_id: i64,
}

impl StoredFileDescriptor {
    /// Uppercase extension string stored on note/project/question records (e.g. `PDF`).
    pub fn record_file_type(&self) -> String {
        self.extension.to_uppercase()
    }

    pub fn is_archive(&self) -> bool {
        matches!(self.extension.as_str(), "zip" | "rar")
    }
}

/// Filesystem facts about a stored file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FileInfo {
    pub size_bytes: u64,
    /// Not every filesystem records a birth time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    pub modified: DateTime<Utc>,
    pub mime_type: String,
}
