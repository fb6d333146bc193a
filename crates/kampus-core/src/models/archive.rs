use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use utoipa::ToSchema;

/// Number of entry names kept in an archive summary
pub const ARCHIVE_SAMPLE_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ArchiveKind {
    Zip,
    Rar,
}

impl ArchiveKind {
    /// Archive kind for a lowercase extension, if it is one we can list.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension {
            "zip" => Some(ArchiveKind::Zip),
            "rar" => Some(ArchiveKind::Rar),
            _ => None,
        }
    }
}

impl Display for ArchiveKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ArchiveKind::Zip => write!(f, "zip"),
            ArchiveKind::Rar => write!(f, "rar"),
        }
    }
}

/// Table-of-contents view of an archive.
///
/// Serialized with the field names project records already store
/// (`type`, `file_count`, `files`, `total_size`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ArchiveSummary {
    #[serde(rename = "type")]
    pub kind: ArchiveKind,
    #[serde(rename = "file_count")]
    pub entry_count: usize,
    /// First entries in listing order, at most [`ARCHIVE_SAMPLE_LIMIT`]
    #[serde(rename = "files")]
    pub sample_entries: Vec<String>,
    /// Sum of header-declared uncompressed sizes
    #[serde(rename = "total_size")]
    pub total_uncompressed_size: u64,
}

/// An archive that could not be listed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ArchiveFailure {
    #[serde(rename = "type")]
    pub kind: ArchiveKind,
    pub error: String,
}

/// Outcome of inspecting a zip/rar file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum ArchiveReport {
    Summary(ArchiveSummary),
    Unreadable(ArchiveFailure),
}

impl ArchiveReport {
    pub fn kind(&self) -> ArchiveKind {
        match self {
            ArchiveReport::Summary(summary) => summary.kind,
            ArchiveReport::Unreadable(failure) => failure.kind,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ArchiveReport::Unreadable(_))
    }

    pub fn summary(&self) -> Option<&ArchiveSummary> {
        match self {
            ArchiveReport::Summary(summary) => Some(summary),
            ArchiveReport::Unreadable(_) => None,
        }
    }

    /// Opaque blob attached to a project record
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
