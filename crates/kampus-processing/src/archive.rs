//! Archive inspection
//!
//! Lists zip and rar containers without extracting anything. Sizes come from the
//! entry headers as declared; nothing is decompressed to verify them.

use kampus_core::models::ARCHIVE_SAMPLE_LIMIT;
use kampus_core::{ArchiveFailure, ArchiveKind, ArchiveReport, ArchiveSummary};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Rar error: {0}")]
    Rar(String),
}

/// Read-only zip/rar lister
#[derive(Debug, Clone, Copy, Default)]
pub struct ArchiveInspector;

impl ArchiveInspector {
    pub fn new() -> Self {
        Self
    }

    /// Summarize the archive at `path`.
    ///
    /// Dispatches on the extension alone. Returns `None` for anything that is not
    /// `.zip` or `.rar`; a listing failure comes back as [`ArchiveReport::Unreadable`].
    /// Blocking: call from `spawn_blocking` in async code.
    pub fn describe(&self, path: &Path) -> Option<ArchiveReport> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())?;
        let kind = ArchiveKind::from_extension(&extension)?;

        let listed = match kind {
            ArchiveKind::Zip => list_zip(path),
            ArchiveKind::Rar => list_rar(path),
        };

        Some(match listed {
            Ok(summary) => ArchiveReport::Summary(summary),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    archive_type = %kind,
                    error = %e,
                    "Archive could not be listed"
                );
                ArchiveReport::Unreadable(ArchiveFailure {
                    kind,
                    error: e.to_string(),
                })
            }
        })
    }
}

#[derive(Default)]
struct Listing {
    entry_count: usize,
    sample_entries: Vec<String>,
    total_uncompressed_size: u64,
}

impl Listing {
    fn push(&mut self, name: String, uncompressed_size: u64) {
        self.entry_count += 1;
        self.total_uncompressed_size = self.total_uncompressed_size.saturating_add(uncompressed_size);
        if self.sample_entries.len() < ARCHIVE_SAMPLE_LIMIT {
            self.sample_entries.push(name);
        }
    }

    fn into_summary(self, kind: ArchiveKind) -> ArchiveSummary {
        ArchiveSummary {
            kind,
            entry_count: self.entry_count,
            sample_entries: self.sample_entries,
            total_uncompressed_size: self.total_uncompressed_size,
        }
    }
}

fn list_zip(path: &Path) -> Result<ArchiveSummary, ArchiveError> {
    let file = File::open(path)?;
    let mut archive = zip::ZipArchive::new(BufReader::new(file))?;

    // by_index keeps central-directory order; file_names() does not
    let mut listing = Listing::default();
    for i in 0..archive.len() {
        let entry = archive.by_index_raw(i)?;
        listing.push(entry.name().to_string(), entry.size());
    }

    Ok(listing.into_summary(ArchiveKind::Zip))
}

fn list_rar(path: &Path) -> Result<ArchiveSummary, ArchiveError> {
    let mut archive = unrar::Archive::new(path)
        .open_for_listing()
        .map_err(|e| ArchiveError::Rar(e.to_string()))?;

    let mut listing = Listing::default();
    while let Some(header) = archive
        .read_header()
        .map_err(|e| ArchiveError::Rar(e.to_string()))?
    {
        let entry = header.entry();
        listing.push(
            entry.filename.to_string_lossy().to_string(),
            entry.unpacked_size,
        );
        archive = header
            .skip()
            .map_err(|e| ArchiveError::Rar(e.to_string()))?;
    }

    Ok(listing.into_summary(ArchiveKind::Rar))
}
