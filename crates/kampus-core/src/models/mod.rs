pub mod archive;
pub mod upload;

pub use archive::{ArchiveFailure, ArchiveKind, ArchiveReport, ArchiveSummary, ARCHIVE_SAMPLE_LIMIT};
pub use upload::{FileInfo, StoredFileDescriptor, UploadCategory};
