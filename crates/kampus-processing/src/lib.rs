//! Kampus upload processing
//!
//! Validation rules, filename sanitizing, archive inspection and the [`FileManager`]
//! that composes them over a [`kampus_storage::Storage`] backend.

pub mod archive;
pub mod sanitize;
pub mod upload;
pub mod validator;

pub use archive::{ArchiveError, ArchiveInspector};
pub use sanitize::sanitize_filename;
pub use upload::{FileManager, IncomingFile, UploadError};
pub use validator::{UploadValidator, ValidationError, SNIFF_PREFIX_BYTES};
