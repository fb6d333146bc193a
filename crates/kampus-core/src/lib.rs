//! Kampus Core Library
//!
//! This crate provides the domain models, upload policies, error types, configuration
//! and user-facing messages shared by all Kampus components.

pub mod config;
pub mod error;
pub mod messages;
pub mod models;
pub mod policy;

// Re-export commonly used types
pub use config::{BaseConfig, Config, FileServiceConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use messages::{Locale, Message};
pub use models::{
    ArchiveFailure, ArchiveKind, ArchiveReport, ArchiveSummary, FileInfo, StoredFileDescriptor,
    UploadCategory,
};
pub use policy::{PolicyError, PolicyTable, UploadPolicy};
