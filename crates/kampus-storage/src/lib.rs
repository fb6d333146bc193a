//! Kampus Storage Library
//!
//! This crate provides the storage abstraction for uploaded files and its local
//! filesystem implementation.
//!
//! # Storage key format
//!
//! Every stored file lives in its category directory and is addressed by a
//! storage key of the form `{category}/{stored_name}`, for example
//! `notes/notes_20240301_101500_3fa2c9d1.pdf`. Stored names are generated, never
//! taken from the client. Keys must not contain `..`, a backslash or a leading `/`.
//! Key and name generation is centralized in the `keys` module.

pub mod keys;
pub mod local;
pub mod traits;

// Re-export commonly used types
pub use keys::{generate_stored_name, split_storage_key, storage_key, TEMP_DIR};
pub use local::LocalStorage;
pub use traits::{ObjectMetadata, Storage, StorageError, StorageResult};
