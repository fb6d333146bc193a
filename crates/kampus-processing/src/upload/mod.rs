//! Upload orchestration

pub mod error;
pub mod manager;
pub mod types;

pub use error::UploadError;
pub use manager::FileManager;
pub use types::{DownloadStream, IncomingFile};
