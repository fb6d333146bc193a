//! Application state

use kampus_core::Config;
use kampus_processing::FileManager;
use std::sync::Arc;

/// Shared state handed to every handler
pub struct AppState {
    pub config: Config,
    pub files: Arc<FileManager>,
}

impl AppState {
    pub fn new(config: Config, files: Arc<FileManager>) -> Self {
        Self { config, files }
    }
}
