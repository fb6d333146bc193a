//! Storage setup and initialization

use anyhow::{Context, Result};
use kampus_core::Config;
use kampus_storage::{LocalStorage, Storage};
use std::sync::Arc;

/// Create the uploads tree and return it behind the storage trait.
pub async fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    tracing::info!(root = %config.uploads_root().display(), "Initializing upload storage...");

    let storage = LocalStorage::new(config.uploads_root())
        .await
        .context("Failed to prepare upload directories")?;

    tracing::info!("Upload storage initialized successfully");
    Ok(Arc::new(storage))
}
