//! Application setup and initialization

pub mod routes;
pub mod server;
pub mod storage;

use crate::state::AppState;
use anyhow::{Context, Result};
use kampus_core::{Config, PolicyTable};
use kampus_processing::FileManager;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Fail fast on misconfiguration
    config
        .validate()
        .context("Configuration validation failed")?;

    crate::telemetry::init_telemetry()
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!(
        environment = %config.environment(),
        "Configuration loaded and validated successfully"
    );

    let storage = storage::setup_storage(&config).await?;

    let files = FileManager::new(storage, Arc::new(PolicyTable::default()))
        .with_locale(config.message_locale())
        .with_strict_content_sniffing(config.strict_content_sniffing());

    let state = Arc::new(AppState::new(config.clone(), Arc::new(files)));

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
