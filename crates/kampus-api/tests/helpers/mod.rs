//! Test helpers: build AppState and router over a temporary uploads root.
//!
//! Run from workspace root: `cargo test -p kampus-api`.

pub mod fixtures;

use axum_test::TestServer;
use kampus_api::constants;
use kampus_api::setup::routes;
use kampus_api::state::AppState;
use kampus_core::{Config, FileServiceConfig, PolicyTable};
use kampus_processing::FileManager;
use kampus_storage::{LocalStorage, Storage};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// Actor id sent by the default test client
pub const TEST_ACTOR_ID: &str = "42";

/// API path prefix for tests (e.g. `/api/v0`).
pub fn api_path(path: &str) -> String {
    format!("{}{}", constants::API_PREFIX, path)
}

/// Test application: server plus the uploads root it writes to.
pub struct TestApp {
    pub server: TestServer,
    pub root: PathBuf,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Number of files currently stored in one category directory
    pub fn stored_count(&self, category: &str) -> usize {
        count_files(&self.root.join(category))
    }
}

fn count_files(dir: &Path) -> usize {
    std::fs::read_dir(dir)
        .map(|entries| entries.filter_map(Result::ok).count())
        .unwrap_or(0)
}

/// Setup test app with the default policies.
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(PolicyTable::default()).await
}

/// Setup test app with custom upload policies.
pub async fn setup_test_app_with(policies: PolicyTable) -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let root = temp_dir.path().join("uploads");

    let config = Config::from(FileServiceConfig::new(&root));

    let storage: Arc<dyn Storage> = Arc::new(
        LocalStorage::new(&root)
            .await
            .expect("Failed to create local storage"),
    );
    let files = FileManager::new(storage, Arc::new(policies))
        .with_locale(config.message_locale())
        .with_strict_content_sniffing(config.strict_content_sniffing());
    let state = Arc::new(AppState::new(config.clone(), Arc::new(files)));

    let app = routes::setup_routes(&config, state).expect("Failed to setup routes");
    let server = TestServer::new(app).expect("Failed to create test server");

    TestApp {
        server,
        root,
        _temp_dir: temp_dir,
    }
}
