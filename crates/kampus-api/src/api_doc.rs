//! OpenAPI documentation.
//! Handler annotations carry literal `/api/v0` paths; the served document is rewritten
//! to [`API_VERSION`] if that ever moves.

use utoipa::OpenApi;

use crate::constants::{API_BASE, API_VERSION};
use crate::error;
use crate::handlers;
use kampus_core::models;

const OPENAPI_PATH_PLACEHOLDER: &str = "/api/v0";

fn transform_openapi_paths(spec: &mut utoipa::openapi::OpenApi, version: &str) {
    let replacement = format!("{}/{}", API_BASE, version);
    if OPENAPI_PATH_PLACEHOLDER == replacement {
        return;
    }
    let path_map = std::mem::take(&mut spec.paths.paths);
    for (key, item) in path_map {
        let new_key = key.replacen(OPENAPI_PATH_PLACEHOLDER, &replacement, 1);
        spec.paths.paths.insert(new_key, item);
    }
}

/// The OpenAPI document served at `/api/openapi.json`
pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    let mut spec = ApiDoc::openapi();
    transform_openapi_paths(&mut spec, API_VERSION);
    spec
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Kampus Files API",
        version = "0.1.0",
        description = "Upload, replace, download and inspect course notes, projects and past exam questions. Upload endpoints are versioned under /api/v0/."
    ),
    paths(
        handlers::upload::upload_file,
        handlers::upload::replace_file,
        handlers::download::download_file,
        handlers::delete::delete_file,
        handlers::info::get_file_info,
        handlers::archive::get_archive_info,
        handlers::health::liveness_check,
    ),
    components(
        schemas(
            models::UploadCategory,
            models::StoredFileDescriptor,
            models::FileInfo,
            models::ArchiveKind,
            models::ArchiveSummary,
            models::ArchiveFailure,
            models::ArchiveReport,
            handlers::upload::UploadResponse,
            handlers::MessageResponse,
            handlers::health::HealthResponse,
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "uploads", description = "Stored course files"),
        (name = "health", description = "Service liveness")
    )
)]
pub struct ApiDoc;
