//! Route configuration and setup

use crate::constants::API_PREFIX;
use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Json, Router,
};
use kampus_core::Config;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;
    let body_limit = usize::try_from(config.max_request_size_bytes()).unwrap_or(usize::MAX);

    let app = public_routes()
        .merge(upload_routes())
        .merge(utoipa_rapidoc::RapiDoc::new("/api/openapi.json").path("/docs"))
        // Multipart streams to disk; the tower layer owns the request ceiling
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ];
    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        if config.is_production() {
            tracing::warn!("CORS configured to allow all origins - not recommended for production");
        }
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(Any)
    };
    Ok(cors)
}

/// Routes that need no actor
fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(handlers::health::liveness_check))
        .route(
            "/api/openapi.json",
            get(|| async { Json(crate::api_doc::get_openapi_spec()) }),
        )
}

/// Upload, download and inspection routes; every handler extracts the actor
fn upload_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/uploads/{{category}}", API_PREFIX),
            post(handlers::upload::upload_file),
        )
        .route(
            &format!("{}/uploads/{{category}}/{{stored_name}}", API_PREFIX),
            get(handlers::download::download_file)
                .put(handlers::upload::replace_file)
                .delete(handlers::delete::delete_file),
        )
        .route(
            &format!("{}/uploads/{{category}}/{{stored_name}}/info", API_PREFIX),
            get(handlers::info::get_file_info),
        )
        .route(
            &format!("{}/uploads/{{category}}/{{stored_name}}/archive", API_PREFIX),
            get(handlers::archive::get_archive_info),
        )
}
