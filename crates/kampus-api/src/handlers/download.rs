use crate::auth::ActorContext;
use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::relative_path;
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, Response, StatusCode},
    response::IntoResponse,
};
use futures::StreamExt;
use kampus_core::{AppError, Message};
use kampus_processing::sanitize_filename;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DownloadQuery {
    /// Original filename to offer the browser; defaults to the stored name
    pub name: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/v0/uploads/{category}/{stored_name}",
    tag = "uploads",
    params(
        ("category" = String, Path, description = "Upload category"),
        ("stored_name" = String, Path, description = "Stored file name"),
        ("X-Actor-Id" = i64, Header, description = "Acting user id"),
        DownloadQuery
    ),
    responses(
        (status = 200, description = "File contents", content_type = "application/octet-stream"),
        (status = 400, description = "Unknown category or bad path", body = ErrorResponse),
        (status = 404, description = "File not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip_all,
    fields(actor_id = actor.actor_id, operation = "download")
)]
pub async fn download_file(
    State(state): State<Arc<AppState>>,
    actor: ActorContext,
    Path((category, stored_name)): Path<(String, String)>,
    Query(query): Query<DownloadQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let locale = state.files.locale();
    let path = relative_path(&category, &stored_name, locale)?;

    let info = state
        .files
        .file_info(&path)
        .await
        .map_err(|e| HttpAppError::from_upload(e, locale))?
        .ok_or_else(|| AppError::NotFound(Message::NotFound.render(locale)))?;

    tracing::debug!(key = %path, size_bytes = info.size_bytes, "Streaming stored file");

    let stream = state
        .files
        .open(&path)
        .await
        .map_err(|e| HttpAppError::from_upload(e, locale))?;

    let body_stream = stream.map(|result| {
        result.map_err(|e| std::io::Error::other(format!("Storage stream error: {}", e)))
    });

    let display_name = query
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(stored_name.as_str());

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, info.mime_type.as_str())
        .header(header::CONTENT_LENGTH, info.size_bytes)
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition(display_name).as_str(),
        )
        .body(Body::from_stream(body_stream))
        .map_err(|e| AppError::Internal(format!("Failed to build response: {}", e)))?;

    Ok(response)
}

/// `attachment` disposition with an ASCII fallback and an RFC 5987 UTF-8 name.
fn content_disposition(name: &str) -> String {
    let ascii: String = sanitize_filename(name)
        .chars()
        .map(|c| if c.is_ascii() { c } else { '_' })
        .collect();
    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        ascii,
        utf8_percent_encode(name, NON_ALPHANUMERIC)
    )
}
