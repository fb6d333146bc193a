//! Upload and replace handlers

use crate::auth::ActorContext;
use crate::constants::FILE_FIELD;
use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::{parse_category, relative_path};
use crate::state::AppState;
use axum::{
    extract::{Multipart, Path, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use futures::StreamExt;
use kampus_core::{ArchiveReport, Message, StoredFileDescriptor, UploadCategory};
use kampus_processing::IncomingFile;
use serde::Serialize;
use std::sync::Arc;
use tokio_util::io::StreamReader;
use utoipa::ToSchema;

/// A stored upload, plus the archive listing for zip/rar files
#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    pub success: bool,
    pub message: String,
    pub file: StoredFileDescriptor,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archive: Option<ArchiveReport>,
}

#[utoipa::path(
    post,
    path = "/api/v0/uploads/{category}",
    tag = "uploads",
    params(
        ("category" = String, Path, description = "Upload category: notes, projects or questions"),
        ("X-Actor-Id" = i64, Header, description = "Acting user id")
    ),
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "File stored", body = UploadResponse),
        (status = 400, description = "No file or unknown category", body = ErrorResponse),
        (status = 401, description = "Missing actor", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 415, description = "File type not allowed", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip_all,
    fields(actor_id = actor.actor_id, operation = "upload")
)]
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    actor: ActorContext,
    Path(category): Path<String>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let locale = state.files.locale();
    let category = parse_category(&category, locale)?;

    let descriptor = receive_upload(&state, multipart, category, actor.actor_id, None).await?;
    let archive = archive_summary(&state, &descriptor).await;

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            success: true,
            message: Message::Uploaded.render(locale),
            file: descriptor,
            archive,
        }),
    ))
}

#[utoipa::path(
    put,
    path = "/api/v0/uploads/{category}/{stored_name}",
    tag = "uploads",
    params(
        ("category" = String, Path, description = "Upload category"),
        ("stored_name" = String, Path, description = "Stored name of the file being replaced"),
        ("X-Actor-Id" = i64, Header, description = "Acting user id")
    ),
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "File replaced", body = UploadResponse),
        (status = 400, description = "No file, unknown category or bad path", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 415, description = "File type not allowed", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip_all,
    fields(actor_id = actor.actor_id, operation = "replace")
)]
pub async fn replace_file(
    State(state): State<Arc<AppState>>,
    actor: ActorContext,
    Path((category, stored_name)): Path<(String, String)>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let locale = state.files.locale();
    let old_path = relative_path(&category, &stored_name, locale)?;
    let category = parse_category(&category, locale)?;

    let descriptor =
        receive_upload(&state, multipart, category, actor.actor_id, Some(&old_path)).await?;
    let archive = archive_summary(&state, &descriptor).await;

    Ok((
        StatusCode::OK,
        Json(UploadResponse {
            success: true,
            message: Message::Uploaded.render(locale),
            file: descriptor,
            archive,
        }),
    ))
}

/// Stream the `file` part into the file manager. Other parts are skipped.
async fn receive_upload(
    state: &AppState,
    mut multipart: Multipart,
    category: UploadCategory,
    actor_id: i64,
    replacing: Option<&str>,
) -> Result<StoredFileDescriptor, HttpAppError> {
    let files = &state.files;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(HttpAppError::from_multipart)?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let original_filename = field.file_name().map(str::to_string);
        let declared_size = declared_length(field.headers());
        let mut reader = StreamReader::new(Box::pin(
            field.map(|chunk| chunk.map_err(std::io::Error::other)),
        ));
        let file = IncomingFile {
            original_filename,
            declared_size,
            reader: &mut reader,
        };

        let result = match replacing {
            Some(old_path) => files.replace(old_path, Some(file), category, actor_id).await,
            None => files.save(Some(file), category, actor_id).await,
        };
        return result.map_err(|e| HttpAppError::from_upload(e, files.locale()));
    }

    let result = match replacing {
        Some(old_path) => files.replace(old_path, None, category, actor_id).await,
        None => files.save(None, category, actor_id).await,
    };
    result.map_err(|e| HttpAppError::from_upload(e, files.locale()))
}

fn declared_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}

/// Archive listing for zip/rar uploads. Never fails the upload.
async fn archive_summary(
    state: &AppState,
    descriptor: &StoredFileDescriptor,
) -> Option<ArchiveReport> {
    if !descriptor.is_archive() {
        return None;
    }

    match state
        .files
        .extract_archive_info(&descriptor.relative_path)
        .await
    {
        Ok(report) => report,
        Err(e) => {
            tracing::warn!(
                stored_name = %descriptor.stored_name,
                error = %e,
                "Archive inspection failed after upload"
            );
            None
        }
    }
}
