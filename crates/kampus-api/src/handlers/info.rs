use crate::auth::ActorContext;
use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::relative_path;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use kampus_core::{AppError, FileInfo, Message};
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/v0/uploads/{category}/{stored_name}/info",
    tag = "uploads",
    params(
        ("category" = String, Path, description = "Upload category"),
        ("stored_name" = String, Path, description = "Stored file name"),
        ("X-Actor-Id" = i64, Header, description = "Acting user id")
    ),
    responses(
        (status = 200, description = "File size, timestamps and MIME type", body = FileInfo),
        (status = 404, description = "File not found", body = ErrorResponse)
    )
)]
pub async fn get_file_info(
    State(state): State<Arc<AppState>>,
    _actor: ActorContext,
    Path((category, stored_name)): Path<(String, String)>,
) -> Result<Json<FileInfo>, HttpAppError> {
    let locale = state.files.locale();
    let path = relative_path(&category, &stored_name, locale)?;

    let info = state
        .files
        .file_info(&path)
        .await
        .map_err(|e| HttpAppError::from_upload(e, locale))?
        .ok_or_else(|| AppError::NotFound(Message::NotFound.render(locale)))?;

    Ok(Json(info))
}
