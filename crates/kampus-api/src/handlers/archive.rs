use crate::auth::ActorContext;
use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::relative_path;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use kampus_core::{AppError, ArchiveReport};
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/v0/uploads/{category}/{stored_name}/archive",
    tag = "uploads",
    params(
        ("category" = String, Path, description = "Upload category"),
        ("stored_name" = String, Path, description = "Stored file name"),
        ("X-Actor-Id" = i64, Header, description = "Acting user id")
    ),
    responses(
        (status = 200, description = "Archive listing, or an error indicator if it could not be read", body = ArchiveReport),
        (status = 404, description = "File not found or not a zip/rar archive", body = ErrorResponse)
    )
)]
pub async fn get_archive_info(
    State(state): State<Arc<AppState>>,
    _actor: ActorContext,
    Path((category, stored_name)): Path<(String, String)>,
) -> Result<Json<ArchiveReport>, HttpAppError> {
    let locale = state.files.locale();
    let path = relative_path(&category, &stored_name, locale)?;

    let report = state
        .files
        .extract_archive_info(&path)
        .await
        .map_err(|e| HttpAppError::from_upload(e, locale))?
        .ok_or_else(|| AppError::NotFound(format!("Not a zip or rar archive: {}", stored_name)))?;

    Ok(Json(report))
}
