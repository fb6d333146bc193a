use crate::auth::ActorContext;
use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::{relative_path, MessageResponse};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use kampus_core::Message;
use std::sync::Arc;

#[utoipa::path(
    delete,
    path = "/api/v0/uploads/{category}/{stored_name}",
    tag = "uploads",
    params(
        ("category" = String, Path, description = "Upload category"),
        ("stored_name" = String, Path, description = "Stored file name"),
        ("X-Actor-Id" = i64, Header, description = "Acting user id")
    ),
    responses(
        (status = 200, description = "File deleted", body = MessageResponse),
        (status = 400, description = "Unknown category or bad path", body = ErrorResponse),
        (status = 404, description = "File not found", body = ErrorResponse),
        (status = 500, description = "Delete failed", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip_all,
    fields(actor_id = actor.actor_id, operation = "delete")
)]
pub async fn delete_file(
    State(state): State<Arc<AppState>>,
    actor: ActorContext,
    Path((category, stored_name)): Path<(String, String)>,
) -> Result<impl IntoResponse, HttpAppError> {
    let locale = state.files.locale();
    let path = relative_path(&category, &stored_name, locale)?;

    state
        .files
        .delete_file(&path)
        .await
        .map_err(|e| HttpAppError::from_upload(e, locale))?;

    tracing::info!(actor_id = actor.actor_id, key = %path, "File deleted");

    Ok((
        StatusCode::OK,
        Json(MessageResponse {
            success: true,
            message: Message::Deleted.render(locale),
        }),
    ))
}
