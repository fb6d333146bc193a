//! Acting user
//!
//! Sessions and passwords are handled in front of this service; it only needs to know
//! who is acting so uploads can be tagged with an owner.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use kampus_core::AppError;

use crate::constants::ACTOR_ID_HEADER;
use crate::error::HttpAppError;

/// Authenticated actor context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActorContext {
    pub actor_id: i64,
}

// Extracted from request parts so it composes with Multipart
impl<S> FromRequestParts<S> for ActorContext
where
    S: Send + Sync,
{
    type Rejection = HttpAppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts.headers.get(ACTOR_ID_HEADER).ok_or_else(|| {
            AppError::Unauthorized(format!("Missing {} header", ACTOR_ID_HEADER))
        })?;

        let actor_id = value
            .to_str()
            .ok()
            .and_then(|v| v.trim().parse::<i64>().ok())
            .ok_or_else(|| AppError::Unauthorized(format!("Invalid {} header", ACTOR_ID_HEADER)))?;

        Ok(ActorContext { actor_id })
    }
}
