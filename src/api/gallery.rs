//! Gallery event photo management.

use axum::extract::{Path, State};

use super::{success, ApiResult};
use crate::auth::AdminAuth;
use crate::db::not_found;
use crate::errors::AppError;
use crate::models::{Document, GalleryEvent};
use crate::AppState;

/// DELETE /api/gallery-events/{id}/photos/{index} - Remove one photo from an event.
pub async fn remove_event_photo(
    State(state): State<AppState>,
    _admin: AdminAuth,
    Path((id, index)): Path<(String, usize)>,
) -> ApiResult<Document<GalleryEvent>> {
    let existing = state
        .repo
        .get::<GalleryEvent>(&id)
        .await?
        .ok_or_else(|| not_found::<GalleryEvent>(&id))?;

    if index >= existing.body.photos.len() {
        return Err(AppError::NotFound(format!(
            "Photo {} not found in gallery event {}",
            index, id
        )));
    }

    let mut body = existing.body;
    let removed = body.photos.remove(index);
    let saved = state.repo.replace(&id, &body).await?;

    state.uploads.remove(&removed).await;
    tracing::info!(%id, index, "gallery event photo removed");
    success(saved)
}
