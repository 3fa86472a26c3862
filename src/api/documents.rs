//! Collection endpoints shared by every content type.

use axum::{
    extract::{Path, State},
    http::HeaderMap,
};
use serde::Serialize;
use serde_json::Value;

use super::{attachment_paths, success, ApiResult, Payload};
use crate::auth::{require_admin, AdminAuth};
use crate::db::not_found;
use crate::errors::AppError;
use crate::models::{localize, Document, Entity, Locale};
use crate::uploads::UploadStore;
use crate::AppState;

/// Either a localized list or one raw document.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum DocumentView<E> {
    Localized(Vec<Value>),
    Single(Document<E>),
}

/// GET /api/{collection} - List all documents with both locales.
pub async fn list_documents<E: Entity>(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Vec<Document<E>>> {
    if !E::PUBLIC_READ {
        require_admin(state.config.admin_token.as_deref(), &headers)?;
    }

    success(state.repo.list::<E>().await?)
}

/// GET /api/{collection}/{key} - Localized list when `key` is a locale, else one document.
pub async fn get_document<E: Entity>(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(key): Path<String>,
) -> ApiResult<DocumentView<E>> {
    if !E::PUBLIC_READ {
        require_admin(state.config.admin_token.as_deref(), &headers)?;
    }

    if let Some(locale) = Locale::parse(&key) {
        let documents = state.repo.list::<E>().await?;
        return success(DocumentView::Localized(localize_all(&documents, locale)?));
    }

    let document = state
        .repo
        .get::<E>(&key)
        .await?
        .ok_or_else(|| not_found::<E>(&key))?;
    success(DocumentView::Single(document))
}

/// POST /api/{collection} - Create a document.
pub async fn create_document<E: Entity>(
    State(state): State<AppState>,
    _admin: AdminAuth,
    payload: Payload<E>,
) -> ApiResult<Document<E>> {
    let result = async {
        let body = payload.to_new()?;
        body.validate()?;
        state.repo.insert(&body).await
    }
    .await;
    let document = payload.settle(&state.uploads, result).await?;

    tracing::info!(collection = E::COLLECTION, id = %document.id, "created");
    success(document)
}

/// PUT /api/{collection}/{id} - Update a document; omitted fields keep their value.
pub async fn update_document<E: Entity>(
    State(state): State<AppState>,
    _admin: AdminAuth,
    Path(id): Path<String>,
    payload: Payload<E>,
) -> ApiResult<Document<E>> {
    let result = async {
        let existing = state
            .repo
            .get::<E>(&id)
            .await?
            .ok_or_else(|| not_found::<E>(&id))?;
        let body = payload.apply_to(&existing.body)?;
        body.validate()?;
        let saved = state.repo.replace(&id, &body).await?;
        Ok::<_, AppError>((existing, saved))
    }
    .await;
    let (existing, saved) = payload.settle(&state.uploads, result).await?;

    remove_replaced_files(&state.uploads, &existing.body, &saved.body).await?;

    tracing::info!(collection = E::COLLECTION, %id, "updated");
    success(saved)
}

/// DELETE /api/{collection}/{id} - Delete a document and its files.
pub async fn delete_document<E: Entity>(
    State(state): State<AppState>,
    _admin: AdminAuth,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let removed = state.repo.delete::<E>(&id).await?;

    let body = serde_json::to_value(&removed.body)?;
    for slot in E::ATTACHMENTS {
        state
            .uploads
            .remove_all(&attachment_paths(&body, slot.field))
            .await;
    }

    tracing::info!(collection = E::COLLECTION, %id, "deleted");
    success(())
}

pub(crate) fn localize_all<E: Entity>(
    documents: &[Document<E>],
    locale: Locale,
) -> Result<Vec<Value>, AppError> {
    documents
        .iter()
        .map(|document| Ok(localize(&serde_json::to_value(document)?, locale)))
        .collect()
}

/// Delete files an update no longer references.
async fn remove_replaced_files<E: Entity>(
    uploads: &UploadStore,
    before: &E,
    after: &E,
) -> Result<(), AppError> {
    if E::ATTACHMENTS.is_empty() {
        return Ok(());
    }

    let before = serde_json::to_value(before)?;
    let after = serde_json::to_value(after)?;
    for slot in E::ATTACHMENTS {
        let kept = attachment_paths(&after, slot.field);
        let dropped: Vec<String> = attachment_paths(&before, slot.field)
            .into_iter()
            .filter(|path| !kept.contains(path))
            .collect();
        uploads.remove_all(&dropped).await;
    }
    Ok(())
}
