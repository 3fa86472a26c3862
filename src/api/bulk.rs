//! Whole-collection saves for the screens that edit a list at once.

use std::collections::HashSet;

use axum::{extract::State, Json};
use serde::Deserialize;

use super::{success, ApiResult};
use crate::auth::AdminAuth;
use crate::errors::AppError;
use crate::models::{DirectoryDivision, Document, Entity, Locale, Policy};
use crate::AppState;

/// One row of a bulk save; `_id` is absent for new rows.
#[derive(Debug, Deserialize)]
pub struct BulkItem<E> {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    #[serde(flatten)]
    pub body: E,
}

/// Request body for replacing all policies.
#[derive(Debug, Deserialize)]
pub struct ReplacePoliciesRequest {
    pub policies: Vec<BulkItem<Policy>>,
}

/// Request body for replacing the phone directory.
#[derive(Debug, Deserialize)]
pub struct ReplaceDirectoryRequest {
    pub divisions: Vec<BulkItem<DirectoryDivision>>,
}

/// PUT /api/policies - Replace the whole list in one transaction.
pub async fn replace_policies(
    State(state): State<AppState>,
    _admin: AdminAuth,
    Json(request): Json<ReplacePoliciesRequest>,
) -> ApiResult<Vec<Document<Policy>>> {
    success(replace_collection(&state, request.policies).await?)
}

/// PUT /api/phone-directory - Replace every division and its officers.
///
/// Officers without an `_id` are given one so later saves can track them.
pub async fn replace_directory(
    State(state): State<AppState>,
    _admin: AdminAuth,
    Json(request): Json<ReplaceDirectoryRequest>,
) -> ApiResult<Vec<Document<DirectoryDivision>>> {
    let mut divisions = request.divisions;
    for division in &mut divisions {
        for officer in &mut division.body.officers {
            if officer.id.as_deref().map_or(true, |id| id.trim().is_empty()) {
                officer.id = Some(uuid::Uuid::new_v4().to_string());
            }
        }
    }

    success(replace_collection(&state, divisions).await?)
}

async fn replace_collection<E: Entity>(
    state: &AppState,
    items: Vec<BulkItem<E>>,
) -> Result<Vec<Document<E>>, AppError> {
    check_ids(&items)?;
    for item in &items {
        item.body.validate()?;
    }

    let items: Vec<(Option<String>, E)> = items
        .into_iter()
        .map(|item| (item.id, item.body))
        .collect();

    state.repo.replace_all(&items).await
}

/// Client-kept ids must be unique and must not read as a locale.
fn check_ids<E: Entity>(items: &[BulkItem<E>]) -> Result<(), AppError> {
    let mut seen = HashSet::new();
    for id in items.iter().filter_map(|item| item.id.as_deref()) {
        let id = id.trim();
        if id.is_empty() {
            continue;
        }
        if Locale::parse(id).is_some() {
            return Err(AppError::Validation(format!(
                "'{}' is reserved and cannot be used as a {} id",
                id,
                E::LABEL
            )));
        }
        if !seen.insert(id) {
            return Err(AppError::Validation(format!(
                "Duplicate {} id '{}'",
                E::LABEL,
                id
            )));
        }
    }
    Ok(())
}
