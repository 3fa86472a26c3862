//! About-us singleton endpoints.

use axum::extract::{Query, State};
use serde::Deserialize;
use serde_json::Value;

use super::{success, ApiResult, Payload};
use crate::auth::AdminAuth;
use crate::errors::AppError;
use crate::models::{localize, AboutUs, Document, Entity, Locale};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LangQuery {
    pub lang: Option<String>,
}

/// GET /api/about-us?lang= - The about-us document, localized when `lang` is given.
///
/// Returns an empty document until the first save.
pub async fn get_about_us(
    State(state): State<AppState>,
    Query(query): Query<LangQuery>,
) -> ApiResult<Value> {
    let value = match state.repo.first::<AboutUs>().await? {
        Some(document) => serde_json::to_value(document)?,
        None => serde_json::to_value(AboutUs::default())?,
    };

    match query.lang {
        Some(lang) => {
            let locale = Locale::parse(&lang)
                .ok_or_else(|| AppError::BadRequest(format!("Unsupported language: {}", lang)))?;
            success(localize(&value, locale))
        }
        None => success(value),
    }
}

/// POST /api/about-us - Create or update the about-us document.
pub async fn save_about_us(
    State(state): State<AppState>,
    _admin: AdminAuth,
    payload: Payload<AboutUs>,
) -> ApiResult<Document<AboutUs>> {
    let body = match state.repo.first::<AboutUs>().await? {
        Some(existing) => payload.apply_to(&existing.body)?,
        None => payload.to_new()?,
    };
    body.validate()?;

    let document = state.repo.upsert_first(&body).await?;
    tracing::info!(collection = AboutUs::COLLECTION, "about-us saved");
    success(document)
}
