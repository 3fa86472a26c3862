//! Write payloads arriving as JSON or multipart form data.

use std::marker::PhantomData;

use axum::{
    extract::{FromRequest, Multipart, Request},
    http::header,
    Json,
};
use serde_json::{Map, Value};

use crate::errors::AppError;
use crate::models::{Entity, RESERVED_KEYS};
use crate::uploads::UploadStore;
use crate::AppState;

/// Fields submitted for one entity.
///
/// Multipart file parts matching one of the entity's attachment slots are
/// stored on arrival; their paths replace single slots and are appended to
/// list slots.
#[derive(Debug)]
pub struct Payload<E> {
    fields: Map<String, Value>,
    appended: Map<String, Value>,
    stored: Vec<String>,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> Payload<E> {
    /// Wrap submitted fields, dropping store-owned keys.
    ///
    /// Attachment slots only change through an upload. A text value for one
    /// is ignored; an explicit `null` clears it.
    pub fn from_fields(mut fields: Map<String, Value>) -> Self {
        for key in RESERVED_KEYS {
            fields.remove(key);
        }
        fields.retain(|key, value| match E::attachment(key) {
            Some(_) => value.is_null(),
            None => true,
        });
        for slot in E::ATTACHMENTS.iter().filter(|slot| slot.multiple) {
            if let Some(value) = fields.get_mut(slot.field) {
                *value = Value::Array(Vec::new());
            }
        }
        Self {
            fields,
            appended: Map::new(),
            stored: Vec::new(),
            _entity: PhantomData,
        }
    }

    /// Paths of files written while reading this payload.
    pub fn stored_files(&self) -> &[String] {
        &self.stored
    }

    /// Build a new entity from the submitted fields alone.
    pub fn to_new(&self) -> Result<E, AppError> {
        self.apply_to(&E::default())
    }

    /// Overlay the submitted fields onto an existing body.
    pub fn apply_to(&self, existing: &E) -> Result<E, AppError> {
        let mut merged = match serde_json::to_value(existing)? {
            Value::Object(map) => map,
            _ => Map::new(),
        };

        for (key, value) in &self.fields {
            merged.insert(key.clone(), value.clone());
        }
        for (key, added) in &self.appended {
            let slot = merged
                .entry(key.clone())
                .or_insert_with(|| Value::Array(Vec::new()));
            match (slot, added) {
                (Value::Array(current), Value::Array(added)) => current.extend(added.iter().cloned()),
                (slot, added) => *slot = added.clone(),
            }
        }

        serde_json::from_value(Value::Object(merged))
            .map_err(|e| AppError::Validation(format!("Invalid {}: {}", E::LABEL, e)))
    }

    /// Drop the stored uploads if `result` failed, then pass it on.
    pub async fn settle<T>(
        &self,
        uploads: &UploadStore,
        result: Result<T, AppError>,
    ) -> Result<T, AppError> {
        if result.is_err() {
            uploads.remove_all(&self.stored).await;
        }
        result
    }
}

impl<E: Entity> FromRequest<AppState> for Payload<E> {
    type Rejection = AppError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("multipart/form-data"));

        if is_multipart {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            return read_multipart(multipart, &state.uploads).await;
        }

        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        match value {
            Value::Object(fields) => Ok(Self::from_fields(fields)),
            _ => Err(AppError::BadRequest(
                "Request body must be a JSON object".to_string(),
            )),
        }
    }
}

async fn read_multipart<E: Entity>(
    mut multipart: Multipart,
    uploads: &UploadStore,
) -> Result<Payload<E>, AppError> {
    let mut payload = Payload::from_fields(Map::new());

    if let Err(e) = collect_parts(&mut multipart, uploads, &mut payload).await {
        uploads.remove_all(&payload.stored).await;
        return Err(e);
    }
    for key in RESERVED_KEYS {
        payload.fields.remove(key);
    }

    Ok(payload)
}

async fn collect_parts<E: Entity>(
    multipart: &mut Multipart,
    uploads: &UploadStore,
    payload: &mut Payload<E>,
) -> Result<(), AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        let Some(slot) = E::attachment(&name) else {
            let text = field
                .text()
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            payload.fields.insert(name, Value::String(text));
            continue;
        };

        // Attachment slots only take files; a stored path is never set from text.
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        if !slot.kind.accepts(&content_type) {
            return Err(AppError::Validation(format!(
                "Field '{}' does not accept {} uploads",
                name, content_type
            )));
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        if bytes.is_empty() {
            continue;
        }

        let path = uploads.save(Some(&file_name), &bytes).await?;
        payload.stored.push(path.clone());

        if slot.multiple {
            let list = payload
                .appended
                .entry(name)
                .or_insert_with(|| Value::Array(Vec::new()));
            if let Value::Array(list) = list {
                list.push(Value::String(path));
            }
        } else {
            payload.fields.insert(name, Value::String(path));
        }
    }

    Ok(())
}

/// Stored paths held by one attachment field of a serialized body.
pub fn attachment_paths(body: &Value, field: &str) -> Vec<String> {
    match body.get(field) {
        Some(Value::String(path)) if !path.is_empty() => vec![path.clone()],
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| v.as_str())
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}
