//! REST API module.
//!
//! Every collection gets the same list/get/create/update/delete family; the few
//! screens that behave differently have their own handlers.

mod about;
mod bulk;
mod contact;
mod documents;
mod gallery;
mod payload;

pub use about::*;
pub use bulk::*;
pub use contact::*;
pub use documents::*;
pub use gallery::*;
pub use payload::*;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::errors::AppError;
use crate::models::Entity;
use crate::AppState;

/// Success response envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Response type that can be either success or error.
pub type ApiResult<T> = Result<ApiResponse<T>, AppError>;

/// Create a successful API response.
pub fn success<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(ApiResponse::new(data))
}

/// Standard CRUD routes for one collection.
///
/// `/{collection}/{key}` serves both the localized list (`key` is a locale)
/// and single documents (`key` is an ID).
pub fn collection_routes<E: Entity>() -> Router<AppState> {
    Router::new()
        .route(
            &format!("/{}", E::COLLECTION),
            get(list_documents::<E>).post(create_document::<E>),
        )
        .route(
            &format!("/{}/{{key}}", E::COLLECTION),
            get(get_document::<E>)
                .put(update_document::<E>)
                .delete(delete_document::<E>),
        )
}
