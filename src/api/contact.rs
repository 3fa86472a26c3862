//! Public contact form.

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, State},
    Json,
};

use super::{success, ApiResult};
use crate::errors::AppError;
use crate::models::{ContactMessage, Document, Entity};
use crate::AppState;

/// POST /api/contact-messages - Leave a message; limited per client address.
///
/// Every attempt counts against the window, including ones that fail validation.
pub async fn submit_contact_message(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(message): Json<ContactMessage>,
) -> ApiResult<Document<ContactMessage>> {
    if let Err(retry_after) = state.contact_limiter.check(addr.ip()) {
        tracing::warn!(client = %addr.ip(), "contact form rate limit reached");
        return Err(AppError::RateLimited(format!(
            "Too many submissions. Please try again in {} seconds.",
            retry_after.as_secs().max(1)
        )));
    }

    message.validate()?;
    let document = state.repo.insert(&message).await?;

    tracing::info!(id = %document.id, "contact message received");
    success(document)
}
