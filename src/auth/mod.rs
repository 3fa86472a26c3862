//! Bearer-token authentication for admin operations.
//!
//! Implements constant-time comparison to mitigate timing attacks.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use subtle::ConstantTimeEq;

use crate::errors::AppError;
use crate::AppState;

/// Extractor that admits only requests carrying the configured admin token.
///
/// Add it to a handler's arguments to gate that handler.
#[derive(Debug, Clone, Copy)]
pub struct AdminAuth;

impl FromRequestParts<AppState> for AdminAuth {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        require_admin(state.config.admin_token.as_deref(), &parts.headers)?;
        Ok(AdminAuth)
    }
}

/// Check the `Authorization: Bearer` header against the expected token.
///
/// With no token configured every request passes (dev mode).
pub fn require_admin(expected: Option<&str>, headers: &HeaderMap) -> Result<(), AppError> {
    let Some(expected) = expected else {
        return Ok(());
    };

    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(str::trim);

    match bearer {
        Some(token) if constant_time_compare(token, expected) => Ok(()),
        Some(_) => Err(AppError::Unauthorized("Invalid bearer token".to_string())),
        None => Err(AppError::Unauthorized(
            "Missing bearer token".to_string(),
        )),
    }
}

/// Perform constant-time string comparison.
fn constant_time_compare(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}
