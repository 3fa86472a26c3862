//! Admin console logic.
//!
//! The editing screens are thin: they load a collection, let the user change
//! rows in memory, then push every row back. This module holds that logic
//! independent of any UI so it can run against the live API or a fake
//! transport in tests.

mod cache;
mod client;
mod error;
mod form;
mod merge;
mod transport;

pub use cache::*;
pub use client::*;
pub use error::*;
pub use form::*;
pub use merge::*;
pub use transport::*;

use std::time::Duration;

use crate::models::Locale;

/// Connection settings for the console.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Server root, e.g. `http://127.0.0.1:5000`
    pub base_url: String,
    /// Admin bearer token
    pub token: Option<String>,
    /// Locale used for the read-only views
    pub locale: Locale,
    pub timeout: Duration,
}

impl ConsoleConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            locale: Locale::En,
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
