//! Errors surfaced to the admin console.

use std::fmt;

/// Failure of a console operation, rendered as the user-facing error string.
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleError {
    /// Network failure or timeout
    Transport(String),
    /// Missing or rejected admin token
    Unauthorized(String),
    NotFound(String),
    /// Any other non-success response
    Server { status: u16, message: String },
    /// Response body did not have the expected shape
    Decode(String),
    /// Form row index out of range
    InvalidIndex { index: usize, len: usize },
    /// File staged for a field that takes no upload
    UnknownAttachment(String),
    /// English and Hindi lists cannot be paired
    BilingualMismatch(String),
}

impl ConsoleError {
    /// Map an HTTP status and the server's error message.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 | 403 => ConsoleError::Unauthorized(message),
            404 => ConsoleError::NotFound(message),
            _ => ConsoleError::Server { status, message },
        }
    }
}

impl fmt::Display for ConsoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsoleError::Transport(msg) => write!(f, "Could not reach the server: {}", msg),
            ConsoleError::Unauthorized(msg) => write!(f, "Not authorized: {}", msg),
            ConsoleError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ConsoleError::Server { status, message } => {
                write!(f, "Server error ({}): {}", status, message)
            }
            ConsoleError::Decode(msg) => write!(f, "Unexpected response: {}", msg),
            ConsoleError::InvalidIndex { index, len } => {
                write!(f, "No entry at position {} (form has {})", index, len)
            }
            ConsoleError::UnknownAttachment(field) => {
                write!(f, "Field '{}' does not take a file", field)
            }
            ConsoleError::BilingualMismatch(msg) => {
                write!(f, "English and Hindi content do not match: {}", msg)
            }
        }
    }
}

impl std::error::Error for ConsoleError {}

impl From<reqwest::Error> for ConsoleError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return ConsoleError::Transport("request timed out".to_string());
        }
        if err.is_decode() {
            return ConsoleError::Decode(err.to_string());
        }
        ConsoleError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for ConsoleError {
    fn from(err: serde_json::Error) -> Self {
        ConsoleError::Decode(err.to_string())
    }
}
