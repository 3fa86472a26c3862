//! Configuration module for the content service.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Bearer token required for admin writes (unset = open dev mode)
    pub admin_token: Option<String>,
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Directory that receives uploaded images and PDFs
    pub upload_dir: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Maximum accepted request body size in bytes
    pub max_upload_bytes: usize,
    /// Contact form submissions allowed per client and window
    pub contact_rate_limit: u32,
    /// Length of the contact form rate-limit window
    pub contact_window: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let admin_token = env::var("BSRTC_ADMIN_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty());

        let db_path = env::var("BSRTC_DB_PATH")
            .unwrap_or_else(|_| "./data/content.sqlite".to_string())
            .into();

        let upload_dir = env::var("BSRTC_UPLOAD_DIR")
            .unwrap_or_else(|_| "./uploads".to_string())
            .into();

        let bind_addr = parse_or("BSRTC_BIND_ADDR", SocketAddr::from(([127, 0, 0, 1], 5000)));

        let log_level = env::var("BSRTC_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let max_upload_bytes = parse_or("BSRTC_MAX_UPLOAD_BYTES", 10 * 1024 * 1024);
        let contact_rate_limit = parse_or("BSRTC_CONTACT_RATE_LIMIT", 5);
        let contact_window = Duration::from_secs(parse_or("BSRTC_CONTACT_WINDOW_SECS", 60));

        Self {
            admin_token,
            db_path,
            upload_dir,
            bind_addr,
            log_level,
            max_upload_bytes,
            contact_rate_limit,
            contact_window,
        }
    }
}

/// Read a typed variable, keeping the default when unset or unparsable.
fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid {} value {:?}, using default", key, raw);
            default
        }),
        Err(_) => default,
    }
}
