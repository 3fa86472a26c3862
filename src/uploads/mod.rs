//! Upload storage for images and PDFs.
//!
//! Files land in a flat directory under a fresh UUID-prefixed name and are
//! referenced from documents by their public relative path (`uploads/<name>`).

use std::path::{Path, PathBuf};

use crate::errors::AppError;

/// URL prefix under which stored files are served.
pub const PUBLIC_PREFIX: &str = "uploads";

const MAX_NAME_LEN: usize = 80;

/// Flat directory of uploaded files.
#[derive(Debug, Clone)]
pub struct UploadStore {
    root: PathBuf,
}

impl UploadStore {
    /// Open the store, creating the directory if needed.
    pub async fn open(root: &Path) -> Result<Self, AppError> {
        tokio::fs::create_dir_all(root).await?;
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write a file and return its public relative path.
    pub async fn save(&self, original_name: Option<&str>, bytes: &[u8]) -> Result<String, AppError> {
        let file_name = format!(
            "{}-{}",
            uuid::Uuid::new_v4().simple(),
            sanitize_file_name(original_name.unwrap_or_default())
        );
        tokio::fs::write(self.root.join(&file_name), bytes).await?;

        tracing::info!(file = %file_name, size = bytes.len(), "upload stored");
        Ok(format!("{}/{}", PUBLIC_PREFIX, file_name))
    }

    /// Remove a previously stored file. Unknown or foreign paths are ignored.
    pub async fn remove(&self, public_path: &str) {
        let Some(file_name) = stored_file_name(public_path) else {
            tracing::debug!(path = public_path, "not an upload path, skipping removal");
            return;
        };

        if let Err(e) = tokio::fs::remove_file(self.root.join(file_name)).await {
            tracing::warn!(path = public_path, "failed to remove upload: {}", e);
        }
    }

    /// Remove several files, used when a write fails after its uploads were stored.
    pub async fn remove_all(&self, public_paths: &[String]) {
        for path in public_paths {
            self.remove(path).await;
        }
    }
}

/// File name part of `uploads/<name>`, rejecting anything that could escape the store.
fn stored_file_name(public_path: &str) -> Option<&str> {
    let name = public_path
        .trim_start_matches('/')
        .strip_prefix(PUBLIC_PREFIX)?
        .strip_prefix('/')?;
    let valid = !name.is_empty()
        && !name.contains(['/', '\\'])
        && name != "."
        && name != "..";
    valid.then_some(name)
}

/// Keep a readable tail of the client's file name without path or shell characters.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');

    if cleaned.is_empty() {
        return "file".to_string();
    }

    let skip = cleaned.len().saturating_sub(MAX_NAME_LEN);
    cleaned[skip..].to_string()
}
