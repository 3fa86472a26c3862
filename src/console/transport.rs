//! Requests from the console to the content API.

use std::future::Future;
use std::path::Path;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use serde_json::Value;

use super::ConsoleError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

/// A file picked in the console, waiting to be sent with its entry.
#[derive(Debug, Clone, PartialEq)]
pub struct StagedFile {
    /// Attachment slot the file fills
    pub field: String,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl StagedFile {
    pub fn new(
        field: impl Into<String>,
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            field: field.into(),
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Read a file from disk, guessing its content type from the extension.
    pub async fn from_path(field: &str, path: &Path) -> Result<Self, ConsoleError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ConsoleError::Transport(format!("{}: {}", path.display(), e)))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let content_type = guess_content_type(&file_name);

        Ok(Self::new(field, file_name, content_type, bytes))
    }
}

fn guess_content_type(file_name: &str) -> &'static str {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

/// Form-data body: text fields plus staged files.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultipartBody {
    pub fields: Vec<(String, String)>,
    pub files: Vec<StagedFile>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Empty,
    Json(Value),
    Multipart(MultipartBody),
}

/// One call against `/api{path}`.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Body,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            body: Body::Empty,
        }
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self {
            method: Method::Delete,
            path: path.into(),
            body: Body::Empty,
        }
    }

    pub fn with_body(method: Method, path: impl Into<String>, body: Body) -> Self {
        Self {
            method,
            path: path.into(),
            body,
        }
    }
}

/// Sends API requests and unwraps the response envelope.
///
/// Resolves to the envelope's `data` on success.
pub trait Transport: Send + Sync {
    fn send(&self, request: ApiRequest) -> impl Future<Output = Result<Value, ConsoleError>> + Send;
}

/// Transport over HTTP.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpTransport {
    pub fn new(
        base_url: &str,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ConsoleError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }
}

impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<Value, ConsoleError> {
        let url = self.url(&request.path);
        let mut builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Put => self.client.put(&url),
            Method::Delete => self.client.delete(&url),
        };
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        builder = match request.body {
            Body::Empty => builder,
            Body::Json(value) => builder.json(&value),
            Body::Multipart(body) => builder.multipart(build_form(body)?),
        };

        tracing::debug!(method = ?request.method, %url, "api request");
        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        unwrap_envelope(status.as_u16(), &text)
    }
}

fn build_form(body: MultipartBody) -> Result<Form, ConsoleError> {
    let mut form = Form::new();
    for (name, value) in body.fields {
        form = form.text(name, value);
    }
    for file in body.files {
        let part = Part::bytes(file.bytes)
            .file_name(file.file_name)
            .mime_str(&file.content_type)?;
        form = form.part(file.field, part);
    }
    Ok(form)
}

/// Pull `data` out of `{success, data}` or the message out of `{success, error}`.
pub(crate) fn unwrap_envelope(status: u16, text: &str) -> Result<Value, ConsoleError> {
    let envelope: Value = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(_) if !(200..300).contains(&status) => {
            return Err(ConsoleError::from_status(status, text.trim()));
        }
        Err(e) => return Err(e.into()),
    };

    if envelope["success"].as_bool() == Some(true) {
        return Ok(envelope.get("data").cloned().unwrap_or(Value::Null));
    }

    let message = envelope["error"]["message"]
        .as_str()
        .unwrap_or("Request failed")
        .to_string();
    let status = if (200..300).contains(&status) { 500 } else { status };
    Err(ConsoleError::from_status(status, message))
}
