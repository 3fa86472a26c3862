//! Data models for the bilingual content service.
//!
//! Every content type is an independent document collection. Displayed strings
//! come in pairs (`titleEn` / `titleHi`) rather than a locale-keyed map, and the
//! JSON shape matches what the public site and the admin console exchange.

mod about;
mod contact;
mod locale;
mod media;
mod pages;

pub use about::*;
pub use contact::*;
pub use locale::*;
pub use media::*;
pub use pages::*;

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::errors::AppError;

/// Kind of file an attachment slot accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    Image,
    Pdf,
}

impl AttachmentKind {
    /// Whether an upload with this content type may fill the slot.
    pub fn accepts(&self, content_type: &str) -> bool {
        let content_type = content_type.trim().to_ascii_lowercase();
        match self {
            AttachmentKind::Image => content_type.starts_with("image/"),
            AttachmentKind::Pdf => content_type == "application/pdf",
        }
    }
}

/// A named file field on an entity.
#[derive(Debug, Clone, Copy)]
pub struct Attachment {
    /// Multipart part name and JSON field holding the stored path(s)
    pub field: &'static str,
    pub kind: AttachmentKind,
    /// Slot holds a list of paths instead of a single one
    pub multiple: bool,
}

impl Attachment {
    pub const fn single(field: &'static str, kind: AttachmentKind) -> Self {
        Self {
            field,
            kind,
            multiple: false,
        }
    }

    pub const fn many(field: &'static str, kind: AttachmentKind) -> Self {
        Self {
            field,
            kind,
            multiple: true,
        }
    }
}

/// A content type stored as its own collection.
pub trait Entity:
    Serialize + DeserializeOwned + Default + Clone + std::fmt::Debug + Send + Sync + 'static
{
    /// Collection name, also the REST path segment.
    const COLLECTION: &'static str;
    /// Name used in error messages.
    const LABEL: &'static str;
    /// Base names of the locale-doubled fields, at any nesting depth.
    const LOCALIZED: &'static [&'static str] = &[];
    /// File slots accepted on multipart writes.
    const ATTACHMENTS: &'static [Attachment] = &[];
    /// Whether anonymous clients may read the collection.
    const PUBLIC_READ: bool = true;

    /// Check field-level constraints before the document is written.
    fn validate(&self) -> Result<(), AppError> {
        Ok(())
    }

    fn attachment(field: &str) -> Option<&'static Attachment> {
        Self::ATTACHMENTS.iter().find(|a| a.field == field)
    }
}

/// A persisted document: server-assigned identifier plus the entity body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document<E> {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(flatten)]
    pub body: E,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

/// Keys owned by the store; never taken from a client payload.
pub const RESERVED_KEYS: [&str; 3] = ["_id", "createdAt", "updatedAt"];

pub(crate) fn require(value: &str, message: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(message.to_string()));
    }
    Ok(())
}

/// At least one half of a locale-doubled pair must be filled.
pub(crate) fn require_either(en: &str, hi: &str, message: &str) -> Result<(), AppError> {
    if en.trim().is_empty() && hi.trim().is_empty() {
        return Err(AppError::Validation(message.to_string()));
    }
    Ok(())
}
