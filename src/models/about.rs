//! "About the corporation" content.

use serde::{Deserialize, Serialize};

use super::{require_either, Attachment, AttachmentKind, Entity};
use crate::errors::AppError;

/// Single document holding the about/vision/mission text.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct AboutUs {
    pub about_us_en: String,
    pub about_us_hi: String,
    pub vision_en: String,
    pub vision_hi: String,
    pub mission_en: String,
    pub mission_hi: String,
}

impl Entity for AboutUs {
    const COLLECTION: &'static str = "about-us";
    const LABEL: &'static str = "About us";
    const LOCALIZED: &'static [&'static str] = &["aboutUs", "vision", "mission"];
}

/// Officer profile card shown on the about page.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct AboutProfile {
    pub title_en: String,
    pub title_hi: String,
    pub name_en: String,
    pub name_hi: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

impl Entity for AboutProfile {
    const COLLECTION: &'static str = "about-profile";
    const LABEL: &'static str = "Profile";
    const LOCALIZED: &'static [&'static str] = &["title", "name"];
    const ATTACHMENTS: &'static [Attachment] =
        &[Attachment::single("photo", AttachmentKind::Image)];

    fn validate(&self) -> Result<(), AppError> {
        require_either(&self.name_en, &self.name_hi, "Profile name is required")
    }
}
