//! Content that carries uploaded files: tenders, news, gallery and home-page cards.

use serde::{Deserialize, Serialize};

use super::{require, require_either, Attachment, AttachmentKind, Entity};
use crate::errors::AppError;

/// Published tender notice with its PDF document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Tender {
    pub name: String,
    pub reference_no: String,
    pub closing_date: String,
    pub bid_opening_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdf: Option<String>,
}

impl Entity for Tender {
    const COLLECTION: &'static str = "tenders";
    const LABEL: &'static str = "Tender";
    const ATTACHMENTS: &'static [Attachment] = &[Attachment::single("pdf", AttachmentKind::Pdf)];

    fn validate(&self) -> Result<(), AppError> {
        require(&self.name, "Tender name is required")?;
        for (label, date) in [
            ("Closing date", &self.closing_date),
            ("Bid opening date", &self.bid_opening_date),
        ] {
            if !date.is_empty() && !is_iso_date(date) {
                return Err(AppError::Validation(format!(
                    "{} must be formatted as YYYY-MM-DD",
                    label
                )));
            }
        }
        Ok(())
    }
}

/// Accepts `YYYY-MM-DD`, optionally followed by a time part.
fn is_iso_date(value: &str) -> bool {
    let day = value.split('T').next().unwrap_or_default();
    chrono::NaiveDate::parse_from_str(day, "%Y-%m-%d").is_ok()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct NewsArticle {
    pub title_en: String,
    pub title_hi: String,
    pub headline_en: String,
    pub headline_hi: String,
    pub subline_en: String,
    pub subline_hi: String,
    pub content_en: String,
    pub content_hi: String,
    pub published_on: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

impl Entity for NewsArticle {
    const COLLECTION: &'static str = "news";
    const LABEL: &'static str = "News article";
    const LOCALIZED: &'static [&'static str] = &["title", "headline", "subline", "content"];
    const ATTACHMENTS: &'static [Attachment] = &[
        Attachment::single("thumbnail", AttachmentKind::Image),
        Attachment::single("photo", AttachmentKind::Image),
    ];

    fn validate(&self) -> Result<(), AppError> {
        require_either(&self.title_en, &self.title_hi, "News title is required")
    }
}

/// Scrolling announcement linking elsewhere.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct FlashNews {
    pub title_en: String,
    pub title_hi: String,
    pub url: String,
}

impl Entity for FlashNews {
    const COLLECTION: &'static str = "flash-news";
    const LABEL: &'static str = "Flash news";
    const LOCALIZED: &'static [&'static str] = &["title"];

    fn validate(&self) -> Result<(), AppError> {
        require_either(&self.title_en, &self.title_hi, "Flash news title is required")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct GalleryPhoto {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

impl Entity for GalleryPhoto {
    const COLLECTION: &'static str = "gallery";
    const LABEL: &'static str = "Gallery photo";
    const ATTACHMENTS: &'static [Attachment] =
        &[Attachment::single("photo", AttachmentKind::Image)];
}

/// Event album; photos accumulate across uploads.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct GalleryEvent {
    pub category: String,
    pub photos: Vec<String>,
}

impl Entity for GalleryEvent {
    const COLLECTION: &'static str = "gallery-events";
    const LABEL: &'static str = "Gallery event";
    const ATTACHMENTS: &'static [Attachment] =
        &[Attachment::many("photos", AttachmentKind::Image)];

    fn validate(&self) -> Result<(), AppError> {
        require(&self.category, "Event category is required")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct PopularRoute {
    pub from: String,
    pub to: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Entity for PopularRoute {
    const COLLECTION: &'static str = "popular-routes";
    const LABEL: &'static str = "Popular route";
    const ATTACHMENTS: &'static [Attachment] =
        &[Attachment::single("image", AttachmentKind::Image)];

    fn validate(&self) -> Result<(), AppError> {
        require(&self.from, "Route origin is required")?;
        require(&self.to, "Route destination is required")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct TouristDestination {
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Entity for TouristDestination {
    const COLLECTION: &'static str = "tourist-destinations";
    const LABEL: &'static str = "Tourist destination";
    const ATTACHMENTS: &'static [Attachment] =
        &[Attachment::single("image", AttachmentKind::Image)];

    fn validate(&self) -> Result<(), AppError> {
        require(&self.name, "Destination name is required")
    }
}
