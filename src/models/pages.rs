//! Text pages: FAQ, policies, terms and privacy.

use serde::{Deserialize, Serialize};

use super::{require_either, Entity};
use crate::errors::AppError;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Faq {
    pub question_en: String,
    pub question_hi: String,
    pub answer_en: String,
    pub answer_hi: String,
}

impl Entity for Faq {
    const COLLECTION: &'static str = "faq";
    const LABEL: &'static str = "FAQ";
    const LOCALIZED: &'static [&'static str] = &["question", "answer"];

    fn validate(&self) -> Result<(), AppError> {
        require_either(&self.question_en, &self.question_hi, "Question is required")
    }
}

/// Passenger policy listed on the policies page.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Policy {
    pub name_en: String,
    pub name_hi: String,
    pub content_en: String,
    pub content_hi: String,
}

impl Entity for Policy {
    const COLLECTION: &'static str = "policies";
    const LABEL: &'static str = "Policy";
    const LOCALIZED: &'static [&'static str] = &["name", "content"];

    fn validate(&self) -> Result<(), AppError> {
        require_either(&self.name_en, &self.name_hi, "Policy name is required")
    }
}

/// Declares a titled, two-language text section stored in its own collection.
macro_rules! titled_section {
    ($(#[$meta:meta])* $name:ident, $collection:literal, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
        #[serde(rename_all = "camelCase", default)]
        pub struct $name {
            pub title_en: String,
            pub title_hi: String,
            pub content_en: String,
            pub content_hi: String,
        }

        impl Entity for $name {
            const COLLECTION: &'static str = $collection;
            const LABEL: &'static str = $label;
            const LOCALIZED: &'static [&'static str] = &["title", "content"];

            fn validate(&self) -> Result<(), AppError> {
                require_either(
                    &self.title_en,
                    &self.title_hi,
                    concat!($label, " title is required"),
                )
            }
        }
    };
}

titled_section!(
    /// Ticket booking rules.
    BookingPolicy,
    "booking-policy",
    "Booking policy"
);
titled_section!(
    /// Refund and cancellation rules.
    CancellationPolicy,
    "cancellation-policy",
    "Cancellation policy"
);
titled_section!(TermsSection, "terms", "Terms section");
titled_section!(PrivacySection, "privacy", "Privacy section");
