//! Helpline, directory and contact-form models.

use serde::{Deserialize, Serialize};

use super::{require, require_either, Entity};
use crate::errors::AppError;

/// Longest contact-form message accepted.
pub const MAX_MESSAGE_LEN: usize = 2000;

/// Regional division helpline.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Division {
    pub name_en: String,
    pub name_hi: String,
    pub person_in_charge_en: String,
    pub person_in_charge_hi: String,
    pub phone_number: String,
    pub email: String,
}

impl Entity for Division {
    const COLLECTION: &'static str = "divisions";
    const LABEL: &'static str = "Division";
    const LOCALIZED: &'static [&'static str] = &["name", "personInCharge"];

    fn validate(&self) -> Result<(), AppError> {
        require_either(&self.name_en, &self.name_hi, "Division name is required")
    }
}

/// Bus depot helpline. Division names are repeated here, not referenced.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Depot {
    pub name_en: String,
    pub name_hi: String,
    pub person_in_charge_en: String,
    pub person_in_charge_hi: String,
    pub phone_number: String,
    pub email: String,
}

impl Entity for Depot {
    const COLLECTION: &'static str = "depots";
    const LABEL: &'static str = "Depot";
    const LOCALIZED: &'static [&'static str] = &["name", "personInCharge"];

    fn validate(&self) -> Result<(), AppError> {
        require_either(&self.name_en, &self.name_hi, "Depot name is required")
    }
}

/// One officer in the phone directory.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Officer {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name_en: String,
    pub name_hi: String,
    pub designation_en: String,
    pub designation_hi: String,
    pub office_en: String,
    pub office_hi: String,
    pub phone_number: String,
    pub email: String,
}

/// Phone directory section grouping officers by division.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct DirectoryDivision {
    pub name_en: String,
    pub name_hi: String,
    pub officers: Vec<Officer>,
}

impl Entity for DirectoryDivision {
    const COLLECTION: &'static str = "phone-directory";
    const LABEL: &'static str = "Directory division";
    const LOCALIZED: &'static [&'static str] = &["name", "designation", "office"];

    fn validate(&self) -> Result<(), AppError> {
        require_either(&self.name_en, &self.name_hi, "Division name is required")?;
        for officer in &self.officers {
            require_either(&officer.name_en, &officer.name_hi, "Officer name is required")?;
        }
        Ok(())
    }
}

/// Head-office contact numbers; the first document is the one displayed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactInfo {
    pub email: String,
    pub phone_number1: String,
    pub phone_number2: String,
}

impl Entity for ContactInfo {
    const COLLECTION: &'static str = "contact-info";
    const LABEL: &'static str = "Contact info";
}

/// A message left through the public contact form.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactMessage {
    pub name: String,
    pub phone: String,
    pub message: String,
}

impl Entity for ContactMessage {
    const COLLECTION: &'static str = "contact-messages";
    const LABEL: &'static str = "Contact message";
    const PUBLIC_READ: bool = false;

    fn validate(&self) -> Result<(), AppError> {
        require(&self.name, "Name is required")?;
        require(&self.message, "Message is required")?;
        if self.message.chars().count() > MAX_MESSAGE_LEN {
            return Err(AppError::Validation(format!(
                "Message must be at most {} characters",
                MAX_MESSAGE_LEN
            )));
        }
        Ok(())
    }
}
