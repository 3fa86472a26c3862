//! Locale handling for the `...En` / `...Hi` field convention.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Display language of the public site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Hi,
}

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::En, Locale::Hi];

    /// Two-letter code used in URLs and cache keys.
    pub fn code(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Hi => "hi",
        }
    }

    /// Field-name suffix carrying this locale's value.
    pub fn suffix(&self) -> &'static str {
        match self {
            Locale::En => "En",
            Locale::Hi => "Hi",
        }
    }

    /// Parse a locale from a path segment or query value.
    ///
    /// Accepts the two-letter codes as well as the long names some older
    /// screens still request (`/about-profile/english`).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" | "english" => Some(Locale::En),
            "hi" | "hindi" => Some(Locale::Hi),
            _ => None,
        }
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Split `nameEn` into (`name`, En). Returns `None` for plain fields.
pub fn split_locale_key(key: &str) -> Option<(&str, Locale)> {
    Locale::ALL.into_iter().find_map(|locale| {
        let base = key.strip_suffix(locale.suffix())?;
        let last = base.chars().last()?;
        (last.is_ascii_lowercase() || last.is_ascii_digit()).then_some((base, locale))
    })
}

/// Collapse every locale-doubled pair into a single field for `locale`.
///
/// A pair whose requested half is absent or null renders as an empty string.
/// Plain fields pass through, nested objects and arrays are localized too.
pub fn localize(value: &Value, locale: Locale) -> Value {
    match value {
        Value::Object(map) => {
            let mut out = Map::new();
            for (key, field) in map {
                match split_locale_key(key) {
                    Some((base, field_locale)) if field_locale == locale => {
                        let localized = if field.is_null() {
                            Value::String(String::new())
                        } else {
                            localize(field, locale)
                        };
                        out.insert(base.to_string(), localized);
                    }
                    Some((base, _)) => {
                        out.entry(base.to_string())
                            .or_insert_with(|| Value::String(String::new()));
                    }
                    None => {
                        out.insert(key.clone(), localize(field, locale));
                    }
                }
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(|v| localize(v, locale)).collect()),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_accepts_codes_and_names() {
        assert_eq!(Locale::parse("en"), Some(Locale::En));
        assert_eq!(Locale::parse("HI"), Some(Locale::Hi));
        assert_eq!(Locale::parse("english"), Some(Locale::En));
        assert_eq!(Locale::parse("hindi"), Some(Locale::Hi));
        assert_eq!(Locale::parse("fr"), None);
    }

    #[test]
    fn test_split_locale_key() {
        assert_eq!(split_locale_key("nameEn"), Some(("name", Locale::En)));
        assert_eq!(
            split_locale_key("personInChargeHi"),
            Some(("personInCharge", Locale::Hi))
        );
        assert_eq!(split_locale_key("phoneNumber"), None);
        assert_eq!(split_locale_key("En"), None);
        assert_eq!(split_locale_key("_id"), None);
    }

    #[test]
    fn test_localize_collapses_pairs() {
        let doc = json!({
            "_id": "1",
            "questionEn": "When?",
            "questionHi": "कब?",
            "answerEn": "Now",
            "answerHi": "अभी"
        });

        let hi = localize(&doc, Locale::Hi);
        assert_eq!(
            hi,
            json!({ "_id": "1", "question": "कब?", "answer": "अभी" })
        );

        let en = localize(&doc, Locale::En);
        assert_eq!(en["question"], "When?");
        assert!(en.get("questionEn").is_none());
    }

    #[test]
    fn test_localize_missing_locale_renders_empty() {
        let doc = json!({ "nameEn": "Patna", "phoneNumber": "0612" });
        let hi = localize(&doc, Locale::Hi);
        assert_eq!(hi, json!({ "name": "", "phoneNumber": "0612" }));
    }

    #[test]
    fn test_localize_nested_officers() {
        let doc = json!({
            "nameEn": "Patna",
            "nameHi": "पटना",
            "officers": [
                { "nameEn": "R. Kumar", "nameHi": "आर. कुमार", "email": "rk@example.org" }
            ]
        });
        let hi = localize(&doc, Locale::Hi);
        assert_eq!(hi["name"], "पटना");
        assert_eq!(hi["officers"][0]["name"], "आर. कुमार");
        assert_eq!(hi["officers"][0]["email"], "rk@example.org");
    }
}
