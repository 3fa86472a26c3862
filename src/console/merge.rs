//! Rebuild locale-doubled records from the English and Hindi views.
//!
//! The localized endpoints collapse `nameEn`/`nameHi` into `name`. Editing
//! needs both halves back, so the console fetches each locale and zips them.

use serde_json::{Map, Value};

use super::ConsoleError;

/// Merge one English record with its Hindi counterpart.
///
/// Keys listed in `localized` become `keyEn`/`keyHi`; a half missing from
/// one side becomes an empty string. Arrays of records on both sides are
/// merged element by element. Every other field is taken from English.
pub fn merge_records(en: &Value, hi: &Value, localized: &[&str]) -> Result<Value, ConsoleError> {
    let (Value::Object(en), Value::Object(hi)) = (en, hi) else {
        return Err(ConsoleError::BilingualMismatch(
            "records must be objects".to_string(),
        ));
    };

    let mut merged = Map::new();
    for (key, en_value) in en {
        if localized.contains(&key.as_str()) {
            continue;
        }
        let value = match (en_value, hi.get(key)) {
            (Value::Array(en_items), Some(Value::Array(hi_items))) if is_record_list(en_items) => {
                Value::Array(merge_lists(en_items, hi_items, localized)?)
            }
            _ => en_value.clone(),
        };
        merged.insert(key.clone(), value);
    }

    for key in localized {
        if !en.contains_key(*key) && !hi.contains_key(*key) {
            continue;
        }
        merged.insert(format!("{}En", key), text_or_empty(en.get(*key)));
        merged.insert(format!("{}Hi", key), text_or_empty(hi.get(*key)));
    }

    Ok(Value::Object(merged))
}

/// Merge two localized lists of the same collection.
///
/// Records are paired by `_id` when every record carries one, otherwise by
/// position. The lists must describe the same records.
pub fn merge_lists(en: &[Value], hi: &[Value], localized: &[&str]) -> Result<Vec<Value>, ConsoleError> {
    if en.len() != hi.len() {
        return Err(ConsoleError::BilingualMismatch(format!(
            "{} English records but {} Hindi records",
            en.len(),
            hi.len()
        )));
    }

    let keyed = en.iter().chain(hi).all(|record| record_id(record).is_some());
    if !keyed {
        return en
            .iter()
            .zip(hi)
            .map(|(en, hi)| merge_records(en, hi, localized))
            .collect();
    }

    en.iter()
        .map(|en_record| {
            let id = record_id(en_record).unwrap_or_default();
            let hi_record = hi
                .iter()
                .find(|hi_record| record_id(hi_record) == Some(id))
                .ok_or_else(|| {
                    ConsoleError::BilingualMismatch(format!("record {} has no Hindi version", id))
                })?;
            merge_records(en_record, hi_record, localized)
        })
        .collect()
}

fn record_id(record: &Value) -> Option<&str> {
    record.get("_id").and_then(Value::as_str)
}

fn is_record_list(items: &[Value]) -> bool {
    items.iter().all(Value::is_object)
}

fn text_or_empty(value: Option<&Value>) -> Value {
    match value {
        None | Some(Value::Null) => Value::String(String::new()),
        Some(value) => value.clone(),
    }
}
