//! Tolerant readers for form-originated JSON values.
//!
//! Stored records were written by loosely-typed forms, so numbers may arrive
//! as strings and strings as numbers.

use super::commission::parse_float_prefix;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Number, numeric string, or anything else (read as 0).
pub(crate) fn amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(number) => number.as_f64().unwrap_or(0.0),
        Value::String(text) => parse_float_prefix(&text).unwrap_or(0.0),
        _ => 0.0,
    })
}

/// String kept verbatim, number rendered as text, null/absent as "".
pub(crate) fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(text) => text,
        Value::Number(number) => number.to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// ISO date, or `None` for empty strings and nulls.
pub(crate) fn optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}
