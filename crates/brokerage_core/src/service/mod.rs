//! Use-case services over local storage.
//!
//! # Responsibility
//! - Orchestrate `LocalStore` reads/writes into back-office operations.
//! - Keep callers decoupled from storage keys and JSON shapes.
//!
//! # Invariants
//! - Validation and missing-reference failures return before any write.
//! - Every "today"/"now" comes from the `AppContext` clock.

pub mod admin_service;
pub mod board_service;
pub mod policy_service;
pub mod prospect_service;
pub mod registration_service;

use serde::Serialize;
use serde_json::Value;

/// Case-insensitive free-text match over every top-level field value.
///
/// Nested objects and `null` never match. A blank `term` matches everything.
pub(crate) fn record_matches<T: Serialize>(record: &T, term: &str) -> bool {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    let Ok(Value::Object(fields)) = serde_json::to_value(record) else {
        return false;
    };
    fields
        .values()
        .filter_map(field_text)
        .any(|text| text.to_lowercase().contains(&needle))
}

fn field_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Number(number) => Some(match number.as_f64() {
            Some(float) if float.fract() == 0.0 && float.abs() < 1e15 => {
                format!("{}", float as i64)
            }
            _ => number.to_string(),
        }),
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(field_text)
                .collect::<Vec<_>>()
                .join(","),
        ),
        Value::Null | Value::Object(_) => None,
    }
}
