// ABOUTME: Lenient field decoders for documents written by earlier clients
// ABOUTME: Unreadable optional fields fall back to defaults instead of failing the record
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The bodyplan Authors

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::exercise::TimeUnit;
use crate::constants::exercise::DEFAULT_SETS;

/// Interpret a loosely typed JSON value as a number
pub(crate) fn number_from_value(value: &Value) -> Option<f64> {
    let number: Option<f64> = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    };
    number.filter(|number| number.is_finite())
}

/// Set count that may be stored as a number or a numeric string
///
/// Null, non-numeric and values below one read as the default set count.
pub(crate) fn count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(number_from_value(&value)
        .filter(|number| *number >= 1.0 && *number <= f64::from(u32::MAX))
        .map_or(DEFAULT_SETS, |number| number.trunc() as u32))
}

/// Free text that may be stored as a number; anything else reads as empty
pub(crate) fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(text) => Ok(text),
        Value::Number(number) => Ok(number.to_string()),
        _ => Ok(String::new()),
    }
}

/// Time unit; null, blank and unknown names read as seconds
pub(crate) fn time_unit<'de, D>(deserializer: D) -> Result<TimeUnit, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let unit = value.as_str().map(|name| name.trim().to_lowercase());
    Ok(match unit.as_deref() {
        Some("minutes") => TimeUnit::Minutes,
        _ => TimeUnit::Seconds,
    })
}

/// Optional text; null and blank strings read as absent
pub(crate) fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(text) if text.trim().is_empty() => Ok(None),
        Value::String(text) => Ok(Some(text)),
        _ => Ok(None),
    }
}

/// Optional number; null, blank and unparseable strings read as absent
pub(crate) fn optional_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(number_from_value(&value))
}
