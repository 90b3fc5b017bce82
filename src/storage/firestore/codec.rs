// ABOUTME: Conversion between plain JSON and Firestore typed values
// ABOUTME: Encodes documents into the REST `fields` representation and decodes them back
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The bodyplan Authors

use crate::errors::{AppError, AppResult};
use crate::storage::Document;
use serde_json::{json, Map, Number, Value};

/// Encode a document as a Firestore `fields` object
#[must_use]
pub fn encode_fields(document: &Document) -> Map<String, Value> {
    document
        .iter()
        .map(|(name, value)| (name.clone(), encode_value(value)))
        .collect()
}

/// Decode a Firestore `fields` object into a document
///
/// # Errors
///
/// Returns a serialization error if a value has no recognised type tag
pub fn decode_fields(fields: &Map<String, Value>) -> AppResult<Document> {
    fields
        .iter()
        .map(|(name, value)| decode_value(value).map(|decoded| (name.clone(), decoded)))
        .collect()
}

/// Encode one JSON value
#[must_use]
pub fn encode_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(flag) => json!({ "booleanValue": flag }),
        Value::Number(number) => number.as_i64().map_or_else(
            || json!({ "doubleValue": number.as_f64().unwrap_or(0.0) }),
            // integers travel as strings to keep 64-bit precision
            |integer| json!({ "integerValue": integer.to_string() }),
        ),
        Value::String(text) => json!({ "stringValue": text }),
        Value::Array(items) => {
            if items.is_empty() {
                json!({ "arrayValue": {} })
            } else {
                let values: Vec<Value> = items.iter().map(encode_value).collect();
                json!({ "arrayValue": { "values": values } })
            }
        }
        Value::Object(map) => json!({ "mapValue": { "fields": encode_fields(map) } }),
    }
}

/// Decode one Firestore typed value
///
/// # Errors
///
/// Returns a serialization error if the value has no recognised type tag
pub fn decode_value(value: &Value) -> AppResult<Value> {
    let Some(tagged) = value.as_object() else {
        return Err(AppError::serialization(format!(
            "Firestore value is not an object: {value}"
        )));
    };

    if tagged.contains_key("nullValue") {
        return Ok(Value::Null);
    }
    if let Some(flag) = tagged.get("booleanValue") {
        return Ok(Value::Bool(flag.as_bool().unwrap_or(false)));
    }
    if let Some(integer) = tagged.get("integerValue") {
        return decode_integer(integer);
    }
    if let Some(double) = tagged.get("doubleValue") {
        return Ok(decode_double(double));
    }
    if let Some(array) = tagged.get("arrayValue") {
        let items = array
            .get("values")
            .and_then(Value::as_array)
            .map(|values| values.iter().map(decode_value).collect::<AppResult<Vec<_>>>())
            .transpose()?
            .unwrap_or_default();
        return Ok(Value::Array(items));
    }
    if let Some(map) = tagged.get("mapValue") {
        let fields = match map.get("fields").and_then(Value::as_object) {
            Some(fields) => decode_fields(fields)?,
            None => Map::new(),
        };
        return Ok(Value::Object(fields));
    }
    if let Some(geo_point) = tagged.get("geoPointValue") {
        return Ok(geo_point.clone());
    }
    for textual in [
        "stringValue",
        "timestampValue",
        "referenceValue",
        "bytesValue",
    ] {
        if let Some(text) = tagged.get(textual) {
            return Ok(text.clone());
        }
    }

    Err(AppError::serialization(format!(
        "Unrecognised Firestore value: {value}"
    )))
}

fn decode_integer(integer: &Value) -> AppResult<Value> {
    let parsed = match integer {
        Value::String(text) => text.parse::<i64>().ok(),
        Value::Number(number) => number.as_i64(),
        _ => None,
    };
    parsed
        .map(|integer| Value::Number(integer.into()))
        .ok_or_else(|| AppError::serialization(format!("Invalid integerValue: {integer}")))
}

fn decode_double(double: &Value) -> Value {
    // NaN and the infinities arrive as strings and have no JSON form
    double
        .as_f64()
        .and_then(Number::from_f64)
        .map_or(Value::Null, Value::Number)
}
