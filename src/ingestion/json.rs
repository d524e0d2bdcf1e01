//! JSON ingestion implementation.
//!
//! Supported inputs:
//! - A JSON array of objects: `[{"a":1}, {"a":2}]`
//! - Newline-delimited JSON (NDJSON): `{"a":1}\n{"a":2}\n`
//!
//! Nested fields are supported using dot paths in schema field names (e.g. `user.name`).

use std::fs;
use std::path::Path;

use crate::error::{IngestionError, IngestionResult};
use crate::types::{DataSet, DataType, Schema, Value};

use super::infer::dataset_from_untyped;

/// Ingest JSON into an in-memory `DataSet`.
pub fn ingest_json_from_path(path: impl AsRef<Path>, schema: &Schema) -> IngestionResult<DataSet> {
    let text = fs::read_to_string(path)?;
    ingest_json_from_str(&text, schema)
}

/// Ingest JSON from an in-memory string into a [`DataSet`].
pub fn ingest_json_from_str(input: &str, schema: &Schema) -> IngestionResult<DataSet> {
    let values = parse_records(input)?;
    ingest_json_values(&values, schema)
}

/// Load JSON records without a schema.
///
/// Columns are the union of top-level keys, in the order records introduce them (within a
/// record, in document order). Nested objects and arrays are kept as their JSON text.
pub fn load_json_from_path(path: impl AsRef<Path>) -> IngestionResult<DataSet> {
    let text = fs::read_to_string(path)?;
    load_json_from_str(&text)
}

/// Schema-less variant of [`ingest_json_from_str`].
pub fn load_json_from_str(input: &str) -> IngestionResult<DataSet> {
    let values = parse_records(input)?;

    let mut headers: Vec<String> = Vec::new();
    for (idx0, v) in values.iter().enumerate() {
        let obj = as_record(idx0 + 1, v)?;
        for key in obj.keys() {
            if !headers.iter().any(|h| h == key) {
                headers.push(key.clone());
            }
        }
    }

    let rows = values
        .iter()
        .filter_map(|v| v.as_object())
        .map(|obj| {
            headers
                .iter()
                .map(|h| obj.get(h).map(untyped_json_value).unwrap_or(Value::Null))
                .collect()
        })
        .collect();

    Ok(dataset_from_untyped(headers, rows))
}

fn parse_records(input: &str) -> IngestionResult<Vec<serde_json::Value>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(IngestionError::SchemaMismatch {
            message: "json input is empty".to_string(),
        });
    }

    // First try parsing as a single JSON value (array or object).
    if let Ok(v) = serde_json::from_str::<serde_json::Value>(trimmed) {
        match v {
            serde_json::Value::Array(items) => Ok(items),
            serde_json::Value::Object(_) => Ok(vec![v]),
            _ => Err(IngestionError::SchemaMismatch {
                message: "json must be an object, an array of objects, or NDJSON".to_string(),
            }),
        }
    } else {
        // Fall back to NDJSON.
        let mut values = Vec::new();
        for (i, line) in trimmed.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let v = serde_json::from_str::<serde_json::Value>(line).map_err(|e| {
                IngestionError::SchemaMismatch {
                    message: format!("invalid ndjson at line {}: {}", i + 1, e),
                }
            })?;
            values.push(v);
        }
        Ok(values)
    }
}

fn as_record(
    row_num: usize,
    v: &serde_json::Value,
) -> IngestionResult<&serde_json::Map<String, serde_json::Value>> {
    v.as_object().ok_or_else(|| IngestionError::SchemaMismatch {
        message: format!("row {row_num} is not a json object"),
    })
}

fn ingest_json_values(values: &[serde_json::Value], schema: &Schema) -> IngestionResult<DataSet> {
    let mut rows: Vec<Vec<Value>> = Vec::with_capacity(values.len());

    for (idx0, v) in values.iter().enumerate() {
        let row_num = idx0 + 1;
        let obj = as_record(row_num, v)?;

        let mut row: Vec<Value> = Vec::with_capacity(schema.fields.len());
        for field in &schema.fields {
            let jv = get_by_dot_path(obj, &field.name).ok_or_else(|| IngestionError::SchemaMismatch {
                message: format!("row {row_num} missing required field '{}'", field.name),
            })?;
            row.push(convert_json_value(row_num, &field.name, field.data_type, jv)?);
        }
        rows.push(row);
    }

    Ok(DataSet::new(schema.clone(), rows))
}

fn get_by_dot_path<'a>(
    root: &'a serde_json::Map<String, serde_json::Value>,
    path: &str,
) -> Option<&'a serde_json::Value> {
    // An exact key wins over a nested path (flat exports may contain dotted keys).
    if let Some(v) = root.get(path) {
        return Some(v);
    }

    let mut segments = path.split('.');
    let mut current: &serde_json::Value = root.get(segments.next()?)?;
    for segment in segments {
        match current {
            serde_json::Value::Object(map) => current = map.get(segment)?,
            _ => return None,
        }
    }
    Some(current)
}

fn untyped_json_value(v: &serde_json::Value) -> Value {
    match v {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Int64(i),
            None => n.as_f64().map(Value::Float64).unwrap_or(Value::Null),
        },
        serde_json::Value::String(s) if s.trim().is_empty() => Value::Null,
        serde_json::Value::String(s) => Value::Utf8(s.clone()),
        other => Value::Utf8(other.to_string()),
    }
}

fn convert_json_value(
    row: usize,
    column: &str,
    data_type: DataType,
    v: &serde_json::Value,
) -> IngestionResult<Value> {
    if v.is_null() {
        return Ok(Value::Null);
    }

    let parse_err = |message: &str| IngestionError::ParseError {
        row,
        column: column.to_string(),
        raw: v.to_string(),
        message: message.to_string(),
    };

    match data_type {
        DataType::Utf8 => v
            .as_str()
            .map(|s| Value::Utf8(s.to_string()))
            .ok_or_else(|| parse_err("expected string")),
        DataType::Bool => v.as_bool().map(Value::Bool).ok_or_else(|| parse_err("expected bool")),
        DataType::Int64 => {
            if let Some(n) = v.as_i64() {
                Ok(Value::Int64(n))
            } else if let Some(n) = v.as_u64() {
                i64::try_from(n)
                    .map(Value::Int64)
                    .map_err(|_| parse_err("u64 out of range for i64"))
            } else {
                Err(parse_err("expected integer number"))
            }
        }
        DataType::Float64 => v
            .as_f64()
            .map(Value::Float64)
            .ok_or_else(|| parse_err("expected number")),
    }
}
