//! Schema inference for schema-less loading.
//!
//! Cells keep their own kind; only the [`Field`] data type is inferred per column.

use crate::types::{DataSet, DataType, Field, Schema, Value};

/// Parse a raw text cell into the narrowest value kind.
///
/// Order: empty → `Null`, `i64`, `f64`, `true`/`false` (case-insensitive), else text.
pub(crate) fn parse_untyped(raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    if let Ok(v) = trimmed.parse::<i64>() {
        return Value::Int64(v);
    }
    if let Ok(v) = trimmed.parse::<f64>() {
        return Value::Float64(v);
    }
    match trimmed.to_ascii_lowercase().as_str() {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => Value::Utf8(trimmed.to_owned()),
    }
}

/// Infer a column data type from its values.
///
/// - all non-missing values `Int64` → `Int64`
/// - all numeric (or all missing) → `Float64`
/// - all `Bool` → `Bool`
/// - anything else → `Utf8`
pub(crate) fn infer_data_type<'a>(values: impl Iterator<Item = &'a Value>) -> DataType {
    let mut all_int = true;
    let mut all_numeric = true;
    let mut all_bool = true;
    let mut seen = false;

    for v in values {
        if v.is_missing() {
            continue;
        }
        seen = true;
        match v {
            Value::Int64(_) => all_bool = false,
            Value::Float64(_) => {
                all_int = false;
                all_bool = false;
            }
            Value::Bool(_) => {
                all_int = false;
                all_numeric = false;
            }
            _ => return DataType::Utf8,
        }
    }

    if !seen {
        DataType::Float64
    } else if all_int {
        DataType::Int64
    } else if all_numeric {
        DataType::Float64
    } else if all_bool {
        DataType::Bool
    } else {
        DataType::Utf8
    }
}

/// Build a dataset from headers and untyped rows, inferring each field's type.
pub(crate) fn dataset_from_untyped(headers: Vec<String>, rows: Vec<Vec<Value>>) -> DataSet {
    let fields = headers
        .into_iter()
        .enumerate()
        .map(|(idx, name)| {
            let column = rows.iter().map(|r| r.get(idx).unwrap_or(&Value::Null));
            Field::new(name, infer_data_type(column))
        })
        .collect();
    DataSet::new(Schema::new(fields), rows)
}
