//! JSON export of tables and reports.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use serde::Serialize;
use serde_json::{Map, Number, Value as JsonValue};

use crate::error::ExportResult;
use crate::types::{DataSet, Value};

/// Layout of a table written as JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonOrient {
    /// `[{"col": value, ...}, ...]`, one object per row.
    #[default]
    Records,
    /// `{"col": [value, ...], ...}`, one array per column.
    Columns,
}

fn to_json_value(value: &Value) -> JsonValue {
    match value {
        Value::Null => JsonValue::Null,
        Value::Int64(v) => JsonValue::Number((*v).into()),
        // NaN and infinities have no JSON representation.
        Value::Float64(v) => Number::from_f64(*v).map_or(JsonValue::Null, JsonValue::Number),
        Value::Bool(v) => JsonValue::Bool(*v),
        Value::Utf8(s) => JsonValue::String(s.clone()),
    }
}

/// Rows as an array of objects keyed by column name, keys in schema order.
pub fn to_json_records(dataset: &DataSet) -> JsonValue {
    let rows = dataset
        .rows
        .iter()
        .map(|row| {
            let obj: Map<String, JsonValue> = dataset
                .schema
                .fields
                .iter()
                .enumerate()
                .map(|(idx, f)| (f.name.clone(), to_json_value(row.get(idx).unwrap_or(&Value::Null))))
                .collect();
            JsonValue::Object(obj)
        })
        .collect();
    JsonValue::Array(rows)
}

/// Columns as an object of column name to value array, in schema order.
pub fn to_json_columns(dataset: &DataSet) -> JsonValue {
    let obj: Map<String, JsonValue> = dataset
        .schema
        .fields
        .iter()
        .enumerate()
        .map(|(idx, f)| {
            let values = dataset.column_values(idx).map(to_json_value).collect();
            (f.name.clone(), JsonValue::Array(values))
        })
        .collect();
    JsonValue::Object(obj)
}

/// Write `dataset` as pretty-printed JSON.
pub fn write_json(dataset: &DataSet, path: impl AsRef<Path>, orient: JsonOrient) -> ExportResult<()> {
    let doc = match orient {
        JsonOrient::Records => to_json_records(dataset),
        JsonOrient::Columns => to_json_columns(dataset),
    };
    write_report_json(&doc, path)
}

/// Write any serializable report (validation results, statistics, ...) as pretty JSON.
pub fn write_report_json<T: Serialize + ?Sized>(report: &T, path: impl AsRef<Path>) -> ExportResult<()> {
    let file = File::create(path.as_ref())?;
    let mut w = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut w, report)?;
    std::io::Write::flush(&mut w)?;
    Ok(())
}
