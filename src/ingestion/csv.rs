//! CSV ingestion implementation.

use std::path::Path;

use crate::error::{IngestionError, IngestionResult};
use crate::types::{DataSet, DataType, Schema, Value};

use super::infer::{dataset_from_untyped, parse_untyped};

/// Ingest a CSV file into an in-memory [`DataSet`].
///
/// Rules:
///
/// - CSV must have headers.
/// - Headers must contain all schema fields (order can differ).
/// - Each value is parsed according to the schema field type.
pub fn ingest_csv_from_path(path: impl AsRef<Path>, schema: &Schema) -> IngestionResult<DataSet> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)?;
    ingest_csv_from_reader(&mut rdr, schema)
}

/// Ingest CSV data from an existing CSV reader.
pub fn ingest_csv_from_reader<R: std::io::Read>(
    rdr: &mut csv::Reader<R>,
    schema: &Schema,
) -> IngestionResult<DataSet> {
    let headers = rdr.headers()?.clone();

    // Map schema fields -> CSV column indexes (allows re-ordered CSV columns).
    let mut col_idxs = Vec::with_capacity(schema.fields.len());
    for field in &schema.fields {
        match headers.iter().position(|h| h.trim() == field.name) {
            Some(idx) => col_idxs.push(idx),
            None => {
                return Err(IngestionError::SchemaMismatch {
                    message: format!(
                        "missing required column '{field}'. headers={:?}",
                        headers.iter().collect::<Vec<_>>(),
                        field = field.name
                    ),
                });
            }
        }
    }

    let mut rows: Vec<Vec<Value>> = Vec::new();
    for (row_idx0, result) in rdr.records().enumerate() {
        // Report 1-based row number for users; +1 again because header is row 1.
        let user_row = row_idx0 + 2;
        let record = result?;

        let mut row: Vec<Value> = Vec::with_capacity(schema.fields.len());
        for (field, &csv_idx) in schema.fields.iter().zip(col_idxs.iter()) {
            let raw = record.get(csv_idx).unwrap_or("");
            row.push(parse_typed_value(user_row, &field.name, field.data_type, raw)?);
        }
        rows.push(row);
    }

    Ok(DataSet::new(schema.clone(), rows))
}

/// Load a CSV file without a schema.
///
/// Every header becomes a field; each cell keeps the narrowest kind it parses as
/// (integer, float, bool, text) and field types are inferred from the values.
pub fn load_csv_from_path(path: impl AsRef<Path>) -> IngestionResult<DataSet> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    load_csv_from_reader(&mut rdr)
}

/// Schema-less variant of [`ingest_csv_from_reader`].
pub fn load_csv_from_reader<R: std::io::Read>(rdr: &mut csv::Reader<R>) -> IngestionResult<DataSet> {
    let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.trim().to_owned()).collect();
    if headers.is_empty() {
        return Err(IngestionError::SchemaMismatch {
            message: "csv has no header row".to_string(),
        });
    }

    let mut rows: Vec<Vec<Value>> = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let row = (0..headers.len())
            .map(|idx| parse_untyped(record.get(idx).unwrap_or("")))
            .collect();
        rows.push(row);
    }

    Ok(dataset_from_untyped(headers, rows))
}

fn parse_typed_value(
    row: usize,
    column: &str,
    data_type: DataType,
    raw: &str,
) -> IngestionResult<Value> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Value::Null);
    }

    match data_type {
        DataType::Utf8 => Ok(Value::Utf8(trimmed.to_owned())),
        DataType::Int64 => trimmed.parse::<i64>().map(Value::Int64).map_err(|e| {
            IngestionError::ParseError {
                row,
                column: column.to_owned(),
                raw: raw.to_owned(),
                message: e.to_string(),
            }
        }),
        DataType::Float64 => trimmed.parse::<f64>().map(Value::Float64).map_err(|e| {
            IngestionError::ParseError {
                row,
                column: column.to_owned(),
                raw: raw.to_owned(),
                message: e.to_string(),
            }
        }),
        DataType::Bool => parse_bool(trimmed).map(Value::Bool).map_err(|message| {
            IngestionError::ParseError {
                row,
                column: column.to_owned(),
                raw: raw.to_owned(),
                message,
            }
        }),
    }
}

pub(crate) fn parse_bool(s: &str) -> Result<bool, String> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "t" | "1" | "yes" | "y" => Ok(true),
        "false" | "f" | "0" | "no" | "n" => Ok(false),
        _ => Err("expected bool (true/false/1/0/yes/no)".to_string()),
    }
}
