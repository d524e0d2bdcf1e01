#![cfg(feature = "excel")]

use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader};

use crate::error::{IngestionError, IngestionResult};
use crate::types::{DataSet, DataType, Schema, Value};

use super::csv::parse_bool;
use super::infer::dataset_from_untyped;

/// Ingest an Excel document (`.xlsx`, `.xls`, `.ods`, etc.) into an in-memory `DataSet`.
///
/// Behavior:
/// - Picks `sheet_name` if provided; otherwise uses the first sheet in the workbook
/// - Detects the first non-empty row as the header row
/// - Validates that all schema fields exist as headers
/// - Reads remaining rows and converts cells into typed `Value`s
pub fn ingest_excel_from_path(
    path: impl AsRef<Path>,
    sheet_name: Option<&str>,
    schema: &Schema,
) -> IngestionResult<DataSet> {
    match sheet_name {
        Some(name) => ingest_excel_workbook_from_path(path, Some(&[name]), schema),
        None => {
            let mut workbook = open_workbook_auto(path)?;
            let first = first_sheet_name(&workbook.sheet_names())?;
            let range = workbook.worksheet_range(&first)?;
            let rows = ingest_sheet_range(&first, &range, schema)?;
            Ok(DataSet::new(schema.clone(), rows))
        }
    }
}

/// Ingest multiple sheets from an Excel workbook and concatenate all rows into one `DataSet`.
///
/// - If `sheet_names` is `None`, ingests **all sheets** in workbook order.
/// - If `sheet_names` is `Some(&[...])`, ingests only those sheets (in the provided order).
///
/// All selected tabs must carry every schema field in their header row.
pub fn ingest_excel_workbook_from_path(
    path: impl AsRef<Path>,
    sheet_names: Option<&[&str]>,
    schema: &Schema,
) -> IngestionResult<DataSet> {
    let mut workbook = open_workbook_auto(path)?;
    let sheets = resolve_sheets(&workbook.sheet_names(), sheet_names)?;

    let mut all_rows: Vec<Vec<Value>> = Vec::new();
    for sheet in sheets {
        let range = workbook.worksheet_range(&sheet)?;
        let mut sheet_rows = ingest_sheet_range(&sheet, &range, schema)?;
        all_rows.append(&mut sheet_rows);
    }

    Ok(DataSet::new(schema.clone(), all_rows))
}

/// Load a single sheet without a schema (first sheet when `sheet_name` is `None`).
///
/// Cells keep their workbook kind: numbers stored as floats stay `Float64` even when
/// integral, which is what the validator's integer coercion is for.
pub fn load_excel_from_path(path: impl AsRef<Path>, sheet_name: Option<&str>) -> IngestionResult<DataSet> {
    let mut workbook = open_workbook_auto(path)?;
    let sheet = match sheet_name {
        Some(name) => name.to_string(),
        None => first_sheet_name(&workbook.sheet_names())?,
    };
    let range = workbook.worksheet_range(&sheet)?;
    let (headers, rows) = load_sheet_range(&range).map_err(|e| wrap_schema_err_with_sheet(&sheet, e))?;
    Ok(dataset_from_untyped(headers, rows))
}

/// Load several sheets without a schema and concatenate their rows.
///
/// The first selected sheet defines the columns; later sheets are aligned by header name and
/// cells under unknown headers are dropped.
pub fn load_excel_workbook_from_path(
    path: impl AsRef<Path>,
    sheet_names: Option<&[&str]>,
) -> IngestionResult<DataSet> {
    let mut workbook = open_workbook_auto(path)?;
    let sheets = resolve_sheets(&workbook.sheet_names(), sheet_names)?;

    let mut headers: Option<Vec<String>> = None;
    let mut all_rows: Vec<Vec<Value>> = Vec::new();
    for sheet in sheets {
        let range = workbook.worksheet_range(&sheet)?;
        let (sheet_headers, sheet_rows) =
            load_sheet_range(&range).map_err(|e| wrap_schema_err_with_sheet(&sheet, e))?;

        match &headers {
            None => {
                headers = Some(sheet_headers);
                all_rows.extend(sheet_rows);
            }
            Some(cols) => {
                let projection: Vec<Option<usize>> = cols
                    .iter()
                    .map(|c| sheet_headers.iter().position(|h| h == c))
                    .collect();
                for row in sheet_rows {
                    all_rows.push(
                        projection
                            .iter()
                            .map(|p| p.and_then(|i| row.get(i).cloned()).unwrap_or(Value::Null))
                            .collect(),
                    );
                }
            }
        }
    }

    Ok(dataset_from_untyped(headers.unwrap_or_default(), all_rows))
}

/// Sheet names of a workbook, in workbook order.
pub fn list_sheets(path: impl AsRef<Path>) -> IngestionResult<Vec<String>> {
    let workbook = open_workbook_auto(path)?;
    Ok(workbook.sheet_names())
}

fn first_sheet_name(names: &[String]) -> IngestionResult<String> {
    names.first().cloned().ok_or_else(|| IngestionError::SchemaMismatch {
        message: "workbook has no sheets".to_string(),
    })
}

fn resolve_sheets(available: &[String], requested: Option<&[&str]>) -> IngestionResult<Vec<String>> {
    let sheets: Vec<String> = match requested {
        Some(names) => names.iter().map(|s| s.to_string()).collect(),
        None => available.to_vec(),
    };
    if sheets.is_empty() {
        return Err(IngestionError::SchemaMismatch {
            message: "workbook has no sheets".to_string(),
        });
    }
    Ok(sheets)
}

fn ingest_sheet_range(sheet: &str, range: &Range<Data>, schema: &Schema) -> IngestionResult<Vec<Vec<Value>>> {
    let (header_row_idx, col_idxs) =
        build_header_projection(range, schema).map_err(|e| wrap_schema_err_with_sheet(sheet, e))?;

    let mut rows: Vec<Vec<Value>> = Vec::new();
    for (idx0, row) in range.rows().enumerate().skip(header_row_idx + 1) {
        // Report 1-based row number (Excel-like).
        let user_row = idx0 + 1;

        let mut out_row: Vec<Value> = Vec::with_capacity(schema.fields.len());
        for (field, &col_idx) in schema.fields.iter().zip(col_idxs.iter()) {
            let cell = row.get(col_idx).unwrap_or(&Data::Empty);
            let col_label = format!("{sheet}:{name}", name = field.name);
            out_row.push(convert_cell(user_row, &col_label, field.data_type, cell)?);
        }
        rows.push(out_row);
    }

    Ok(rows)
}

fn load_sheet_range(range: &Range<Data>) -> IngestionResult<(Vec<String>, Vec<Vec<Value>>)> {
    let (header_row_idx, header_cells) = find_header_row(range)?;

    // Trailing blank header cells do not make columns.
    let width = header_cells
        .iter()
        .rposition(|h| !h.trim().is_empty())
        .map(|i| i + 1)
        .unwrap_or(0);
    let headers: Vec<String> = header_cells
        .into_iter()
        .take(width)
        .enumerate()
        .map(|(i, h)| {
            let h = h.trim().to_string();
            if h.is_empty() { format!("column_{}", i + 1) } else { h }
        })
        .collect();

    let rows = range
        .rows()
        .skip(header_row_idx + 1)
        .map(|row| {
            (0..width)
                .map(|i| untyped_cell(row.get(i).unwrap_or(&Data::Empty)))
                .collect()
        })
        .collect();

    Ok((headers, rows))
}

fn wrap_schema_err_with_sheet(sheet: &str, err: IngestionError) -> IngestionError {
    match err {
        IngestionError::SchemaMismatch { message } => IngestionError::SchemaMismatch {
            message: format!("sheet '{sheet}': {message}"),
        },
        other => other,
    }
}

fn find_header_row(range: &Range<Data>) -> IngestionResult<(usize, Vec<String>)> {
    range
        .rows()
        .enumerate()
        .find(|(_, row)| row.iter().any(|c| !matches!(c, Data::Empty)))
        .map(|(idx0, row)| (idx0, row.iter().map(cell_to_header_string).collect()))
        .ok_or_else(|| IngestionError::SchemaMismatch {
            message: "sheet has no non-empty rows (no header row found)".to_string(),
        })
}

fn build_header_projection(range: &Range<Data>, schema: &Schema) -> IngestionResult<(usize, Vec<usize>)> {
    let (header_row_idx, header_cells) = find_header_row(range)?;

    // Build a projection of schema field -> column index by searching header_cells.
    let mut col_idxs: Vec<usize> = Vec::with_capacity(schema.fields.len());
    for f in &schema.fields {
        match header_cells.iter().position(|h| h.trim() == f.name) {
            Some(idx) => col_idxs.push(idx),
            None => {
                return Err(IngestionError::SchemaMismatch {
                    message: format!("missing required column '{}'. headers={:?}", f.name, header_cells),
                });
            }
        }
    }

    Ok((header_row_idx, col_idxs))
}

fn cell_to_header_string(c: &Data) -> String {
    match c {
        Data::Float(f) if f.fract() == 0.0 => (*f as i64).to_string(),
        Data::Error(e) => format!("{e:?}"),
        Data::Empty => String::new(),
        other => cell_to_string(other),
    }
}

fn untyped_cell(c: &Data) -> Value {
    match c {
        Data::Empty | Data::Error(_) => Value::Null,
        Data::Int(i) => Value::Int64(*i),
        Data::Float(f) => Value::Float64(*f),
        Data::Bool(b) => Value::Bool(*b),
        Data::String(s) if s.trim().is_empty() => Value::Null,
        Data::String(s) => Value::Utf8(s.clone()),
        other => Value::Utf8(other.to_string()),
    }
}

fn convert_cell(row: usize, column: &str, data_type: DataType, c: &Data) -> IngestionResult<Value> {
    if matches!(c, Data::Empty) {
        return Ok(Value::Null);
    }

    match data_type {
        DataType::Utf8 => Ok(Value::Utf8(cell_to_string(c))),
        DataType::Bool => parse_bool_cell(row, column, c).map(Value::Bool),
        DataType::Int64 => parse_i64_cell(row, column, c).map(Value::Int64),
        DataType::Float64 => parse_f64_cell(row, column, c).map(Value::Float64),
    }
}

fn cell_to_string(c: &Data) -> String {
    match c {
        Data::String(s) => s.clone(),
        _ => c.to_string(),
    }
}

fn cell_parse_error(row: usize, column: &str, raw: String, message: impl Into<String>) -> IngestionError {
    IngestionError::ParseError {
        row,
        column: column.to_string(),
        raw,
        message: message.into(),
    }
}

fn parse_bool_cell(row: usize, column: &str, c: &Data) -> IngestionResult<bool> {
    match c {
        Data::Bool(b) => Ok(*b),
        Data::Int(i) => Ok(*i != 0),
        Data::Float(f) => Ok(*f != 0.0),
        Data::String(s) => parse_bool(s).map_err(|message| cell_parse_error(row, column, s.clone(), message)),
        _ => Err(cell_parse_error(row, column, c.to_string(), "expected bool")),
    }
}

fn parse_i64_cell(row: usize, column: &str, c: &Data) -> IngestionResult<i64> {
    match c {
        Data::Int(i) => Ok(*i),
        Data::Float(f) if f.fract() == 0.0 => Ok(*f as i64),
        Data::Float(_) => Err(cell_parse_error(
            row,
            column,
            c.to_string(),
            "expected integer (got non-integer float)",
        )),
        Data::String(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|e| cell_parse_error(row, column, s.clone(), e.to_string())),
        _ => Err(cell_parse_error(row, column, c.to_string(), "expected integer")),
    }
}

fn parse_f64_cell(row: usize, column: &str, c: &Data) -> IngestionResult<f64> {
    match c {
        Data::Float(f) => Ok(*f),
        Data::Int(i) => Ok(*i as f64),
        Data::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|e| cell_parse_error(row, column, s.clone(), e.to_string())),
        _ => Err(cell_parse_error(row, column, c.to_string(), "expected number")),
    }
}
