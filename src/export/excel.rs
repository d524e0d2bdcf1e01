#![cfg(feature = "excel")]
//! Excel workbook writer (feature `excel`).

use std::path::Path;

use rust_xlsxwriter::{Format, Workbook, Worksheet};

use crate::error::{ExportError, ExportResult};
use crate::types::{DataSet, Value};

/// Sheet name used when none is given.
pub const DEFAULT_SHEET_NAME: &str = "Sheet1";

/// Write `dataset` to a single-sheet `.xlsx` workbook.
///
/// The first row holds the (bold) column names. Numbers are written as numbers, booleans as
/// booleans, text as strings. Missing values leave the cell blank. Worksheet numbers are
/// doubles, so integers beyond ±2^53 are written as text to keep every digit.
pub fn write_excel(dataset: &DataSet, path: impl AsRef<Path>, sheet_name: Option<&str>) -> ExportResult<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name.unwrap_or(DEFAULT_SHEET_NAME))?;
    write_sheet(dataset, worksheet)?;
    workbook.save(path.as_ref())?;
    Ok(())
}

fn write_sheet(dataset: &DataSet, worksheet: &mut Worksheet) -> ExportResult<()> {
    let header = Format::new().set_bold();
    for (idx, name) in dataset.schema.field_names().enumerate() {
        worksheet.write_string_with_format(0, col_index(idx)?, name, &header)?;
    }

    for (r, row) in dataset.rows.iter().enumerate() {
        let row_idx = row_index(r + 1)?;
        for (c, value) in row.iter().enumerate().take(dataset.column_count()) {
            let col_idx = col_index(c)?;
            match value {
                Value::Null => {}
                Value::Float64(v) if v.is_nan() => {}
                Value::Int64(v) => match exact_number(*v) {
                    Some(n) => {
                        worksheet.write_number(row_idx, col_idx, n)?;
                    }
                    None => {
                        worksheet.write_string(row_idx, col_idx, v.to_string())?;
                    }
                },
                Value::Float64(v) => {
                    worksheet.write_number(row_idx, col_idx, *v)?;
                }
                Value::Bool(v) => {
                    worksheet.write_boolean(row_idx, col_idx, *v)?;
                }
                Value::Utf8(s) => {
                    worksheet.write_string(row_idx, col_idx, s)?;
                }
            }
        }
    }
    Ok(())
}

/// Integers within ±2^53 convert to `f64` exactly.
const MAX_EXACT_INT: i64 = 1 << 53;

fn exact_number(v: i64) -> Option<f64> {
    (-MAX_EXACT_INT..=MAX_EXACT_INT).contains(&v).then_some(v as f64)
}

fn row_index(idx: usize) -> ExportResult<u32> {
    u32::try_from(idx).map_err(|_| ExportError::InvalidArgument {
        message: format!("row {idx} does not fit in a worksheet"),
    })
}

fn col_index(idx: usize) -> ExportResult<u16> {
    u16::try_from(idx).map_err(|_| ExportError::InvalidArgument {
        message: format!("column {idx} does not fit in a worksheet"),
    })
}
