//! File inspection and empty-cell checks.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;

use crate::error::{AnalysisError, AnalysisResult};
use crate::ingestion::unified::severity_of;
use crate::ingestion::{load_from_path, IngestionOptions, Operation, Outcome};
use crate::types::DataSet;

/// Default maximum share of empty cells per column for [`validate_empty_cells`].
pub const DEFAULT_EMPTY_THRESHOLD: f64 = 0.1;

/// Shape summary of a loaded table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableInfo {
    pub rows: usize,
    pub columns: usize,
    pub column_names: Vec<String>,
    /// Inferred data type name per column.
    pub column_types: BTreeMap<String, String>,
    /// Missing-value count per column.
    pub missing_values: BTreeMap<String, usize>,
}

/// Result of [`inspect_file`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileValidation {
    pub valid: bool,
    pub errors: Vec<String>,
    /// `None` when the file could not be loaded.
    pub info: Option<TableInfo>,
}

/// Empty-cell count for one column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColumnEmptiness {
    pub count: usize,
    /// `count / rows`, 0.0 for an empty table.
    pub percent: f64,
}

/// Result of [`validate_empty_cells`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmptyCellReport {
    /// Rows × checked columns.
    pub total_cells: usize,
    pub empty_cells: BTreeMap<String, ColumnEmptiness>,
    /// Checked columns whose empty share exceeds the threshold, in check order.
    pub columns_above_threshold: Vec<String>,
}

/// Summarise the shape of `dataset`.
pub fn inspect_dataset(dataset: &DataSet) -> TableInfo {
    let mut column_types = BTreeMap::new();
    let mut missing_values = BTreeMap::new();
    for (idx, field) in dataset.schema.fields.iter().enumerate() {
        column_types.insert(field.name.clone(), field.data_type.name().to_string());
        let missing = dataset.column_values(idx).filter(|v| v.is_missing()).count();
        missing_values.insert(field.name.clone(), missing);
    }

    TableInfo {
        rows: dataset.row_count(),
        columns: dataset.column_count(),
        column_names: dataset.schema.field_names().map(str::to_string).collect(),
        column_types,
        missing_values,
    }
}

/// Load `path` and report whether it is readable, with a [`TableInfo`] on success.
///
/// An observer on `options` sees the load, then either an [`Outcome::Inspected`] or the
/// load error again as an inspection failure.
pub fn inspect_file(path: impl AsRef<Path>, options: &IngestionOptions) -> FileValidation {
    let path = path.as_ref();
    let ctx = options.context(Operation::Inspect, path, true);
    match load_from_path(path, options) {
        Ok(ds) => {
            let info = inspect_dataset(&ds);
            options.notify_success(
                &ctx,
                Outcome::Inspected {
                    rows: info.rows,
                    columns: info.columns,
                },
            );
            FileValidation {
                valid: true,
                errors: Vec::new(),
                info: Some(info),
            }
        }
        Err(e) => {
            options.notify_failure(&ctx, severity_of(&e), &e);
            FileValidation {
                valid: false,
                errors: vec![format!("failed to load table: {e}")],
                info: None,
            }
        }
    }
}

/// Count missing cells per column and flag columns whose share exceeds `threshold`.
///
/// `columns` defaults to every column in schema order. Unknown names are an error.
pub fn validate_empty_cells(
    dataset: &DataSet,
    columns: Option<&[&str]>,
    threshold: f64,
) -> AnalysisResult<EmptyCellReport> {
    let selected: Vec<(&str, usize)> = match columns {
        Some(cols) => cols
            .iter()
            .map(|c| {
                dataset
                    .schema
                    .index_of(c)
                    .map(|idx| (*c, idx))
                    .ok_or_else(|| AnalysisError::UnknownColumn { column: c.to_string() })
            })
            .collect::<AnalysisResult<_>>()?,
        None => dataset.schema.field_names().zip(0..).collect(),
    };

    let rows = dataset.row_count();
    let mut empty_cells = BTreeMap::new();
    let mut columns_above_threshold = Vec::new();
    for (name, idx) in &selected {
        let count = dataset.column_values(*idx).filter(|v| v.is_missing()).count();
        let percent = if rows == 0 { 0.0 } else { count as f64 / rows as f64 };
        if percent > threshold {
            columns_above_threshold.push(name.to_string());
        }
        empty_cells.insert(name.to_string(), ColumnEmptiness { count, percent });
    }

    Ok(EmptyCellReport {
        total_cells: rows * selected.len(),
        empty_cells,
        columns_above_threshold,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DataType, Field, Schema, Value};

    fn sparse() -> DataSet {
        DataSet::new(
            Schema::new(vec![
                Field::new("a", DataType::Int64),
                Field::new("b", DataType::Utf8),
            ]),
            vec![
                vec![Value::Int64(1), Value::Null],
                vec![Value::Null, Value::Null],
                vec![Value::Int64(3), Value::Utf8("x".to_string())],
                vec![Value::Int64(4), Value::Utf8("y".to_string())],
            ],
        )
    }

    #[test]
    fn empty_cells_per_column() {
        let report = validate_empty_cells(&sparse(), None, 0.3).unwrap();
        assert_eq!(report.total_cells, 8);
        assert_eq!(report.empty_cells["a"].count, 1);
        assert_eq!(report.empty_cells["a"].percent, 0.25);
        assert_eq!(report.empty_cells["b"].count, 2);
        assert_eq!(report.columns_above_threshold, vec!["b".to_string()]);
    }

    #[test]
    fn empty_cells_unknown_column() {
        let err = validate_empty_cells(&sparse(), Some(&["a", "zz"]), 0.1).unwrap_err();
        assert_eq!(err, AnalysisError::UnknownColumn { column: "zz".to_string() });
    }

    #[test]
    fn empty_table_has_zero_percent() {
        let ds = DataSet::new(sparse().schema, Vec::new());
        let report = validate_empty_cells(&ds, Some(&["a"]), 0.0).unwrap();
        assert_eq!(report.total_cells, 0);
        assert_eq!(report.empty_cells["a"].percent, 0.0);
        assert!(report.columns_above_threshold.is_empty());
    }

    #[test]
    fn inspect_counts_missing() {
        let info = inspect_dataset(&sparse());
        assert_eq!(info.rows, 4);
        assert_eq!(info.columns, 2);
        assert_eq!(info.column_names, vec!["a", "b"]);
        assert_eq!(info.column_types["a"], "Int64");
        assert_eq!(info.missing_values["b"], 2);
    }
}
