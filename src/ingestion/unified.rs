//! Unified loading entrypoints.
//!
//! - [`ingest_from_path`] parses a file into a [`DataSet`] shaped by a caller-provided
//!   [`Schema`] (values are converted to the declared field types).
//! - [`load_from_path`] loads a file without a schema: every header becomes a column and each
//!   cell keeps its own kind. This is what validation and inspection run on.
//!
//! If [`IngestionOptions::format`] is `None`, the format is inferred from the file extension.
//! If an [`IngestionObserver`] is provided, success/failure/alerts are reported to it.

use std::error::Error as StdError;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::error::{IngestionError, IngestionResult};
use crate::types::{DataSet, Schema};

use super::observability::{IngestionContext, IngestionObserver, IngestionSeverity, Operation, Outcome};
use super::{csv, json};

/// Supported file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestionFormat {
    /// Comma-separated values.
    Csv,
    /// JSON array-of-objects or NDJSON.
    Json,
    /// Spreadsheet/workbook formats (feature-gated behind `excel`).
    Excel,
}

impl IngestionFormat {
    /// Parse a format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "json" | "ndjson" => Some(Self::Json),
            "xlsx" | "xls" | "xlsm" | "xlsb" | "ods" => Some(Self::Excel),
            _ => None,
        }
    }
}

/// How to choose sheet(s) when loading an Excel workbook.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ExcelSheetSelection {
    /// Load the first sheet (default).
    #[default]
    First,
    /// Load a single named sheet.
    Sheet(String),
    /// Load all sheets and concatenate rows.
    AllSheets,
    /// Load only the listed sheets (in order) and concatenate rows.
    Sheets(Vec<String>),
}

/// Options controlling loading behavior.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct IngestionOptions {
    /// If `None`, auto-detect format from file extension.
    pub format: Option<IngestionFormat>,
    /// Excel-specific options.
    pub excel_sheet_selection: ExcelSheetSelection,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn IngestionObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: IngestionSeverity,
}

impl fmt::Debug for IngestionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestionOptions")
            .field("format", &self.format)
            .field("excel_sheet_selection", &self.excel_sheet_selection)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for IngestionOptions {
    fn default() -> Self {
        Self {
            format: None,
            excel_sheet_selection: ExcelSheetSelection::default(),
            observer: None,
            alert_at_or_above: IngestionSeverity::Critical,
        }
    }
}

impl IngestionOptions {
    /// Options forcing `format`, everything else default.
    pub fn with_format(format: IngestionFormat) -> Self {
        Self {
            format: Some(format),
            ..Default::default()
        }
    }

    /// Context for `operation` on `path`; the format is resolved the same way loads resolve it.
    pub(crate) fn context(&self, operation: Operation, path: &Path, inferred: bool) -> IngestionContext {
        IngestionContext::new(operation, path, resolve_format(path, self).ok(), inferred)
    }

    pub(crate) fn notify_success(&self, ctx: &IngestionContext, outcome: Outcome) {
        if let Some(obs) = self.observer.as_ref() {
            obs.on_success(ctx, &outcome);
        }
    }

    /// Reports `on_failure`, then `on_alert` when `severity` meets [`Self::alert_at_or_above`].
    pub(crate) fn notify_failure(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &dyn StdError) {
        if let Some(obs) = self.observer.as_ref() {
            obs.on_failure(ctx, severity, error);
            if severity >= self.alert_at_or_above {
                obs.on_alert(ctx, severity, error);
            }
        }
    }
}

/// Schema-driven loading for path-based sources.
///
/// - If `options.format` is `None`, format is inferred from the file extension.
/// - Use `options.excel_sheet_selection` for Excel multi-tab behavior.
///
/// When an observer is configured, this function reports:
///
/// - `on_success` on success, with an [`Outcome::Loaded`] carrying row/column counts
/// - `on_failure` on failure (an unresolvable format included), with a computed severity
/// - `on_alert` on failure when the computed severity is >= `options.alert_at_or_above`
///
/// # Examples
///
/// ```no_run
/// use rust_excel_toolkit::ingestion::{ingest_from_path, IngestionOptions};
/// use rust_excel_toolkit::types::{DataType, Field, Schema};
///
/// # fn main() -> Result<(), rust_excel_toolkit::IngestionError> {
/// let schema = Schema::new(vec![
///     Field::new("id", DataType::Int64),
///     Field::new("name", DataType::Utf8),
/// ]);
///
/// // Uses `.csv` to select CSV ingestion.
/// let ds = ingest_from_path("people.csv", &schema, &IngestionOptions::default())?;
/// println!("rows={}", ds.row_count());
/// # Ok(())
/// # }
/// ```
///
/// ## Observability (stderr logging + alert threshold)
///
/// ```no_run
/// use std::sync::Arc;
///
/// use rust_excel_toolkit::ingestion::{
///     ingest_from_path, IngestionOptions, IngestionSeverity, StdErrObserver,
/// };
/// use rust_excel_toolkit::types::{DataType, Field, Schema};
///
/// let schema = Schema::new(vec![Field::new("id", DataType::Int64)]);
///
/// let opts = IngestionOptions {
///     observer: Some(Arc::new(StdErrObserver::default())),
///     alert_at_or_above: IngestionSeverity::Critical,
///     ..Default::default()
/// };
///
/// // Missing files are treated as Critical and will trigger `on_alert` at this threshold.
/// let _err = ingest_from_path("does_not_exist.csv", &schema, &opts).unwrap_err();
/// ```
pub fn ingest_from_path(
    path: impl AsRef<Path>,
    schema: &Schema,
    options: &IngestionOptions,
) -> IngestionResult<DataSet> {
    let path = path.as_ref();
    observe(path, false, options, |fmt| match fmt {
        IngestionFormat::Csv => csv::ingest_csv_from_path(path, schema),
        IngestionFormat::Json => json::ingest_json_from_path(path, schema),
        IngestionFormat::Excel => ingest_excel_dispatch(path, Some(schema), &options.excel_sheet_selection),
    })
}

/// Schema-less loading for path-based sources.
///
/// Column types are inferred; cells keep their own kind (an Excel `30.0` stays a float).
///
/// ```no_run
/// use rust_excel_toolkit::ingestion::{load_from_path, IngestionOptions};
///
/// # fn main() -> Result<(), rust_excel_toolkit::IngestionError> {
/// let ds = load_from_path("dados.xlsx", &IngestionOptions::default())?;
/// for field in &ds.schema.fields {
///     println!("{} -> {}", field.name, field.data_type);
/// }
/// # Ok(())
/// # }
/// ```
pub fn load_from_path(path: impl AsRef<Path>, options: &IngestionOptions) -> IngestionResult<DataSet> {
    let path = path.as_ref();
    observe(path, true, options, |fmt| match fmt {
        IngestionFormat::Csv => csv::load_csv_from_path(path),
        IngestionFormat::Json => json::load_json_from_path(path),
        IngestionFormat::Excel => ingest_excel_dispatch(path, None, &options.excel_sheet_selection),
    })
}

/// Resolve the format for `path` under `options`.
pub fn resolve_format(path: &Path, options: &IngestionOptions) -> IngestionResult<IngestionFormat> {
    match options.format {
        Some(f) => Ok(f),
        None => infer_format_from_path(path),
    }
}

fn observe<F>(path: &Path, inferred: bool, options: &IngestionOptions, load: F) -> IngestionResult<DataSet>
where
    F: FnOnce(IngestionFormat) -> IngestionResult<DataSet>,
{
    let format = resolve_format(path, options);
    let ctx = IngestionContext::new(Operation::Load, path, format.as_ref().ok().copied(), inferred);

    let result = format.and_then(load);
    match &result {
        Ok(ds) => options.notify_success(
            &ctx,
            Outcome::Loaded {
                rows: ds.row_count(),
                columns: ds.column_count(),
            },
        ),
        Err(e) => options.notify_failure(&ctx, severity_of(e), e),
    }

    result
}

/// Severity of a load failure: I/O problems are Critical, everything else is Error.
pub(crate) fn severity_of(e: &IngestionError) -> IngestionSeverity {
    match e {
        IngestionError::Io(_) => IngestionSeverity::Critical,
        IngestionError::Csv(err) => match err.kind() {
            ::csv::ErrorKind::Io(_) => IngestionSeverity::Critical,
            _ => IngestionSeverity::Error,
        },
        IngestionError::Json(err) if err.is_io() => IngestionSeverity::Critical,
        IngestionError::Json(_) => IngestionSeverity::Error,
        #[cfg(feature = "excel")]
        IngestionError::Excel(err) => {
            // Workbook readers wrap I/O failures at different depths.
            if matches!(err, calamine::Error::Io(_)) || error_chain_contains_io(err) {
                IngestionSeverity::Critical
            } else {
                IngestionSeverity::Error
            }
        }
        IngestionError::SchemaMismatch { .. } => IngestionSeverity::Error,
        IngestionError::ParseError { .. } => IngestionSeverity::Error,
    }
}

#[cfg(feature = "excel")]
fn error_chain_contains_io(e: &(dyn StdError + 'static)) -> bool {
    let mut cur: Option<&(dyn StdError + 'static)> = Some(e);
    while let Some(err) = cur {
        if err.is::<std::io::Error>() {
            return true;
        }
        cur = err.source();
    }
    false
}

fn infer_format_from_path(path: &Path) -> IngestionResult<IngestionFormat> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .ok_or_else(|| IngestionError::SchemaMismatch {
            message: format!("cannot infer format: path has no extension ({})", path.display()),
        })?;

    IngestionFormat::from_extension(ext).ok_or_else(|| IngestionError::SchemaMismatch {
        message: format!(
            "cannot infer format from extension '{ext}' for path ({})",
            path.display()
        ),
    })
}

fn ingest_excel_dispatch(
    path: &Path,
    schema: Option<&Schema>,
    sel: &ExcelSheetSelection,
) -> IngestionResult<DataSet> {
    // Avoid unused warnings when the feature is off.
    let _ = (path, schema, sel);

    #[cfg(feature = "excel")]
    {
        use super::excel;

        let named: Option<Vec<&str>> = match sel {
            ExcelSheetSelection::First | ExcelSheetSelection::AllSheets => None,
            ExcelSheetSelection::Sheet(name) => Some(vec![name.as_str()]),
            ExcelSheetSelection::Sheets(names) => Some(names.iter().map(|s| s.as_str()).collect()),
        };

        match (sel, schema) {
            (ExcelSheetSelection::First, Some(schema)) => excel::ingest_excel_from_path(path, None, schema),
            (ExcelSheetSelection::First, None) => excel::load_excel_from_path(path, None),
            (_, Some(schema)) => excel::ingest_excel_workbook_from_path(path, named.as_deref(), schema),
            (_, None) => excel::load_excel_workbook_from_path(path, named.as_deref()),
        }
    }

    #[cfg(not(feature = "excel"))]
    {
        Err(IngestionError::SchemaMismatch {
            message: "excel ingestion not enabled (enable cargo feature 'excel')".to_string(),
        })
    }
}
