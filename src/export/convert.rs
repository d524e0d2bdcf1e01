//! File format conversions.
//!
//! Each conversion loads the source without a schema (so cell kinds are preserved) and hands
//! the resulting [`DataSet`] to a writer. The source format is forced; the file extension does
//! not matter.
//!
//! An observer set on the options sees the source load, then an [`Outcome::Converted`] or the
//! conversion failure.

use std::path::Path;

use crate::error::{ExportError, ExportResult};
use crate::ingestion::unified::severity_of;
use crate::ingestion::{
    load_from_path, IngestionContext, IngestionFormat, IngestionOptions, IngestionSeverity, Operation, Outcome,
};
use crate::types::DataSet;

use super::csv::write_csv;
#[cfg(feature = "excel")]
use super::excel::write_excel;
use super::json::{write_json, JsonOrient};

fn convert<W>(src: &Path, dst: &Path, format: IngestionFormat, options: &IngestionOptions, write: W) -> ExportResult<usize>
where
    W: FnOnce(&DataSet, &Path) -> ExportResult<()>,
{
    let ctx = IngestionContext::new(Operation::Convert, src, Some(format), true);
    let forced = IngestionOptions {
        format: Some(format),
        ..options.clone()
    };

    let result = load_from_path(src, &forced)
        .map_err(ExportError::from)
        .and_then(|ds| {
            write(&ds, dst)?;
            Ok(ds.row_count())
        });

    match &result {
        Ok(rows) => options.notify_success(
            &ctx,
            Outcome::Converted {
                output: dst.to_path_buf(),
                rows: *rows,
            },
        ),
        Err(e) => options.notify_failure(&ctx, severity_of_export(e), e),
    }
    result
}

fn severity_of_export(e: &ExportError) -> IngestionSeverity {
    match e {
        ExportError::Io(_) => IngestionSeverity::Critical,
        ExportError::Csv(err) if matches!(err.kind(), ::csv::ErrorKind::Io(_)) => IngestionSeverity::Critical,
        ExportError::Json(err) if err.is_io() => IngestionSeverity::Critical,
        ExportError::Ingestion(inner) => severity_of(inner),
        _ => IngestionSeverity::Error,
    }
}

/// Convert a CSV file to a single-sheet workbook. Returns the number of data rows written.
#[cfg(feature = "excel")]
pub fn csv_to_excel(
    src: impl AsRef<Path>,
    dst: impl AsRef<Path>,
    sheet_name: Option<&str>,
    options: &IngestionOptions,
) -> ExportResult<usize> {
    convert(src.as_ref(), dst.as_ref(), IngestionFormat::Csv, options, |ds, dst| {
        write_excel(ds, dst, sheet_name)
    })
}

/// Convert a workbook to CSV. The sheet(s) come from `options.excel_sheet_selection`.
#[cfg(feature = "excel")]
pub fn excel_to_csv(src: impl AsRef<Path>, dst: impl AsRef<Path>, options: &IngestionOptions) -> ExportResult<usize> {
    convert(src.as_ref(), dst.as_ref(), IngestionFormat::Excel, options, |ds, dst| write_csv(ds, dst))
}

/// Convert a workbook to JSON in the given orientation.
#[cfg(feature = "excel")]
pub fn excel_to_json(
    src: impl AsRef<Path>,
    dst: impl AsRef<Path>,
    orient: JsonOrient,
    options: &IngestionOptions,
) -> ExportResult<usize> {
    convert(src.as_ref(), dst.as_ref(), IngestionFormat::Excel, options, |ds, dst| {
        write_json(ds, dst, orient)
    })
}

/// Convert a JSON array of objects (or NDJSON) to a single-sheet workbook.
#[cfg(feature = "excel")]
pub fn json_to_excel(
    src: impl AsRef<Path>,
    dst: impl AsRef<Path>,
    sheet_name: Option<&str>,
    options: &IngestionOptions,
) -> ExportResult<usize> {
    convert(src.as_ref(), dst.as_ref(), IngestionFormat::Json, options, |ds, dst| {
        write_excel(ds, dst, sheet_name)
    })
}

/// Convert a CSV file to JSON in the given orientation.
pub fn csv_to_json(
    src: impl AsRef<Path>,
    dst: impl AsRef<Path>,
    orient: JsonOrient,
    options: &IngestionOptions,
) -> ExportResult<usize> {
    convert(src.as_ref(), dst.as_ref(), IngestionFormat::Csv, options, |ds, dst| {
        write_json(ds, dst, orient)
    })
}

/// Convert a JSON array of objects (or NDJSON) to CSV.
pub fn json_to_csv(src: impl AsRef<Path>, dst: impl AsRef<Path>, options: &IngestionOptions) -> ExportResult<usize> {
    convert(src.as_ref(), dst.as_ref(), IngestionFormat::Json, options, |ds, dst| write_csv(ds, dst))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IngestionError;

    #[test]
    fn export_failures_map_to_severity() {
        let io = || std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        assert_eq!(severity_of_export(&ExportError::Io(io())), IngestionSeverity::Critical);
        assert_eq!(
            severity_of_export(&ExportError::Ingestion(IngestionError::Io(io()))),
            IngestionSeverity::Critical
        );
        assert_eq!(
            severity_of_export(&ExportError::Ingestion(IngestionError::SchemaMismatch {
                message: "bad".to_string()
            })),
            IngestionSeverity::Error
        );
        assert_eq!(
            severity_of_export(&ExportError::InvalidArgument {
                message: "too wide".to_string()
            }),
            IngestionSeverity::Error
        );
    }
}
