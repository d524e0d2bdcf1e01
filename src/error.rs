use thiserror::Error;

/// Convenience result type for ingestion operations.
pub type IngestionResult<T> = Result<T, IngestionError>;

/// Convenience result type for writers and conversions.
pub type ExportResult<T> = Result<T, ExportError>;

/// Convenience result type for analysis operations that take column names.
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Error type returned by ingestion functions.
///
/// This is a single error enum shared across CSV/JSON (and optional Excel) ingestion.
#[derive(Debug, Error)]
pub enum IngestionError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "excel")]
    /// Excel ingestion error (feature-gated behind `excel`).
    #[error("excel error: {0}")]
    Excel(#[from] calamine::Error),

    /// CSV ingestion error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON input could not be parsed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The input does not conform to the provided schema (missing required fields/columns, etc.).
    #[error("schema mismatch: {message}")]
    SchemaMismatch { message: String },

    /// A value could not be parsed into the required [`crate::types::DataType`].
    #[error("failed to parse value at row {row} column '{column}': {message} (raw='{raw}')")]
    ParseError {
        row: usize,
        column: String,
        raw: String,
        message: String,
    },
}

/// Error type returned by writers, exporters and format conversions.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Underlying I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV writer error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "excel")]
    /// Workbook writer error (feature-gated behind `excel`).
    #[error("xlsx error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// XML writer error.
    #[error("xml error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Reading the source side of a conversion failed.
    #[error("failed to read source: {0}")]
    Ingestion(#[from] IngestionError),

    /// The table cannot be written as requested (e.g. too many rows for a worksheet).
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },
}

/// Error type for analysis operations addressed by column name.
///
/// Statistics and outlier detection never fail; they skip what they cannot use. Operations
/// whose shape depends on named columns (pivot, empty-cell checks) report unknown names here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// A referenced column does not exist in the dataset.
    #[error("unknown column '{column}'")]
    UnknownColumn { column: String },

    /// Arguments are inconsistent (e.g. empty pivot index).
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },
}
