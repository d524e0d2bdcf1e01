//! `rust-excel-toolkit` loads spreadsheet-style tables (Excel, CSV, JSON) into an in-memory
//! [`types::DataSet`], validates them against a typed column schema, summarises them
//! statistically and writes them back out in any of the supported formats.
//!
//! ## Loading
//!
//! **File formats (auto-detected by extension):**
//!
//! - **CSV**: `.csv`
//! - **JSON**: `.json` (array-of-objects) and `.ndjson` (newline-delimited objects)
//! - **Excel/workbooks** (Cargo feature `excel`, on by default): `.xlsx`, `.xls`, `.xlsm`,
//!   `.xlsb`, `.ods`
//!
//! [`ingestion::load_from_path`] reads a file without a schema: every header becomes a column
//! and each cell keeps the kind it had in the file. [`ingestion::ingest_from_path`] parses
//! cells into the types of a user-provided [`types::Schema`] instead.
//!
//! Across formats, empty cells / empty strings / explicit JSON `null` map to
//! [`types::Value::Null`]. A NaN float is treated as missing everywhere.
//!
//! ## Validation
//!
//! ```no_run
//! use rust_excel_toolkit::ingestion::IngestionOptions;
//! use rust_excel_toolkit::validation::{validate_file, ExpectedType, ValidationSchema};
//!
//! let schema = ValidationSchema::new()
//!     .column("Nome", ExpectedType::Text)
//!     .column("Idade", ExpectedType::Integer)
//!     .column("Salario", ExpectedType::Float);
//!
//! let result = validate_file("people.xlsx", &schema, &IngestionOptions::default());
//! for error in &result.errors {
//!     eprintln!("{error}");
//! }
//! ```
//!
//! ## Analysis
//!
//! ```rust
//! use rust_excel_toolkit::analysis::{basic_stats, detect_outliers, OutlierOptions};
//! use rust_excel_toolkit::types::{DataSet, DataType, Field, Schema, Value};
//!
//! let ds = DataSet::new(
//!     Schema::new(vec![Field::new("A", DataType::Int64)]),
//!     [1, 2, 3, 4, 5, 100].into_iter().map(|v| vec![Value::Int64(v)]).collect(),
//! );
//!
//! let stats = basic_stats(&ds, None);
//! assert_eq!(stats["A"].median, 3.5);
//!
//! let outliers = detect_outliers(&ds, None, &OutlierOptions::zscore(2.0));
//! assert_eq!(outliers["A"], vec![5]);
//! ```
//!
//! ## Modules
//!
//! - [`ingestion`]: unified loading entrypoints, format-specific readers, observers
//! - [`validation`]: typed schema validation, file inspection, empty-cell checks
//! - [`analysis`]: descriptive statistics, outliers, correlations
//! - [`processing`]: aggregations and pivot tables
//! - [`export`]: CSV/Excel/JSON/XML writers and format conversions
//! - [`types`]: schema + in-memory dataset types
//! - [`error`]: error types

pub mod analysis;
pub mod error;
pub mod export;
pub mod ingestion;
pub mod processing;
pub mod types;
pub mod validation;

pub use error::{AnalysisError, AnalysisResult, ExportError, ExportResult, IngestionError, IngestionResult};
