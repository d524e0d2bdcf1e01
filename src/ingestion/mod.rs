//! Table loading entrypoints and implementations.
//!
//! Most callers should use [`load_from_path`] (schema-less, types inferred) or
//! [`ingest_from_path`] (schema-driven), both from [`unified`], which:
//!
//! - auto-detect format by file extension (or you can override via [`IngestionOptions`])
//! - load into an in-memory [`crate::types::DataSet`]
//! - optionally report success/failure/alerts to an [`IngestionObserver`]
//!
//! Format-specific functions are also available under:
//! - [`csv`]
//! - [`json`]
//! - `excel` (Cargo feature `excel`)

pub mod csv;
#[cfg(feature = "excel")]
pub mod excel;
mod infer;
pub mod json;
pub mod observability;
pub mod unified;

pub use observability::{
    CompositeObserver, FileObserver, IngestionContext, IngestionObserver, IngestionSeverity, Operation, Outcome,
    StdErrObserver,
};
pub use unified::{
    ingest_from_path, load_from_path, resolve_format, ExcelSheetSelection, IngestionFormat, IngestionOptions,
};
