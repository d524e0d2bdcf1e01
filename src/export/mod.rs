//! Writers and format conversions.
//!
//! - [`write_csv`]: CSV with a header row
//! - [`write_excel`]: single-sheet `.xlsx` (feature `excel`)
//! - [`to_json_records`] / [`to_json_columns`] / [`write_json`]: table as JSON
//! - [`write_xml`]: one `<record>` element per row under a named root
//! - [`write_report_json`]: any serializable report (validation results, statistics)
//! - conversions between CSV, JSON and Excel in [`convert`]
//!
//! All writers return [`crate::error::ExportError`]; a failing source load inside a conversion
//! surfaces as [`crate::error::ExportError::Ingestion`].

pub mod convert;
pub mod csv;
#[cfg(feature = "excel")]
pub mod excel;
pub mod json;
pub mod xml;

#[cfg(feature = "excel")]
pub use convert::{csv_to_excel, excel_to_csv, excel_to_json, json_to_excel};
pub use convert::{csv_to_json, json_to_csv};
pub use self::csv::{write_csv, write_csv_to_writer};
#[cfg(feature = "excel")]
pub use excel::{write_excel, DEFAULT_SHEET_NAME};
pub use json::{to_json_columns, to_json_records, write_json, write_report_json, JsonOrient};
pub use xml::{write_xml, write_xml_to_writer, DEFAULT_ROOT_NAME};
