//! Typed schema validation.
//!
//! [`validate_dataset`] checks a [`DataSet`] against a [`ValidationSchema`] (column name →
//! [`ExpectedType`]). Structural problems never abort the pass: every schema entry is checked
//! and each failing column contributes one message to [`ValidationResult::errors`].
//!
//! [`validate_file`] loads a file first (types inferred, see
//! [`crate::ingestion::load_from_path`]). A load failure collapses the result into a single
//! error.
//!
//! ```rust
//! use rust_excel_toolkit::types::{DataSet, DataType, Field, Schema, Value};
//! use rust_excel_toolkit::validation::{validate_dataset, ExpectedType, ValidationSchema};
//!
//! let ds = DataSet::new(
//!     Schema::new(vec![
//!         Field::new("Idade", DataType::Float64),
//!         Field::new("Nome", DataType::Utf8),
//!     ]),
//!     vec![
//!         vec![Value::Float64(30.0), Value::Utf8("Alice".to_string())],
//!         vec![Value::Null, Value::Utf8("Bob".to_string())],
//!     ],
//! );
//!
//! let schema = ValidationSchema::new()
//!     .column("Idade", ExpectedType::Integer)
//!     .column("Nome", ExpectedType::Text)
//!     .column("Departamento", ExpectedType::Text);
//!
//! let result = validate_dataset(&ds, &schema);
//! assert!(!result.valid);
//! assert_eq!(result.errors, vec!["missing column: Departamento".to_string()]);
//! ```

mod coerce;
mod inspect;
mod schema;

use std::path::Path;

use serde::Serialize;

use crate::ingestion::{load_from_path, IngestionOptions, Operation, Outcome};
use crate::types::DataSet;

pub use coerce::{coerce, CoercionError};
pub use inspect::{
    inspect_dataset, inspect_file, validate_empty_cells, ColumnEmptiness, EmptyCellReport, FileValidation,
    TableInfo, DEFAULT_EMPTY_THRESHOLD,
};
pub use schema::{ExpectedType, ValidationSchema};

/// Outcome of a validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    /// `true` when no errors were recorded.
    pub valid: bool,
    /// Human-readable messages, in schema order.
    pub errors: Vec<String>,
}

impl ValidationResult {
    fn ok() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
        }
    }

    fn push(&mut self, message: String) {
        self.valid = false;
        self.errors.push(message);
    }

    /// A result holding a single failure message.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            errors: vec![message.into()],
        }
    }
}

/// Validate `dataset` against `schema`.
///
/// For each schema entry, in insertion order:
///
/// - a column absent from the dataset records `missing column: <name>`
/// - otherwise every non-missing value is checked with [`coerce`]; the first failure records
///   `invalid type for column '<name>': expected <type>` (one message per column)
///
/// An empty schema is always valid. The dataset is not modified.
pub fn validate_dataset(dataset: &DataSet, schema: &ValidationSchema) -> ValidationResult {
    let mut result = ValidationResult::ok();

    for (name, expected) in schema.iter() {
        let Some(mut values) = dataset.column(name) else {
            result.push(format!("missing column: {name}"));
            continue;
        };

        if values.any(|v| coerce(v, expected).is_err()) {
            result.push(format!("invalid type for column '{name}': expected {expected}"));
        }
    }

    result
}

/// Load `path` and validate it against `schema`.
///
/// The file is loaded without a schema so each cell keeps its own kind. If loading fails,
/// the result is invalid with exactly one `failed to load table: <cause>` error and no
/// column checks run.
///
/// An observer on `options` sees the load, then an [`Outcome::Validated`] with the verdict.
pub fn validate_file(path: impl AsRef<Path>, schema: &ValidationSchema, options: &IngestionOptions) -> ValidationResult {
    let path = path.as_ref();
    let result = match load_from_path(path, options) {
        Ok(ds) => validate_dataset(&ds, schema),
        Err(e) => ValidationResult::failed(format!("failed to load table: {e}")),
    };
    options.notify_success(
        &options.context(Operation::Validate, path, true),
        Outcome::Validated {
            valid: result.valid,
            errors: result.errors.len(),
        },
    );
    result
}
