//! Core data model types.
//!
//! Every file the crate reads ends up as an in-memory [`DataSet`]: a [`Schema`] (a list of
//! typed [`Field`]s) plus row-major [`Value`] storage. Validation and analysis only ever see
//! this type.

use std::fmt;

use serde::Serialize;

/// Logical data type for a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DataType {
    /// 64-bit signed integer.
    Int64,
    /// 64-bit floating point number.
    Float64,
    /// Boolean.
    Bool,
    /// UTF-8 string.
    Utf8,
}

impl DataType {
    /// Stable name used in messages and reports.
    pub fn name(self) -> &'static str {
        match self {
            Self::Int64 => "Int64",
            Self::Float64 => "Float64",
            Self::Bool => "Bool",
            Self::Utf8 => "Utf8",
        }
    }

    /// Returns `true` for `Int64` and `Float64`.
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Int64 | Self::Float64)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single named, typed field in a [`Schema`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Field/column name.
    pub name: String,
    /// Field data type.
    pub data_type: DataType,
}

impl Field {
    /// Create a new field.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// A list of fields describing the shape of a [`DataSet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    /// Ordered list of fields.
    pub fields: Vec<Field>,
}

impl Schema {
    /// Create a new schema from fields.
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Iterate field names in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Returns the index of a field by name, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }
}

/// A single typed value in a [`DataSet`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Missing/empty value.
    Null,
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit float.
    Float64(f64),
    /// Boolean.
    Bool(bool),
    /// UTF-8 string.
    Utf8(String),
}

impl Value {
    /// Returns `true` for [`Value::Null`] and for a NaN float.
    pub fn is_missing(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Float64(v) => v.is_nan(),
            _ => false,
        }
    }

    /// Numeric view of the value. `None` for missing, bool and text values.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int64(v) => Some(*v as f64),
            Value::Float64(v) if !v.is_nan() => Some(*v),
            _ => None,
        }
    }

    /// The runtime kind of the value, or `None` for [`Value::Null`].
    pub fn data_type(&self) -> Option<DataType> {
        match self {
            Value::Null => None,
            Value::Int64(_) => Some(DataType::Int64),
            Value::Float64(_) => Some(DataType::Float64),
            Value::Bool(_) => Some(DataType::Bool),
            Value::Utf8(_) => Some(DataType::Utf8),
        }
    }
}

impl fmt::Display for Value {
    /// Renders the value the way it is written to CSV cells; `Null` renders empty.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Int64(v) => write!(f, "{v}"),
            Value::Float64(v) if v.is_nan() => Ok(()),
            Value::Float64(v) => write!(f, "{v}"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Utf8(s) => f.write_str(s),
        }
    }
}

/// In-memory tabular dataset.
///
/// Rows are stored as `Vec<Vec<Value>>` in the same order as the [`Schema`] fields.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSet {
    /// Schema describing row shape.
    pub schema: Schema,
    /// Row-major value storage.
    pub rows: Vec<Vec<Value>>,
}

impl DataSet {
    /// Create a dataset from schema and rows.
    pub fn new(schema: Schema, rows: Vec<Vec<Value>>) -> Self {
        Self { schema, rows }
    }

    /// Number of rows in the dataset.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns in the dataset.
    pub fn column_count(&self) -> usize {
        self.schema.fields.len()
    }

    /// Iterate the values of column `idx`, top to bottom.
    ///
    /// Short rows yield [`Value::Null`] for the missing trailing cells.
    pub fn column_values(&self, idx: usize) -> impl Iterator<Item = &Value> + '_ {
        self.rows
            .iter()
            .map(move |row| row.get(idx).unwrap_or(&Value::Null))
    }

    /// Iterate the values of the column called `name`, or `None` if there is no such column.
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &Value> + '_> {
        self.schema.index_of(name).map(|idx| self.column_values(idx))
    }

    /// Non-missing numeric values of column `idx`, paired with their row index.
    pub fn numeric_column(&self, idx: usize) -> Vec<(usize, f64)> {
        self.column_values(idx)
            .enumerate()
            .filter_map(|(row, v)| v.as_f64().map(|x| (row, x)))
            .collect()
    }

    /// Returns `true` if every value of column `idx` is numeric or missing.
    ///
    /// A column that is entirely missing counts as numeric.
    pub fn is_numeric_column(&self, idx: usize) -> bool {
        self.column_values(idx)
            .all(|v| v.is_missing() || v.as_f64().is_some())
    }

    /// Names of all numeric columns, in schema order.
    pub fn numeric_column_names(&self) -> Vec<String> {
        self.schema
            .fields
            .iter()
            .enumerate()
            .filter(|(idx, _)| self.is_numeric_column(*idx))
            .map(|(_, f)| f.name.clone())
            .collect()
    }

    /// Resolve an optional column selection to `(name, index)` pairs of numeric columns.
    ///
    /// Names that are absent or not numeric are skipped; duplicates keep their first position.
    pub fn select_numeric_columns(&self, columns: Option<&[&str]>) -> Vec<(String, usize)> {
        let names: Vec<String> = match columns {
            Some(cols) => cols.iter().map(|c| c.to_string()).collect(),
            None => self.numeric_column_names(),
        };

        let mut out: Vec<(String, usize)> = Vec::with_capacity(names.len());
        for name in names {
            if out.iter().any(|(n, _)| *n == name) {
                continue;
            }
            if let Some(idx) = self.schema.index_of(&name) {
                if self.is_numeric_column(idx) {
                    out.push((name, idx));
                }
            }
        }
        out
    }
}
