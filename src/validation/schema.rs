//! Expected column types for validation.

use std::fmt;

use serde::Serialize;

use crate::types::DataType;

/// Logical type a column is expected to hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ExpectedType {
    /// Numeric with zero fractional part (`30` and `30.0` both qualify).
    Integer,
    /// Any numeric value (integers are accepted as floats).
    Float,
    /// String values.
    Text,
    /// The value's own runtime kind must equal this data type.
    Exact(DataType),
}

impl ExpectedType {
    /// Parse a type name.
    ///
    /// Accepts `int`/`integer`, `float`/`number`, `str`/`string`/`text` (case-insensitive)
    /// and the data type names `Int64`, `Float64`, `Bool`, `Utf8` for exact checks.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "int" | "integer" => Some(Self::Integer),
            "float" | "number" => Some(Self::Float),
            "str" | "string" | "text" => Some(Self::Text),
            "int64" => Some(Self::Exact(DataType::Int64)),
            "float64" => Some(Self::Exact(DataType::Float64)),
            "bool" | "boolean" => Some(Self::Exact(DataType::Bool)),
            "utf8" => Some(Self::Exact(DataType::Utf8)),
            _ => None,
        }
    }
}

impl fmt::Display for ExpectedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer => f.write_str("Integer"),
            Self::Float => f.write_str("Float"),
            Self::Text => f.write_str("Text"),
            Self::Exact(dt) => f.write_str(dt.name()),
        }
    }
}

/// Insertion-ordered mapping of column name to [`ExpectedType`].
///
/// Names are unique: adding an existing name replaces its type in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationSchema {
    columns: Vec<(String, ExpectedType)>,
}

impl ValidationSchema {
    /// Create an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`Self::insert`].
    pub fn column(mut self, name: impl Into<String>, expected: ExpectedType) -> Self {
        self.insert(name, expected);
        self
    }

    /// Add or replace a column expectation.
    pub fn insert(&mut self, name: impl Into<String>, expected: ExpectedType) {
        let name = name.into();
        match self.columns.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = expected,
            None => self.columns.push((name, expected)),
        }
    }

    /// Expected type for `name`, if declared.
    pub fn get(&self, name: &str) -> Option<ExpectedType> {
        self.columns.iter().find(|(n, _)| n == name).map(|(_, t)| *t)
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, ExpectedType)> {
        self.columns.iter().map(|(n, t)| (n.as_str(), *t))
    }

    /// Number of declared columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns `true` if no columns are declared.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, ExpectedType)> for ValidationSchema {
    fn from_iter<I: IntoIterator<Item = (S, ExpectedType)>>(iter: I) -> Self {
        let mut schema = Self::new();
        for (name, expected) in iter {
            schema.insert(name, expected);
        }
        schema
    }
}
