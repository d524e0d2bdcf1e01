//! Per-value type coercion checks.

use thiserror::Error;

use crate::types::{DataType, Value};

use super::schema::ExpectedType;

/// Why a single value does not satisfy an [`ExpectedType`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoercionError {
    /// The value is not numeric.
    #[error("expected a number, found {found}")]
    NotNumeric { found: DataType },
    /// The value is numeric but has a fractional part (or is infinite).
    #[error("expected an integral number, found {value}")]
    NotIntegral { value: f64 },
    /// The value is not a string.
    #[error("expected text, found {found}")]
    NotText { found: DataType },
    /// The value's runtime kind differs from the required one.
    #[error("expected {expected}, found {found}")]
    KindMismatch { expected: DataType, found: DataType },
}

/// Check one value against `expected`.
///
/// Missing values (`Null`, NaN) always pass; callers decide whether absence matters.
pub fn coerce(value: &Value, expected: ExpectedType) -> Result<(), CoercionError> {
    let Some(found) = value.data_type() else {
        return Ok(());
    };
    if value.is_missing() {
        return Ok(());
    }

    match expected {
        ExpectedType::Integer => match value {
            Value::Int64(_) => Ok(()),
            Value::Float64(v) if v.fract() == 0.0 => Ok(()),
            Value::Float64(v) => Err(CoercionError::NotIntegral { value: *v }),
            _ => Err(CoercionError::NotNumeric { found }),
        },
        ExpectedType::Float => match value {
            Value::Int64(_) | Value::Float64(_) => Ok(()),
            _ => Err(CoercionError::NotNumeric { found }),
        },
        ExpectedType::Text => match value {
            Value::Utf8(_) => Ok(()),
            _ => Err(CoercionError::NotText { found }),
        },
        ExpectedType::Exact(dt) if dt == found => Ok(()),
        ExpectedType::Exact(dt) => Err(CoercionError::KindMismatch { expected: dt, found }),
    }
}
