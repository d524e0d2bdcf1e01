//! Column aggregations for [`crate::types::DataSet`].

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::analysis::stats::{mean, median, sample_std};
use crate::error::AnalysisError;
use crate::types::{DataSet, Value};

/// Built-in aggregation functions over a group of values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum AggFunc {
    /// Count non-missing values.
    Count,
    /// Sum numeric values, ignoring missing ones.
    Sum,
    /// Minimum numeric value.
    Min,
    /// Maximum numeric value.
    Max,
    /// Arithmetic mean.
    #[default]
    Mean,
    /// Median (linear interpolation between the two middle values).
    Median,
    /// Sample standard deviation.
    Std,
}

impl FromStr for AggFunc {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "count" => Ok(Self::Count),
            "sum" => Ok(Self::Sum),
            "min" => Ok(Self::Min),
            "max" => Ok(Self::Max),
            "mean" | "avg" => Ok(Self::Mean),
            "median" => Ok(Self::Median),
            "std" => Ok(Self::Std),
            other => Err(AnalysisError::InvalidArgument {
                message: format!("unknown aggregation '{other}'"),
            }),
        }
    }
}

impl fmt::Display for AggFunc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Count => "count",
            Self::Sum => "sum",
            Self::Min => "min",
            Self::Max => "max",
            Self::Mean => "mean",
            Self::Median => "median",
            Self::Std => "std",
        })
    }
}

/// Aggregate a group of values.
///
/// - `Count` returns `Int64` with the number of non-missing values (any kind).
/// - The other functions only look at numeric values and return [`Value::Null`] when there
///   are none. `Sum`/`Min`/`Max` stay `Int64` when every numeric input is `Int64`;
///   `Mean`/`Median`/`Std` always return `Float64`.
pub fn aggregate<'a>(values: impl IntoIterator<Item = &'a Value>, func: AggFunc) -> Value {
    let mut count: i64 = 0;
    let mut ints: Vec<i64> = Vec::new();
    let mut floats: Vec<f64> = Vec::new();
    let mut all_int = true;

    for v in values {
        if v.is_missing() {
            continue;
        }
        count += 1;
        match v {
            Value::Int64(i) => {
                ints.push(*i);
                floats.push(*i as f64);
            }
            Value::Float64(f) => {
                all_int = false;
                floats.push(*f);
            }
            _ => {}
        }
    }

    if func == AggFunc::Count {
        return Value::Int64(count);
    }
    if floats.is_empty() {
        return Value::Null;
    }

    match func {
        AggFunc::Sum if all_int => ints
            .iter()
            .try_fold(0_i64, |acc, v| acc.checked_add(*v))
            .map(Value::Int64)
            .unwrap_or_else(|| Value::Float64(floats.iter().sum())),
        AggFunc::Sum => Value::Float64(floats.iter().sum()),
        AggFunc::Min if all_int => ints.iter().min().map_or(Value::Null, |v| Value::Int64(*v)),
        AggFunc::Min => Value::Float64(floats.iter().copied().fold(f64::INFINITY, f64::min)),
        AggFunc::Max if all_int => ints.iter().max().map_or(Value::Null, |v| Value::Int64(*v)),
        AggFunc::Max => Value::Float64(floats.iter().copied().fold(f64::NEG_INFINITY, f64::max)),
        AggFunc::Mean => mean(&floats).map_or(Value::Null, Value::Float64),
        AggFunc::Median => median(&floats).map_or(Value::Null, Value::Float64),
        AggFunc::Std => Value::Float64(sample_std(&floats)),
        AggFunc::Count => Value::Int64(count),
    }
}

/// Reduce a column using a built-in [`AggFunc`].
///
/// - Returns `None` if `column` does not exist in the schema.
/// - For `Count`, returns `Some(Value::Int64(row_count))` (missing values included).
/// - For the other functions, returns `Some(Value::Null)` if there are no numeric values.
pub fn reduce(dataset: &DataSet, column: &str, func: AggFunc) -> Option<Value> {
    let idx = dataset.schema.index_of(column)?;
    match func {
        AggFunc::Count => Some(Value::Int64(dataset.row_count() as i64)),
        _ => Some(aggregate(dataset.column_values(idx), func)),
    }
}
