//! Outlier detection by z-score or interquartile range.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::types::DataSet;

use statrs::statistics::Data;

use super::stats::{mean, population_std, quantile};

/// Outlier detection rule.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub enum OutlierMethod {
    /// `|x - mean| / std > threshold`, using the population standard deviation.
    #[default]
    ZScore,
    /// Outside `[Q1 - 1.5·IQR, Q3 + 1.5·IQR]`; the threshold is ignored.
    Iqr,
    /// Any other method name. Reports no outliers.
    Other(String),
}

impl OutlierMethod {
    /// Parse a method name (`"zscore"`, `"iqr"`, case-insensitive). Unknown names map to
    /// [`OutlierMethod::Other`].
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "zscore" | "z-score" | "z" => Self::ZScore,
            "iqr" => Self::Iqr,
            _ => Self::Other(name.to_string()),
        }
    }
}

impl fmt::Display for OutlierMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZScore => f.write_str("zscore"),
            Self::Iqr => f.write_str("iqr"),
            Self::Other(name) => f.write_str(name),
        }
    }
}

/// Options for [`detect_outliers`].
#[derive(Debug, Clone, PartialEq)]
pub struct OutlierOptions {
    pub method: OutlierMethod,
    /// z-score cut-off. Only used by [`OutlierMethod::ZScore`].
    pub threshold: f64,
}

impl Default for OutlierOptions {
    fn default() -> Self {
        Self {
            method: OutlierMethod::ZScore,
            threshold: 3.0,
        }
    }
}

impl OutlierOptions {
    pub fn zscore(threshold: f64) -> Self {
        Self {
            method: OutlierMethod::ZScore,
            threshold,
        }
    }

    pub fn iqr() -> Self {
        Self {
            method: OutlierMethod::Iqr,
            ..Self::default()
        }
    }
}

/// Row positions of outliers per numeric column.
///
/// `columns` defaults to every numeric column; absent or non-numeric names are skipped.
/// Missing values are never flagged and do not contribute to the column's statistics.
/// Positions are 0-based row indices into `dataset`, ascending.
pub fn detect_outliers(
    dataset: &DataSet,
    columns: Option<&[&str]>,
    options: &OutlierOptions,
) -> BTreeMap<String, Vec<usize>> {
    dataset
        .select_numeric_columns(columns)
        .into_iter()
        .map(|(name, idx)| {
            let values = dataset.numeric_column(idx);
            let flagged = match &options.method {
                OutlierMethod::ZScore => zscore_outliers(&values, options.threshold),
                OutlierMethod::Iqr => iqr_outliers(&values),
                OutlierMethod::Other(_) => Vec::new(),
            };
            (name, flagged)
        })
        .collect()
}

fn zscore_outliers(values: &[(usize, f64)], threshold: f64) -> Vec<usize> {
    let xs: Vec<f64> = values.iter().map(|(_, v)| *v).collect();
    let Some(first) = xs.first() else {
        return Vec::new();
    };
    if xs.iter().all(|v| v == first) {
        return Vec::new();
    }
    let Some(mean) = mean(&xs) else {
        return Vec::new();
    };
    let std = population_std(&xs);
    if std == 0.0 {
        return Vec::new();
    }

    values
        .iter()
        .filter(|(_, v)| ((v - mean) / std).abs() > threshold)
        .map(|(row, _)| *row)
        .collect()
}

fn iqr_outliers(values: &[(usize, f64)]) -> Vec<usize> {
    let xs: Vec<f64> = values.iter().map(|(_, v)| *v).collect();
    let mut data = Data::new(xs);
    let (Some(q1), Some(q3)) = (quantile(&mut data, 0.25), quantile(&mut data, 0.75)) else {
        return Vec::new();
    };
    let iqr = q3 - q1;
    let lower = q1 - 1.5 * iqr;
    let upper = q3 + 1.5 * iqr;

    values
        .iter()
        .filter(|(_, v)| *v < lower || *v > upper)
        .map(|(row, _)| *row)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DataType, Field, Schema, Value};

    fn column(name: &str, values: Vec<Value>) -> DataSet {
        DataSet::new(
            Schema::new(vec![Field::new(name, DataType::Float64)]),
            values.into_iter().map(|v| vec![v]).collect(),
        )
    }

    fn ints(xs: &[i64]) -> Vec<Value> {
        xs.iter().map(|x| Value::Int64(*x)).collect()
    }

    #[test]
    fn zscore_flags_extreme_value() {
        let ds = column("A", ints(&[1, 2, 3, 4, 5, 100]));
        let out = detect_outliers(&ds, None, &OutlierOptions::zscore(2.0));
        assert_eq!(out["A"], vec![5]);
    }

    #[test]
    fn default_threshold_is_three() {
        let ds = column("A", ints(&[1, 2, 3, 4, 5, 100]));
        let out = detect_outliers(&ds, None, &OutlierOptions::default());
        assert!(out["A"].is_empty());
    }

    #[test]
    fn iqr_uses_quartile_fences() {
        let ds = column("A", ints(&[1, 2, 3, 4, 5, 100]));
        let out = detect_outliers(&ds, None, &OutlierOptions::iqr());
        assert_eq!(out["A"], vec![5]);
    }

    #[test]
    fn constant_column_has_no_outliers() {
        let ds = column("k", vec![Value::Float64(0.1); 5]);
        for opts in [OutlierOptions::zscore(0.0), OutlierOptions::iqr()] {
            assert!(detect_outliers(&ds, None, &opts)["k"].is_empty());
        }
    }

    #[test]
    fn missing_values_keep_row_positions() {
        let ds = column(
            "x",
            vec![
                Value::Null,
                Value::Int64(1),
                Value::Int64(2),
                Value::Float64(f64::NAN),
                Value::Int64(3),
                Value::Int64(4),
                Value::Int64(500),
            ],
        );
        let out = detect_outliers(&ds, None, &OutlierOptions::iqr());
        assert_eq!(out["x"], vec![6]);
    }

    #[test]
    fn unknown_method_reports_nothing() {
        let ds = column("A", ints(&[1, 2, 3, 4, 5, 100]));
        let opts = OutlierOptions {
            method: OutlierMethod::parse("mad"),
            threshold: 0.0,
        };
        let out = detect_outliers(&ds, None, &opts);
        assert_eq!(out["A"], Vec::<usize>::new());
    }

    #[test]
    fn parse_method_names() {
        assert_eq!(OutlierMethod::parse("ZScore"), OutlierMethod::ZScore);
        assert_eq!(OutlierMethod::parse("iqr"), OutlierMethod::Iqr);
        assert_eq!(OutlierMethod::parse("mad"), OutlierMethod::Other("mad".to_string()));
    }

    #[test]
    fn text_columns_are_skipped() {
        let ds = DataSet::new(
            Schema::new(vec![Field::new("name", DataType::Utf8)]),
            vec![vec![Value::Utf8("a".to_string())]],
        );
        assert!(detect_outliers(&ds, Some(&["name"]), &OutlierOptions::default()).is_empty());
    }
}
