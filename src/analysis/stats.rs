//! Descriptive statistics over numeric columns.

use std::collections::BTreeMap;

use serde::Serialize;
use statrs::statistics::{Data, OrderStatistics, Statistics};

use crate::types::DataSet;

/// Summary statistics for one numeric column (missing values excluded).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColumnStats {
    /// Number of non-missing values.
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    /// Most frequent value (smallest on ties); `None` when the column has no values.
    pub mode: Option<f64>,
    /// Sample standard deviation (N-1 denominator); 0.0 with fewer than two values.
    pub std: f64,
    pub min: f64,
    pub max: f64,
    /// 25th percentile.
    pub q1: f64,
    /// 75th percentile.
    pub q3: f64,
}

impl ColumnStats {
    /// Compute statistics for `values`. Order does not matter; NaNs must already be removed.
    pub fn from_values(values: &[f64]) -> Self {
        let Some(mean) = mean(values) else {
            return Self {
                count: 0,
                mean: f64::NAN,
                median: f64::NAN,
                mode: None,
                std: f64::NAN,
                min: f64::NAN,
                max: f64::NAN,
                q1: f64::NAN,
                q3: f64::NAN,
            };
        };

        let n = values.len();
        let mut data = Data::new(values.to_vec());
        Self {
            count: n,
            mean,
            median: quantile(&mut data, 0.5).unwrap_or(f64::NAN),
            mode: mode(values),
            std: sample_std(values),
            min: data.order_statistic(1),
            max: data.order_statistic(n),
            q1: quantile(&mut data, 0.25).unwrap_or(f64::NAN),
            q3: quantile(&mut data, 0.75).unwrap_or(f64::NAN),
        }
    }
}

/// Descriptive statistics for numeric columns.
///
/// `columns` defaults to every numeric column. Requested columns that are absent or hold
/// non-numeric values are skipped without error.
///
/// ```rust
/// use rust_excel_toolkit::analysis::basic_stats;
/// use rust_excel_toolkit::types::{DataSet, DataType, Field, Schema, Value};
///
/// let ds = DataSet::new(
///     Schema::new(vec![Field::new("B", DataType::Int64)]),
///     [10, 20, 30, 40, 50, 60].into_iter().map(|v| vec![Value::Int64(v)]).collect(),
/// );
/// let stats = basic_stats(&ds, None);
/// assert_eq!(stats["B"].mean, 35.0);
/// assert_eq!(stats["B"].q1, 22.5);
/// assert_eq!(stats["B"].q3, 47.5);
/// ```
pub fn basic_stats(dataset: &DataSet, columns: Option<&[&str]>) -> BTreeMap<String, ColumnStats> {
    dataset
        .select_numeric_columns(columns)
        .into_iter()
        .map(|(name, idx)| {
            let values: Vec<f64> = dataset.numeric_column(idx).into_iter().map(|(_, v)| v).collect();
            (name, ColumnStats::from_values(&values))
        })
        .collect()
}

pub(crate) fn mean(values: &[f64]) -> Option<f64> {
    (!values.is_empty()).then(|| values.iter().mean())
}

/// Sample standard deviation; 0.0 for fewer than two values.
pub(crate) fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    values.iter().std_dev()
}

/// Population standard deviation; 0.0 for an empty slice.
pub(crate) fn population_std(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().population_std_dev()
}

pub(crate) fn median(values: &[f64]) -> Option<f64> {
    quantile(&mut Data::new(values.to_vec()), 0.5)
}

/// Percentile `p` in `[0, 1]`, linear between the closest order statistics (`pos = p·(n-1)`).
pub(crate) fn quantile(data: &mut Data<Vec<f64>>, p: f64) -> Option<f64> {
    let n = data.len();
    if n == 0 {
        return None;
    }
    let pos = p.clamp(0.0, 1.0) * (n - 1) as f64;
    let lo = pos.floor();
    // order statistics are 1-based
    let below = data.order_statistic(lo as usize + 1);
    let above = data.order_statistic(pos.ceil() as usize + 1);
    Some(below + (above - below) * (pos - lo))
}

fn mode(values: &[f64]) -> Option<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mut best: Option<(f64, usize)> = None;
    for run in sorted.chunk_by(|a, b| a == b) {
        // Strictly greater keeps the smallest value on ties.
        if best.is_none_or(|(_, n)| run.len() > n) {
            best = Some((run[0], run.len()));
        }
    }
    best.map(|(v, _)| v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DataType, Field, Schema, Value};

    fn sample() -> DataSet {
        let a = [1, 2, 3, 4, 5, 100];
        let b = [10, 20, 30, 40, 50, 60];
        let c = ["a", "b", "c", "d", "e", "f"];
        let d = [1.1, 2.2, 3.3, 4.4, 5.5, 6.6];
        let schema = Schema::new(vec![
            Field::new("A", DataType::Int64),
            Field::new("B", DataType::Int64),
            Field::new("C", DataType::Utf8),
            Field::new("D", DataType::Float64),
        ]);
        let rows = (0..6)
            .map(|i| {
                vec![
                    Value::Int64(a[i]),
                    Value::Int64(b[i]),
                    Value::Utf8(c[i].to_string()),
                    Value::Float64(d[i]),
                ]
            })
            .collect();
        DataSet::new(schema, rows)
    }

    #[test]
    fn symmetric_set_is_exact() {
        let stats = basic_stats(&sample(), Some(&["B"]));
        let b = stats["B"];
        assert_eq!(b.count, 6);
        assert_eq!(b.mean, 35.0);
        assert_eq!(b.median, 35.0);
        assert_eq!(b.min, 10.0);
        assert_eq!(b.max, 60.0);
        assert_eq!(b.q1, 22.5);
        assert_eq!(b.q3, 47.5);
        assert_eq!(b.mode, Some(10.0));
    }

    #[test]
    fn default_selection_skips_text() {
        let stats = basic_stats(&sample(), None);
        assert_eq!(stats.keys().collect::<Vec<_>>(), vec!["A", "B", "D"]);
        let a = stats["A"];
        assert!((a.mean - 19.1667).abs() < 1e-3);
        assert_eq!(a.median, 3.5);
        assert_eq!(a.min, 1.0);
        assert_eq!(a.max, 100.0);
    }

    #[test]
    fn explicit_non_numeric_column_is_skipped() {
        let stats = basic_stats(&sample(), Some(&["C", "missing", "D"]));
        assert_eq!(stats.keys().collect::<Vec<_>>(), vec!["D"]);
    }

    #[test]
    fn sample_std_uses_n_minus_one() {
        let s = ColumnStats::from_values(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        // Population std of this set is exactly 2; sample std is sqrt(32 / 7).
        assert!((s.std - (32.0_f64 / 7.0).sqrt()).abs() < 1e-12);
        assert_eq!(s.mode, Some(4.0));
    }

    #[test]
    fn all_missing_column_has_no_mode() {
        let ds = DataSet::new(
            Schema::new(vec![Field::new("x", DataType::Float64)]),
            vec![vec![Value::Null], vec![Value::Float64(f64::NAN)]],
        );
        let stats = basic_stats(&ds, None);
        let x = stats["x"];
        assert_eq!(x.count, 0);
        assert_eq!(x.mode, None);
        assert!(x.mean.is_nan());
    }

    #[test]
    fn single_value_has_zero_std() {
        let s = ColumnStats::from_values(&[7.0]);
        assert_eq!(s.std, 0.0);
        assert_eq!(s.q1, 7.0);
        assert_eq!(s.q3, 7.0);
    }

    #[test]
    fn mode_prefers_smallest_on_tie() {
        assert_eq!(mode(&[3.0, 1.0, 2.0, 3.0, 1.0]), Some(1.0));
        assert_eq!(mode(&[]), None);
    }

    #[test]
    fn quantile_interpolates_between_order_statistics() {
        let mut data = Data::new(vec![40.0, 10.0, 30.0, 20.0]);
        assert_eq!(quantile(&mut data, 0.0), Some(10.0));
        assert_eq!(quantile(&mut data, 0.5), Some(25.0));
        assert_eq!(quantile(&mut data, 0.75), Some(32.5));
        assert_eq!(quantile(&mut Data::new(Vec::new()), 0.5), None);
    }

    #[test]
    fn repeated_calls_are_identical() {
        let ds = sample();
        assert_eq!(basic_stats(&ds, None), basic_stats(&ds, None));
    }
}
