//! Pairwise correlation matrices.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use statrs::statistics::{Data, OrderStatistics, RankTieBreaker, Statistics};

use crate::error::AnalysisError;
use crate::types::DataSet;

/// Correlation coefficient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum CorrelationMethod {
    #[default]
    Pearson,
    /// Pearson over average ranks.
    Spearman,
    /// Kendall tau-b.
    Kendall,
}

impl FromStr for CorrelationMethod {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pearson" => Ok(Self::Pearson),
            "spearman" => Ok(Self::Spearman),
            "kendall" => Ok(Self::Kendall),
            other => Err(AnalysisError::InvalidArgument {
                message: format!("unknown correlation method '{other}'"),
            }),
        }
    }
}

impl fmt::Display for CorrelationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pearson => "pearson",
            Self::Spearman => "spearman",
            Self::Kendall => "kendall",
        })
    }
}

/// Square, symmetric correlation matrix. Undefined coefficients are NaN.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    /// Row and column labels, in selection order.
    pub columns: Vec<String>,
    /// `values[i][j]` is the coefficient between `columns[i]` and `columns[j]`.
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    /// Coefficient between two named columns.
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        Some(self.values[i][j])
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Correlation matrix over numeric columns.
///
/// `columns` defaults to every numeric column; absent or non-numeric names are skipped.
/// Each pair uses only the rows where both values are present. The diagonal is 1.0 for a
/// column with at least two distinct values and NaN otherwise.
pub fn correlations(dataset: &DataSet, columns: Option<&[&str]>, method: CorrelationMethod) -> CorrelationMatrix {
    let selected = dataset.select_numeric_columns(columns);
    let cells: Vec<Vec<Option<f64>>> = selected
        .iter()
        .map(|(_, idx)| dataset.column_values(*idx).map(|v| v.as_f64()).collect())
        .collect();

    let n = selected.len();
    let mut values = vec![vec![f64::NAN; n]; n];
    for i in 0..n {
        for j in i..n {
            let (xs, ys): (Vec<f64>, Vec<f64>) = cells[i]
                .iter()
                .zip(&cells[j])
                .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
                .unzip();

            let r = if i == j {
                if has_spread(&xs) { 1.0 } else { f64::NAN }
            } else {
                match method {
                    CorrelationMethod::Pearson => pearson(&xs, &ys),
                    CorrelationMethod::Spearman => pearson(&average_ranks(&xs), &average_ranks(&ys)),
                    CorrelationMethod::Kendall => kendall_tau_b(&xs, &ys),
                }
            };
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    CorrelationMatrix {
        columns: selected.into_iter().map(|(name, _)| name).collect(),
        values,
    }
}

fn has_spread(xs: &[f64]) -> bool {
    xs.first().is_some_and(|first| xs.iter().any(|v| v != first))
}

fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    if xs.len() < 2 || !has_spread(xs) || !has_spread(ys) {
        return f64::NAN;
    }
    let cov = xs.iter().covariance(ys.iter());
    (cov / (xs.iter().std_dev() * ys.iter().std_dev())).clamp(-1.0, 1.0)
}

/// 1-based ranks; tied values share the mean of the ranks they span.
fn average_ranks(xs: &[f64]) -> Vec<f64> {
    Data::new(xs.to_vec()).ranks(RankTieBreaker::Average)
}

fn kendall_tau_b(xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len();
    if n < 2 {
        return f64::NAN;
    }

    let mut concordant: i64 = 0;
    let mut discordant: i64 = 0;
    let mut ties_x: i64 = 0;
    let mut ties_y: i64 = 0;
    for i in 0..n {
        for j in (i + 1)..n {
            let dx = xs[i].partial_cmp(&xs[j]).unwrap_or(Ordering::Equal);
            let dy = ys[i].partial_cmp(&ys[j]).unwrap_or(Ordering::Equal);
            if dx == Ordering::Equal {
                ties_x += 1;
            }
            if dy == Ordering::Equal {
                ties_y += 1;
            }
            if dx == Ordering::Equal || dy == Ordering::Equal {
                continue;
            }
            if dx == dy {
                concordant += 1;
            } else {
                discordant += 1;
            }
        }
    }

    let pairs = (n * (n - 1) / 2) as i64;
    let denom = ((pairs - ties_x) as f64 * (pairs - ties_y) as f64).sqrt();
    if denom == 0.0 {
        return f64::NAN;
    }
    (concordant - discordant) as f64 / denom
}
