//! Statistical summaries over numeric columns.
//!
//! A column is numeric when every non-missing value is `Int64` or `Float64` (booleans are not
//! numbers here). Missing values (`Null`, NaN) are excluded from every computation. Pivot
//! tables live in [`crate::processing`].
//!
//! - [`basic_stats`]: count/mean/median/mode/std/min/max/quartiles per column
//! - [`detect_outliers`]: z-score or IQR outlier row positions per column
//! - [`correlations`]: Pearson/Spearman/Kendall correlation matrix
//!
//! ```rust
//! use rust_excel_toolkit::analysis::{correlations, detect_outliers, CorrelationMethod, OutlierOptions};
//! use rust_excel_toolkit::types::{DataSet, DataType, Field, Schema, Value};
//!
//! let ds = DataSet::new(
//!     Schema::new(vec![Field::new("A", DataType::Int64), Field::new("B", DataType::Int64)]),
//!     [(1, 10), (2, 20), (3, 30), (4, 40), (5, 50), (100, 60)]
//!         .into_iter()
//!         .map(|(a, b)| vec![Value::Int64(a), Value::Int64(b)])
//!         .collect(),
//! );
//!
//! let outliers = detect_outliers(&ds, Some(&["A"]), &OutlierOptions::iqr());
//! assert_eq!(outliers["A"], vec![5]);
//!
//! let m = correlations(&ds, None, CorrelationMethod::Spearman);
//! assert!((m.get("A", "B").unwrap() - 1.0).abs() < 1e-12);
//! ```

mod correlation;
mod outliers;
pub(crate) mod stats;

pub use correlation::{correlations, CorrelationMatrix, CorrelationMethod};
pub use outliers::{detect_outliers, OutlierMethod, OutlierOptions};
pub use stats::{basic_stats, ColumnStats};
