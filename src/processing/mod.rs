//! In-memory data transformations.
//!
//! The processing layer operates on [`crate::types::DataSet`] values produced by ingestion.
//!
//! - [`reduce()`] / [`aggregate()`]: column aggregations (count/sum/min/max/mean/median/std)
//! - [`pivot()`]: group rows by key columns and aggregate value columns
//!
//! ## Example: pivot with spread columns
//!
//! ```rust
//! use rust_excel_toolkit::processing::{pivot, reduce, AggFunc, PivotOptions};
//! use rust_excel_toolkit::types::{DataSet, DataType, Field, Schema, Value};
//!
//! let schema = Schema::new(vec![
//!     Field::new("dept", DataType::Utf8),
//!     Field::new("year", DataType::Int64),
//!     Field::new("salary", DataType::Float64),
//! ]);
//! let ds = DataSet::new(
//!     schema,
//!     vec![
//!         vec![Value::Utf8("ops".to_string()), Value::Int64(2023), Value::Float64(10.0)],
//!         vec![Value::Utf8("ops".to_string()), Value::Int64(2024), Value::Float64(20.0)],
//!         vec![Value::Utf8("dev".to_string()), Value::Int64(2024), Value::Null],
//!     ],
//! );
//!
//! let table = pivot(
//!     &ds,
//!     &PivotOptions::new(["dept"]).columns(["year"]).values(["salary"]).agg(AggFunc::Mean),
//! )
//! .unwrap();
//! let names: Vec<&str> = table.schema.field_names().collect();
//! assert_eq!(names, vec!["dept", "salary_2023", "salary_2024"]);
//! // "dev" has no salary at all, so its row is dropped.
//! assert_eq!(table.row_count(), 1);
//!
//! assert_eq!(reduce(&ds, "salary", AggFunc::Sum), Some(Value::Float64(30.0)));
//! ```

pub mod pivot;
pub mod reduce;

pub use pivot::{pivot, PivotOptions};
pub use reduce::{aggregate, reduce, AggFunc};
