//! Pivot tables: group by key columns and aggregate value columns.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use crate::error::{AnalysisError, AnalysisResult};
use crate::types::{DataSet, DataType, Field, Schema, Value};

use super::reduce::{aggregate, AggFunc};

/// Options for [`pivot`].
#[derive(Debug, Clone, PartialEq)]
pub struct PivotOptions {
    /// Row key columns. Must not be empty.
    pub index: Vec<String>,
    /// Columns whose distinct values are spread into output columns.
    pub columns: Vec<String>,
    /// Columns to aggregate. `None` means every numeric column not used as a key.
    pub values: Option<Vec<String>>,
    pub agg: AggFunc,
}

impl PivotOptions {
    pub fn new<I, S>(index: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            index: index.into_iter().map(Into::into).collect(),
            columns: Vec::new(),
            values: None,
            agg: AggFunc::Mean,
        }
    }

    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn agg(mut self, agg: AggFunc) -> Self {
        self.agg = agg;
        self
    }
}

/// Ordering wrapper for group keys: numbers (by exact value), then booleans, then text.
///
/// `Int64` and `Float64` keys compare without rounding through `f64`, and `-0.0` equals `0.0`,
/// so numerically equal keys always land in the same group.
#[derive(Debug, Clone)]
struct KeyValue(Value);

impl KeyValue {
    fn rank(&self) -> u8 {
        match self.0 {
            Value::Int64(_) | Value::Float64(_) => 0,
            Value::Bool(_) => 1,
            Value::Utf8(_) => 2,
            Value::Null => 3,
        }
    }
}

fn unsigned_zero(v: f64) -> f64 {
    if v == 0.0 { 0.0 } else { v }
}

/// Exact comparison of an integer with a float.
fn cmp_int_float(i: i64, f: f64) -> Ordering {
    // 2^63; every i64 is below it and at or above its negation.
    const BOUND: f64 = 9_223_372_036_854_775_808.0;
    if f >= BOUND {
        return Ordering::Less;
    }
    if f < -BOUND {
        return Ordering::Greater;
    }
    let whole = f.trunc();
    // `whole` is integral and in range, so the cast is exact.
    i.cmp(&(whole as i64))
        .then_with(|| 0.0_f64.partial_cmp(&(f - whole)).unwrap_or(Ordering::Equal))
}

impl Ord for KeyValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (&self.0, &other.0) {
            (Value::Int64(a), Value::Int64(b)) => a.cmp(b),
            (Value::Float64(a), Value::Float64(b)) => unsigned_zero(*a).total_cmp(&unsigned_zero(*b)),
            (Value::Int64(a), Value::Float64(b)) => cmp_int_float(*a, *b),
            (Value::Float64(a), Value::Int64(b)) => cmp_int_float(*b, *a).reverse(),
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Utf8(a), Value::Utf8(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for KeyValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for KeyValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for KeyValue {}

type Key = Vec<KeyValue>;

fn resolve(dataset: &DataSet, names: &[String]) -> AnalysisResult<Vec<usize>> {
    names
        .iter()
        .map(|name| {
            dataset
                .schema
                .index_of(name)
                .ok_or_else(|| AnalysisError::UnknownColumn { column: name.clone() })
        })
        .collect()
}

/// Read the key at `idxs` from `row`; `None` if any part is missing.
fn row_key(row: &[Value], idxs: &[usize]) -> Option<Key> {
    idxs.iter()
        .map(|idx| {
            let v = row.get(*idx).unwrap_or(&Value::Null);
            (!v.is_missing()).then(|| KeyValue(v.clone()))
        })
        .collect()
}

/// Output type of a value column, given whether any of its aggregated cells came out as a float.
fn output_type(agg: AggFunc, any_float: bool) -> DataType {
    match agg {
        AggFunc::Count => DataType::Int64,
        AggFunc::Mean | AggFunc::Median | AggFunc::Std => DataType::Float64,
        AggFunc::Sum | AggFunc::Min | AggFunc::Max if any_float => DataType::Float64,
        AggFunc::Sum | AggFunc::Min | AggFunc::Max => DataType::Int64,
    }
}

fn cast(value: Value, data_type: DataType) -> Value {
    match (value, data_type) {
        (Value::Int64(v), DataType::Float64) => Value::Float64(v as f64),
        (v, _) => v,
    }
}

/// Build a pivot table.
///
/// Rows are grouped by `index`; when `columns` is set, each distinct combination of its values
/// becomes a separate output column named `<value>_<key>` (multiple keys joined with `_`).
/// Without `columns`, output value columns keep their source names.
///
/// - rows with a missing key value are dropped
/// - output rows are sorted by index key; spread columns by their key
/// - index/value combinations that never occur are [`Value::Null`]
/// - rows and value columns that end up entirely null are removed
/// - `Sum`/`Min`/`Max` columns are `Int64` unless one of their aggregates is a float (a float
///   input or a sum past `i64::MAX`), in which case the whole column is `Float64`
///
/// Errors with [`AnalysisError::UnknownColumn`] when a named column does not exist, and
/// [`AnalysisError::InvalidArgument`] when `index` is empty.
///
/// ```rust
/// use rust_excel_toolkit::processing::{pivot, AggFunc, PivotOptions};
/// use rust_excel_toolkit::types::{DataSet, DataType, Field, Schema, Value};
///
/// let ds = DataSet::new(
///     Schema::new(vec![
///         Field::new("region", DataType::Utf8),
///         Field::new("sales", DataType::Int64),
///     ]),
///     vec![
///         vec![Value::Utf8("north".to_string()), Value::Int64(10)],
///         vec![Value::Utf8("south".to_string()), Value::Int64(5)],
///         vec![Value::Utf8("north".to_string()), Value::Int64(20)],
///     ],
/// );
/// let out = pivot(&ds, &PivotOptions::new(["region"]).agg(AggFunc::Sum)).unwrap();
/// assert_eq!(out.rows[0], vec![Value::Utf8("north".to_string()), Value::Int64(30)]);
/// ```
pub fn pivot(dataset: &DataSet, options: &PivotOptions) -> AnalysisResult<DataSet> {
    if options.index.is_empty() {
        return Err(AnalysisError::InvalidArgument {
            message: "pivot needs at least one index column".to_string(),
        });
    }

    let index_idx = resolve(dataset, &options.index)?;
    let column_idx = resolve(dataset, &options.columns)?;
    let value_idx = match &options.values {
        Some(values) => resolve(dataset, values)?,
        None => dataset
            .select_numeric_columns(None)
            .into_iter()
            .map(|(_, idx)| idx)
            .filter(|idx| !index_idx.contains(idx) && !column_idx.contains(idx))
            .collect(),
    };

    // index key -> spread key -> source row positions
    let mut groups: BTreeMap<Key, BTreeMap<Key, Vec<usize>>> = BTreeMap::new();
    let mut spread_keys: BTreeSet<Key> = BTreeSet::new();
    for (pos, row) in dataset.rows.iter().enumerate() {
        let (Some(ik), Some(ck)) = (row_key(row, &index_idx), row_key(row, &column_idx)) else {
            continue;
        };
        spread_keys.insert(ck.clone());
        groups.entry(ik).or_default().entry(ck).or_default().push(pos);
    }

    // (source value column, spread key, output name) per output value column
    let mut cells: Vec<(usize, &Key, String)> = Vec::new();
    for &vidx in &value_idx {
        let name = &dataset.schema.fields[vidx].name;
        for key in &spread_keys {
            let field_name = if key.is_empty() {
                name.clone()
            } else {
                let parts: Vec<String> = key.iter().map(|k| k.0.to_string()).collect();
                format!("{name}_{}", parts.join("_"))
            };
            cells.push((vidx, key, field_name));
        }
    }

    let key_width = index_idx.len();
    let mut rows: Vec<Vec<Value>> = Vec::with_capacity(groups.len());
    for (ik, by_spread) in &groups {
        let mut row: Vec<Value> = ik.iter().map(|k| k.0.clone()).collect();
        for (vidx, ck, _) in &cells {
            let value = match by_spread.get(*ck) {
                Some(positions) => {
                    let group = positions
                        .iter()
                        .map(|p| dataset.rows[*p].get(*vidx).unwrap_or(&Value::Null));
                    aggregate(group, options.agg)
                }
                None => Value::Null,
            };
            row.push(value);
        }
        if cells.is_empty() || row[key_width..].iter().any(|v| !v.is_missing()) {
            rows.push(row);
        }
    }

    // A source column is Int64 only if none of its aggregates came out as a float (mixed
    // inputs or an overflowing sum); its spread columns share one type.
    let float_sources: BTreeSet<usize> = cells
        .iter()
        .enumerate()
        .filter(|(out, _)| rows.iter().any(|r| matches!(r[key_width + out], Value::Float64(_))))
        .map(|(_, (vidx, _, _))| *vidx)
        .collect();
    let mut fields: Vec<Field> = index_idx
        .iter()
        .map(|idx| dataset.schema.fields[*idx].clone())
        .collect();
    for (vidx, _, name) in &cells {
        fields.push(Field::new(name.clone(), output_type(options.agg, float_sources.contains(vidx))));
    }
    for row in &mut rows {
        for (c, value) in row.iter_mut().enumerate().skip(key_width) {
            *value = cast(std::mem::replace(value, Value::Null), fields[c].data_type);
        }
    }

    // Drop value columns with no data at all.
    let keep: Vec<bool> = (0..fields.len())
        .map(|c| c < key_width || rows.iter().any(|r| !r[c].is_missing()))
        .collect();
    let fields: Vec<Field> = fields
        .into_iter()
        .zip(&keep)
        .filter_map(|(f, k)| k.then_some(f))
        .collect();
    let rows: Vec<Vec<Value>> = rows
        .into_iter()
        .map(|r| r.into_iter().zip(&keep).filter_map(|(v, k)| k.then_some(v)).collect())
        .collect();

    Ok(DataSet::new(Schema::new(fields), rows))
}
