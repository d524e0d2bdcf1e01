//! CSV writer.

use std::path::Path;

use crate::error::ExportResult;
use crate::types::DataSet;

/// Write `dataset` to a CSV file: one header row, then one record per row.
///
/// Missing values (`Null`, NaN) are written as empty fields. Short rows are padded.
pub fn write_csv(dataset: &DataSet, path: impl AsRef<Path>) -> ExportResult<()> {
    let mut wtr = csv::Writer::from_path(path.as_ref())?;
    write_csv_to_writer(dataset, &mut wtr)?;
    wtr.flush()?;
    Ok(())
}

/// Write `dataset` to an existing [`csv::Writer`].
pub fn write_csv_to_writer<W: std::io::Write>(dataset: &DataSet, wtr: &mut csv::Writer<W>) -> ExportResult<()> {
    wtr.write_record(dataset.schema.field_names())?;
    let width = dataset.column_count();
    for row in &dataset.rows {
        let record = (0..width).map(|idx| row.get(idx).map(|v| v.to_string()).unwrap_or_default());
        wtr.write_record(record)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DataType, Field, Schema, Value};

    #[test]
    fn nulls_are_empty_fields() {
        let ds = DataSet::new(
            Schema::new(vec![
                Field::new("id", DataType::Int64),
                Field::new("name", DataType::Utf8),
                Field::new("score", DataType::Float64),
            ]),
            vec![
                vec![Value::Int64(1), Value::Utf8("Ada, L.".to_string()), Value::Float64(98.5)],
                vec![Value::Int64(2), Value::Null, Value::Float64(f64::NAN)],
                vec![Value::Int64(3)],
            ],
        );

        let mut wtr = csv::Writer::from_writer(Vec::new());
        write_csv_to_writer(&ds, &mut wtr).unwrap();
        let out = String::from_utf8(wtr.into_inner().unwrap()).unwrap();
        assert_eq!(out, "id,name,score\n1,\"Ada, L.\",98.5\n2,,\n3,,\n");
    }
}
