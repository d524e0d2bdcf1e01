use rust_excel_toolkit::analysis::{
    basic_stats, correlations, detect_outliers, CorrelationMethod, OutlierMethod, OutlierOptions,
};
use rust_excel_toolkit::ingestion::{load_from_path, IngestionOptions};
use rust_excel_toolkit::processing::{pivot, AggFunc, PivotOptions};
use rust_excel_toolkit::types::{DataSet, DataType, Value};
use rust_excel_toolkit::AnalysisError;

fn frame() -> DataSet {
    load_from_path("tests/fixtures/analysis.csv", &IngestionOptions::default()).unwrap()
}

#[test]
fn fixture_loads_with_expected_types() {
    let ds = frame();
    let types: Vec<DataType> = ds.schema.fields.iter().map(|f| f.data_type).collect();
    assert_eq!(types, vec![DataType::Int64, DataType::Int64, DataType::Utf8, DataType::Float64]);
}

#[test]
fn basic_stats_covers_numeric_columns() {
    let stats = basic_stats(&frame(), None);
    assert_eq!(stats.keys().collect::<Vec<_>>(), vec!["A", "B", "D"]);

    let b = stats["B"];
    assert_eq!((b.mean, b.median, b.min, b.max), (35.0, 35.0, 10.0, 60.0));
    assert_eq!((b.q1, b.q3), (22.5, 47.5));
    assert!((b.std - 18.708286933869708).abs() < 1e-9);

    let d = stats["D"];
    assert_eq!(d.count, 6);
    assert!((d.mean - 3.85).abs() < 1e-9);
}

#[test]
fn basic_stats_is_idempotent() {
    let ds = frame();
    let before = ds.clone();
    assert_eq!(basic_stats(&ds, None), basic_stats(&ds, None));
    assert_eq!(ds, before);
}

#[test]
fn zscore_and_iqr_agree_on_the_extreme_value() {
    let ds = frame();
    let z = detect_outliers(&ds, Some(&["A"]), &OutlierOptions::zscore(2.0));
    let iqr = detect_outliers(&ds, Some(&["A"]), &OutlierOptions::iqr());
    assert_eq!(z["A"], vec![5]);
    assert_eq!(iqr["A"], vec![5]);
}

#[test]
fn outliers_default_selection_and_unknown_method() {
    let ds = frame();
    let all = detect_outliers(&ds, None, &OutlierOptions::iqr());
    assert_eq!(all.keys().collect::<Vec<_>>(), vec!["A", "B", "D"]);
    assert!(all["B"].is_empty());

    let opts = OutlierOptions {
        method: OutlierMethod::parse("isolation-forest"),
        ..OutlierOptions::default()
    };
    let none = detect_outliers(&ds, None, &opts);
    assert!(none.values().all(|rows| rows.is_empty()));
}

#[test]
fn correlation_matrix_properties() {
    let ds = frame();
    for method in [CorrelationMethod::Pearson, CorrelationMethod::Spearman, CorrelationMethod::Kendall] {
        let m = correlations(&ds, None, method);
        assert_eq!(m.columns, vec!["A", "B", "D"]);
        for i in 0..m.len() {
            assert_eq!(m.values[i][i], 1.0);
            for j in 0..m.len() {
                assert_eq!(m.values[i][j].to_bits(), m.values[j][i].to_bits());
            }
        }
        // B and D are both strictly increasing along the rows.
        assert!((m.get("B", "D").unwrap() - 1.0).abs() < 1e-9);
    }
}

#[test]
fn pivot_by_text_key_with_mean() {
    let ds = frame();
    let out = pivot(&ds, &PivotOptions::new(["C"]).values(["A", "B"]).agg(AggFunc::Mean)).unwrap();

    let names: Vec<&str> = out.schema.field_names().collect();
    assert_eq!(names, vec!["C", "A", "B"]);
    assert_eq!(out.row_count(), 6);
    assert_eq!(
        out.rows[0],
        vec![Value::Utf8("a".to_string()), Value::Float64(1.0), Value::Float64(10.0)]
    );
}

#[test]
fn pivot_unknown_column_is_an_error() {
    let err = pivot(&frame(), &PivotOptions::new(["C"]).values(["Z"])).unwrap_err();
    assert_eq!(err, AnalysisError::UnknownColumn { column: "Z".to_string() });
}
