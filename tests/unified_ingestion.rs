use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

#[cfg(feature = "excel")]
use rust_excel_toolkit::ingestion::ExcelSheetSelection;
use rust_excel_toolkit::ingestion::{ingest_from_path, load_from_path, IngestionFormat, IngestionOptions};
use rust_excel_toolkit::types::{DataType, Field, Schema, Value};

fn tmp_file(ext: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("rust-excel-toolkit-unified-{nanos}.{ext}"))
}

fn people_schema() -> Schema {
    Schema::new(vec![
        Field::new("id", DataType::Int64),
        Field::new("name", DataType::Utf8),
        Field::new("score", DataType::Float64),
        Field::new("active", DataType::Bool),
    ])
}

fn people_schema_json_nested() -> Schema {
    Schema::new(vec![
        Field::new("id", DataType::Int64),
        Field::new("user.name", DataType::Utf8),
        Field::new("score", DataType::Float64),
        Field::new("active", DataType::Bool),
    ])
}

#[test]
fn unified_ingest_csv_auto_by_extension() {
    let schema = people_schema();
    let opts = IngestionOptions::default();
    let ds = ingest_from_path("tests/fixtures/people.csv", &schema, &opts).unwrap();
    assert_eq!(ds.row_count(), 2);
    assert_eq!(ds.rows[0][0], Value::Int64(1));
}

#[test]
fn unified_ingest_csv_explicit_format() {
    let schema = people_schema();
    let opts = IngestionOptions::with_format(IngestionFormat::Csv);
    let ds = ingest_from_path("tests/fixtures/people.csv", &schema, &opts).unwrap();
    assert_eq!(ds.row_count(), 2);
}

#[test]
fn unified_ingest_json_explicit_format_errors_with_flat_schema() {
    let schema = people_schema();
    let opts = IngestionOptions::with_format(IngestionFormat::Json);
    // The fixture nests the name under "user"; a flat "name" field does not exist.
    let err = ingest_from_path("tests/fixtures/people.json", &schema, &opts).unwrap_err();
    assert!(err.to_string().contains("missing required field 'name'"));
}

#[test]
fn unified_ingest_json_auto_by_extension_happy_path_nested_schema() {
    let schema = people_schema_json_nested();
    let opts = IngestionOptions::default(); // inferred from .json
    let ds = ingest_from_path("tests/fixtures/people.json", &schema, &opts).unwrap();
    assert_eq!(ds.row_count(), 2);
    assert_eq!(ds.rows[0][1], Value::Utf8("Ada".to_string()));
}

#[test]
fn unified_load_switch_formats() {
    let opts = IngestionOptions::default();

    let ds_csv = load_from_path("tests/fixtures/people.csv", &opts).unwrap();
    assert_eq!(ds_csv.schema.fields[0], Field::new("id", DataType::Int64));
    assert_eq!(ds_csv.schema.fields[3], Field::new("active", DataType::Bool));

    let ds_json = load_from_path("tests/fixtures/people.json", &opts).unwrap();
    assert_eq!(ds_json.row_count(), 2);
    let score = ds_json.schema.index_of("score").unwrap();
    assert_eq!(ds_json.rows[1][score], Value::Float64(87.25));
}

#[test]
fn unified_load_forced_format_ignores_extension() {
    let path = tmp_file("txt");
    std::fs::write(&path, "a,b\n1,x\n").unwrap();

    let err = load_from_path(&path, &IngestionOptions::default()).unwrap_err();
    assert!(err.to_string().contains("cannot infer format"));

    let ds = load_from_path(&path, &IngestionOptions::with_format(IngestionFormat::Csv)).unwrap();
    assert_eq!(ds.rows[0], vec![Value::Int64(1), Value::Utf8("x".to_string())]);

    let _ = std::fs::remove_file(&path);
}

#[cfg(feature = "excel")]
fn write_two_sheet_people(path: &PathBuf) {
    use rust_xlsxwriter::Workbook;

    let mut wb = Workbook::new();
    let ws1 = wb.add_worksheet();
    ws1.set_name("Sheet1").unwrap();
    ws1.write_string(0, 0, "id").unwrap();
    ws1.write_string(0, 1, "name").unwrap();
    ws1.write_string(0, 2, "score").unwrap();
    ws1.write_string(0, 3, "active").unwrap();
    ws1.write_number(1, 0, 1).unwrap();
    ws1.write_string(1, 1, "Ada").unwrap();
    ws1.write_number(1, 2, 98.5).unwrap();
    ws1.write_boolean(1, 3, true).unwrap();

    let ws2 = wb.add_worksheet();
    ws2.set_name("Second").unwrap();
    ws2.write_string(0, 0, "id").unwrap();
    ws2.write_string(0, 1, "name").unwrap();
    ws2.write_string(0, 2, "score").unwrap();
    ws2.write_string(0, 3, "active").unwrap();
    ws2.write_number(1, 0, 2).unwrap();
    ws2.write_string(1, 1, "Grace").unwrap();
    ws2.write_number(1, 2, 87.25).unwrap();
    ws2.write_boolean(1, 3, false).unwrap();

    wb.save(path).unwrap();
}

#[cfg(feature = "excel")]
#[test]
fn unified_ingest_excel_all_sheets_explicit_format() {
    let schema = people_schema();
    let path = tmp_file("xlsx");
    write_two_sheet_people(&path);

    let opts = IngestionOptions {
        format: Some(IngestionFormat::Excel),
        excel_sheet_selection: ExcelSheetSelection::AllSheets,
        ..Default::default()
    };
    let ds = ingest_from_path(&path, &schema, &opts).unwrap();
    assert_eq!(ds.row_count(), 2);

    let _ = std::fs::remove_file(&path);
}

#[cfg(feature = "excel")]
#[test]
fn unified_load_excel_named_sheet_auto_by_extension() {
    let path = tmp_file("xlsx");
    write_two_sheet_people(&path);

    let opts = IngestionOptions {
        excel_sheet_selection: ExcelSheetSelection::Sheet("Second".to_string()),
        ..Default::default()
    };
    let ds = load_from_path(&path, &opts).unwrap();
    assert_eq!(ds.row_count(), 1);
    assert_eq!(ds.rows[0][1], Value::Utf8("Grace".to_string()));
    // Workbook numbers are floats, even when integral.
    assert_eq!(ds.rows[0][0], Value::Float64(2.0));

    let missing = IngestionOptions {
        excel_sheet_selection: ExcelSheetSelection::Sheet("Nope".to_string()),
        ..Default::default()
    };
    assert!(load_from_path(&path, &missing).is_err());

    let _ = std::fs::remove_file(&path);
}
