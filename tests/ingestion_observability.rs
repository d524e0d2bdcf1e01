use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use rust_excel_toolkit::export::{csv_to_json, JsonOrient};
use rust_excel_toolkit::ingestion::{
    ingest_from_path, load_from_path, FileObserver, IngestionContext, IngestionFormat, IngestionObserver,
    IngestionOptions, IngestionSeverity, Operation, Outcome,
};
use rust_excel_toolkit::types::{DataType, Field, Schema};
use rust_excel_toolkit::validation::{inspect_file, validate_file, ExpectedType, ValidationSchema};

#[derive(Default)]
struct RecordingObserver {
    successes: Mutex<Vec<(Operation, bool, Outcome)>>,
    failures: Mutex<Vec<(Operation, IngestionSeverity)>>,
    alerts: Mutex<Vec<(Operation, IngestionSeverity)>>,
}

impl IngestionObserver for RecordingObserver {
    fn on_success(&self, ctx: &IngestionContext, outcome: &Outcome) {
        self.successes
            .lock()
            .unwrap()
            .push((ctx.operation, ctx.inferred, outcome.clone()));
    }

    fn on_failure(&self, ctx: &IngestionContext, severity: IngestionSeverity, _error: &dyn std::error::Error) {
        self.failures.lock().unwrap().push((ctx.operation, severity));
    }

    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, _error: &dyn std::error::Error) {
        self.alerts.lock().unwrap().push((ctx.operation, severity));
    }
}

fn schema_id_only() -> Schema {
    Schema::new(vec![Field::new("id", DataType::Int64)])
}

fn schema_missing_col() -> Schema {
    Schema::new(vec![Field::new("definitely_missing", DataType::Utf8)])
}

fn observed(obs: &Arc<RecordingObserver>) -> IngestionOptions {
    IngestionOptions {
        format: Some(IngestionFormat::Csv),
        observer: Some(obs.clone()),
        alert_at_or_above: IngestionSeverity::Critical,
        ..Default::default()
    }
}

fn tmp_file(name: &str, ext: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("rust-excel-toolkit-obs-{name}-{nanos}.{ext}"))
}

const PEOPLE: Outcome = Outcome::Loaded { rows: 2, columns: 4 };

#[test]
fn observer_receives_failure_and_alert_on_critical_io_error() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = observed(&obs);

    // Missing file -> Io error -> Critical
    let _ = ingest_from_path("tests/fixtures/does_not_exist.csv", &schema_id_only(), &opts).unwrap_err();

    let failures = obs.failures.lock().unwrap().clone();
    let alerts = obs.alerts.lock().unwrap().clone();
    assert_eq!(failures, vec![(Operation::Load, IngestionSeverity::Critical)]);
    assert_eq!(alerts, vec![(Operation::Load, IngestionSeverity::Critical)]);
}

#[test]
fn observer_receives_failure_without_alert_for_non_critical_error() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = observed(&obs);

    // Schema mismatch -> Error severity (not Critical) -> should not alert
    let _ = ingest_from_path("tests/fixtures/people.csv", &schema_missing_col(), &opts).unwrap_err();

    let failures = obs.failures.lock().unwrap().clone();
    assert_eq!(failures, vec![(Operation::Load, IngestionSeverity::Error)]);
    assert!(obs.alerts.lock().unwrap().is_empty());
}

#[test]
fn unknown_extension_is_reported() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = IngestionOptions {
        observer: Some(obs.clone()),
        ..Default::default()
    };

    let _ = load_from_path("tests/fixtures/people.txt", &opts).unwrap_err();
    assert_eq!(
        obs.failures.lock().unwrap().clone(),
        vec![(Operation::Load, IngestionSeverity::Error)]
    );
}

#[test]
fn observer_sees_schema_less_loads() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = observed(&obs);

    let ds = load_from_path("tests/fixtures/people.csv", &opts).unwrap();
    assert_eq!(ds.row_count(), 2);

    let successes = obs.successes.lock().unwrap().clone();
    assert_eq!(successes, vec![(Operation::Load, true, PEOPLE)]);
}

#[test]
fn validate_file_reports_its_verdict_after_the_load() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = observed(&obs);
    let schema = ValidationSchema::new()
        .column("id", ExpectedType::Integer)
        .column("name", ExpectedType::Integer)
        .column("nope", ExpectedType::Text);

    let result = validate_file("tests/fixtures/people.csv", &schema, &opts);
    assert_eq!(result.errors.len(), 2);

    assert_eq!(
        obs.successes.lock().unwrap().clone(),
        vec![
            (Operation::Load, true, PEOPLE),
            (Operation::Validate, true, Outcome::Validated { valid: false, errors: 2 }),
        ]
    );
}

#[test]
fn validate_file_load_failure_is_observed() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = observed(&obs);
    let schema = ValidationSchema::new().column("id", ExpectedType::Integer);

    let result = validate_file("tests/fixtures/does_not_exist.csv", &schema, &opts);
    assert!(!result.valid);
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].starts_with("failed to load table: "));

    assert_eq!(
        obs.failures.lock().unwrap().clone(),
        vec![(Operation::Load, IngestionSeverity::Critical)]
    );
    assert_eq!(
        obs.successes.lock().unwrap().clone(),
        vec![(Operation::Validate, true, Outcome::Validated { valid: false, errors: 1 })]
    );
}

#[test]
fn inspect_file_reports_shape_or_failure() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = observed(&obs);

    assert!(inspect_file("tests/fixtures/people.csv", &opts).valid);
    assert_eq!(
        obs.successes.lock().unwrap().clone(),
        vec![
            (Operation::Load, true, PEOPLE),
            (Operation::Inspect, true, Outcome::Inspected { rows: 2, columns: 4 }),
        ]
    );

    assert!(!inspect_file("tests/fixtures/does_not_exist.csv", &opts).valid);
    assert_eq!(
        obs.failures.lock().unwrap().clone(),
        vec![
            (Operation::Load, IngestionSeverity::Critical),
            (Operation::Inspect, IngestionSeverity::Critical),
        ]
    );
}

#[test]
fn conversions_are_observed() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = observed(&obs);
    let out = tmp_file("people", "json");

    assert_eq!(csv_to_json("tests/fixtures/people.csv", &out, JsonOrient::Records, &opts).unwrap(), 2);
    assert_eq!(
        obs.successes.lock().unwrap().clone(),
        vec![
            (Operation::Load, true, PEOPLE),
            (
                Operation::Convert,
                true,
                Outcome::Converted {
                    output: out.clone(),
                    rows: 2
                }
            ),
        ]
    );

    let _ = csv_to_json("tests/fixtures/does_not_exist.csv", &out, JsonOrient::Records, &opts).unwrap_err();
    assert_eq!(
        obs.alerts.lock().unwrap().clone(),
        vec![
            (Operation::Load, IngestionSeverity::Critical),
            (Operation::Convert, IngestionSeverity::Critical),
        ]
    );

    let _ = std::fs::remove_file(&out);
}

#[test]
fn file_observer_appends_one_line_per_event() {
    let log = tmp_file("events", "log");
    let opts = IngestionOptions {
        observer: Some(Arc::new(FileObserver::new(&log))),
        ..Default::default()
    };
    let schema = ValidationSchema::new().column("id", ExpectedType::Integer);

    assert!(validate_file("tests/fixtures/people.csv", &schema, &opts).valid);
    let _ = load_from_path("tests/fixtures/does_not_exist.csv", &opts).unwrap_err();

    let text = std::fs::read_to_string(&log).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].contains("ok op=load format=Csv mode=inferred path=tests/fixtures/people.csv rows=2 columns=4"));
    assert!(lines[1].contains("ok op=validate format=Csv mode=inferred"));
    assert!(lines[1].ends_with("valid=true errors=0"));
    assert!(lines[2].contains("fail severity=Critical op=load"));
    assert!(lines[3].contains("ALERT severity=Critical op=load"));

    let _ = std::fs::remove_file(&log);
}
