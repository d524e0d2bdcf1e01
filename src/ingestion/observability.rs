//! Observer hooks for file operations.
//!
//! There is no global logger: callers attach an [`IngestionObserver`] through
//! [`super::IngestionOptions::observer`]. Every path-based operation then reports one
//! [`Outcome`] or one failure:
//!
//! - loads ([`super::load_from_path`], [`super::ingest_from_path`])
//! - [`crate::validation::validate_file`] and [`crate::validation::inspect_file`]
//! - the conversions in [`crate::export::convert`]
//!
//! Validation, inspection and conversion load their source first, so the load is reported as
//! well, before the outer operation.

use std::error::Error as StdError;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use super::unified::IngestionFormat;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum IngestionSeverity {
    /// Informational event.
    Info,
    /// Warning-level event (non-fatal).
    Warning,
    /// Error-level event (operation failed).
    Error,
    /// Critical error (typically I/O or other infrastructure failures).
    Critical,
}

/// The file operation an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Load,
    Validate,
    Inspect,
    Convert,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::Load => "load",
            Operation::Validate => "validate",
            Operation::Inspect => "inspect",
            Operation::Convert => "convert",
        })
    }
}

/// Context about an operation on a file.
#[derive(Debug, Clone)]
pub struct IngestionContext {
    pub operation: Operation,
    /// The input path (the source, for conversions).
    pub path: PathBuf,
    /// Format used for loading; `None` when it could not be resolved.
    pub format: Option<IngestionFormat>,
    /// `true` when the table was loaded without a schema (types inferred).
    pub inferred: bool,
}

impl IngestionContext {
    pub(crate) fn new(operation: Operation, path: &Path, format: Option<IngestionFormat>, inferred: bool) -> Self {
        Self {
            operation,
            path: path.to_path_buf(),
            format,
            inferred,
        }
    }
}

/// What a successful operation produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A table was loaded.
    Loaded { rows: usize, columns: usize },
    /// A validation ran to a verdict. A source that failed to load counts as invalid.
    Validated { valid: bool, errors: usize },
    /// A readable file was inspected.
    Inspected { rows: usize, columns: usize },
    /// A conversion wrote `rows` data rows to `output`.
    Converted { output: PathBuf, rows: usize },
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Loaded { rows, columns } | Outcome::Inspected { rows, columns } => {
                write!(f, "rows={rows} columns={columns}")
            }
            Outcome::Validated { valid, errors } => write!(f, "valid={valid} errors={errors}"),
            Outcome::Converted { output, rows } => write!(f, "output={} rows={rows}", output.display()),
        }
    }
}

/// Observer interface for operation outcomes.
///
/// Implementors can record metrics, logs, or trigger alerts.
pub trait IngestionObserver: Send + Sync {
    /// Called when an operation succeeds.
    fn on_success(&self, _ctx: &IngestionContext, _outcome: &Outcome) {}

    /// Called when an operation fails.
    fn on_failure(&self, _ctx: &IngestionContext, _severity: IngestionSeverity, _error: &dyn StdError) {}

    /// Called when a failure meets the alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &dyn StdError) {
        self.on_failure(ctx, severity, error)
    }
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn IngestionObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn IngestionObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl IngestionObserver for CompositeObserver {
    fn on_success(&self, ctx: &IngestionContext, outcome: &Outcome) {
        for o in &self.observers {
            o.on_success(ctx, outcome);
        }
    }

    fn on_failure(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &dyn StdError) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &dyn StdError) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }
}

/// `op=<operation> format=<format> mode=<inferred|schema> path=<path>`
fn describe(ctx: &IngestionContext) -> String {
    let format = ctx.format.map_or_else(|| "unknown".to_string(), |f| format!("{f:?}"));
    let mode = if ctx.inferred { "inferred" } else { "schema" };
    format!(
        "op={} format={format} mode={mode} path={}",
        ctx.operation,
        ctx.path.display()
    )
}

/// Logs events to stderr.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl IngestionObserver for StdErrObserver {
    fn on_success(&self, ctx: &IngestionContext, outcome: &Outcome) {
        eprintln!("[table][ok] {} {outcome}", describe(ctx));
    }

    fn on_failure(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &dyn StdError) {
        eprintln!("[table][{severity:?}] {} err={error}", describe(ctx));
    }

    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &dyn StdError) {
        eprintln!("[ALERT][table][{severity:?}] {} err={error}", describe(ctx));
    }
}

/// Appends events to a local log file, one line each, prefixed with a unix timestamp.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Create a file observer that appends events to `path`.
    ///
    /// Writes are best-effort; failures to open/write the log file are ignored.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append_line(&self, line: &str) {
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{} {line}", unix_ts());
        }
    }
}

impl IngestionObserver for FileObserver {
    fn on_success(&self, ctx: &IngestionContext, outcome: &Outcome) {
        self.append_line(&format!("ok {} {outcome}", describe(ctx)));
    }

    fn on_failure(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &dyn StdError) {
        self.append_line(&format!("fail severity={severity:?} {} err={error}", describe(ctx)));
    }

    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &dyn StdError) {
        self.append_line(&format!("ALERT severity={severity:?} {} err={error}", describe(ctx)));
    }
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_names_operation_format_and_mode() {
        let ctx = IngestionContext::new(Operation::Convert, Path::new("in.csv"), Some(IngestionFormat::Csv), true);
        assert_eq!(describe(&ctx), "op=convert format=Csv mode=inferred path=in.csv");

        let ctx = IngestionContext::new(Operation::Load, Path::new("in.txt"), None, false);
        assert_eq!(describe(&ctx), "op=load format=unknown mode=schema path=in.txt");
    }

    #[test]
    fn outcomes_render_as_key_value_pairs() {
        assert_eq!(Outcome::Validated { valid: false, errors: 2 }.to_string(), "valid=false errors=2");
        assert_eq!(
            Outcome::Converted {
                output: PathBuf::from("out.json"),
                rows: 4
            }
            .to_string(),
            "output=out.json rows=4"
        );
    }
}
