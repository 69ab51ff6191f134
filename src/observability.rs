//! Progress and failure hooks.
//!
//! The pipeline reports what it is doing to an optional [`PipelineObserver`]. Observers only
//! watch; nothing they do changes what the pipeline computes.

use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::error::PipelineError;

/// The pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Load,
    Clean,
    Enrich,
    Partition,
    ExportWorkbook,
    ExportReport,
}

impl Stage {
    pub fn label(self) -> &'static str {
        match self {
            Stage::Load => "Loading Data",
            Stage::Clean => "Cleaning and Validating Data",
            Stage::Enrich => "Adding Derived Columns",
            Stage::Partition => "Partitioning Data",
            Stage::ExportWorkbook => "Saving Data to Excel",
            Stage::ExportReport => "Saving Report",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Severity classification used for failure callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Informational event.
    Info,
    /// Warning-level event (non-fatal).
    Warning,
    /// Error-level event (the run failed).
    Error,
    /// Critical error (I/O or storage failures).
    Critical,
}

impl Severity {
    pub fn for_error(e: &PipelineError) -> Self {
        match e {
            PipelineError::Io(_)
            | PipelineError::Storage { .. }
            | PipelineError::Workbook { .. } => Severity::Critical,
            PipelineError::Csv(err) => match err.kind() {
                ::csv::ErrorKind::Io(_) => Severity::Critical,
                _ => Severity::Error,
            },
            PipelineError::MissingColumn { .. }
            | PipelineError::ParseError { .. }
            | PipelineError::Numeric { .. } => Severity::Error,
        }
    }
}

/// Progress events emitted while the pipeline runs.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    RunStarted,
    StageStarted {
        stage: Stage,
        total_steps: usize,
    },
    StepCompleted {
        stage: Stage,
        step: usize,
        total_steps: usize,
        label: &'static str,
    },
    StageFinished {
        stage: Stage,
        rows: usize,
        elapsed: Duration,
    },
    RunFinished {
        elapsed: Duration,
    },
}

/// Observer interface for pipeline progress and failures.
pub trait PipelineObserver: Send + Sync {
    /// Called for every progress event.
    fn on_event(&self, _event: &PipelineEvent) {}

    /// Called when a stage fails. The run stops right after.
    fn on_failure(&self, _stage: Stage, _severity: Severity, _error: &PipelineError) {}

    /// Called when a failure meets the configured alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, stage: Stage, severity: Severity, error: &PipelineError) {
        self.on_failure(stage, severity, error)
    }
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn PipelineObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn PipelineObserver>>) -> Self {
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

impl PipelineObserver for CompositeObserver {
    fn on_event(&self, event: &PipelineEvent) {
        for o in &self.observers {
            o.on_event(event);
        }
    }

    fn on_failure(&self, stage: Stage, severity: Severity, error: &PipelineError) {
        for o in &self.observers {
            o.on_failure(stage, severity, error);
        }
    }

    fn on_alert(&self, stage: Stage, severity: Severity, error: &PipelineError) {
        for o in &self.observers {
            o.on_alert(stage, severity, error);
        }
    }
}

/// Writes one progress line per event to stderr.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl PipelineObserver for StdErrObserver {
    fn on_event(&self, event: &PipelineEvent) {
        eprintln!("[pipeline] {}", describe(event));
    }

    fn on_failure(&self, stage: Stage, severity: Severity, error: &PipelineError) {
        eprintln!("[pipeline][{severity:?}] stage={stage} err={error}");
    }

    fn on_alert(&self, stage: Stage, severity: Severity, error: &PipelineError) {
        eprintln!("[ALERT][pipeline][{severity:?}] stage={stage} err={error}");
    }
}

/// Appends pipeline events to a local log file.
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
            let _ = writeln!(f, "{line}");
        }
    }
}

impl PipelineObserver for FileObserver {
    fn on_event(&self, event: &PipelineEvent) {
        self.append_line(&format!("{} {}", unix_ts(), describe(event)));
    }

    fn on_failure(&self, stage: Stage, severity: Severity, error: &PipelineError) {
        self.append_line(&format!(
            "{} fail severity={severity:?} stage={stage} err={error}",
            unix_ts()
        ));
    }

    fn on_alert(&self, stage: Stage, severity: Severity, error: &PipelineError) {
        self.append_line(&format!(
            "{} ALERT severity={severity:?} stage={stage} err={error}",
            unix_ts()
        ));
    }
}

fn describe(event: &PipelineEvent) -> String {
    match event {
        PipelineEvent::RunStarted => "run started".to_string(),
        PipelineEvent::StageStarted { stage, total_steps } => format!("{stage}: 0/{total_steps}"),
        PipelineEvent::StepCompleted {
            stage,
            step,
            total_steps,
            label,
        } => format!("{stage}: {step}/{total_steps} {label}"),
        PipelineEvent::StageFinished {
            stage,
            rows,
            elapsed,
        } => format!("{stage}: done rows={rows} elapsed={elapsed:?}"),
        PipelineEvent::RunFinished { elapsed } => format!("run finished elapsed={elapsed:?}"),
    }
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
