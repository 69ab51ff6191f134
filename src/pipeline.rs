//! End-to-end run: load → clean → enrich → partition → export.
//!
//! [`run`] executes the stages strictly in order. The first error aborts the run; nothing after
//! the failing stage executes, and the error is reported to the observer (if any) before it is
//! returned.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use crate::columns::raw_schema;
use crate::error::PipelineResult;
use crate::export::{write_report, write_workbook};
use crate::ingestion::ingest_csv_from_path;
use crate::observability::{PipelineEvent, PipelineObserver, Severity, Stage};
use crate::processing::clean::{clean, clean_with_progress, CLEAN_STEPS, DEFAULT_ZSCORE_THRESHOLD};
use crate::processing::enrich::{enrich, enrich_with_progress, ENRICH_STEPS};
use crate::processing::partition::{partition, partition_with_progress, Partitions};
use crate::report::Report;
use crate::types::DataSet;

pub const DEFAULT_INPUT_PATH: &str = "carSaleRG.csv";
pub const DEFAULT_WORKBOOK_PATH: &str = "processed_car_sales.xlsx";
pub const DEFAULT_REPORT_PATH: &str = "preprocessing_report.txt";

/// Options controlling a pipeline run.
///
/// Use [`Default`] for the standard relative paths.
#[derive(Clone)]
pub struct PipelineConfig {
    /// Sales CSV to read.
    pub input_path: PathBuf,
    /// Workbook to write the four tables to.
    pub workbook_path: PathBuf,
    /// Text file to write the report to.
    pub report_path: PathBuf,
    /// Rows whose price z-score exceeds this (in absolute value) are dropped.
    pub zscore_threshold: f64,
    /// Optional observer for progress and failures.
    pub observer: Option<Arc<dyn PipelineObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: Severity,
}

impl fmt::Debug for PipelineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineConfig")
            .field("input_path", &self.input_path)
            .field("workbook_path", &self.workbook_path)
            .field("report_path", &self.report_path)
            .field("zscore_threshold", &self.zscore_threshold)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT_PATH),
            workbook_path: PathBuf::from(DEFAULT_WORKBOOK_PATH),
            report_path: PathBuf::from(DEFAULT_REPORT_PATH),
            zscore_threshold: DEFAULT_ZSCORE_THRESHOLD,
            observer: None,
            alert_at_or_above: Severity::Critical,
        }
    }
}

/// Everything a successful run produced.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub partitions: Partitions,
    pub report: Report,
    pub workbook_path: PathBuf,
    pub report_path: PathBuf,
}

/// Run the whole pipeline with `config`.
///
/// ```no_run
/// use std::sync::Arc;
///
/// use car_sales_preprocessing::observability::StdErrObserver;
/// use car_sales_preprocessing::pipeline::{run, PipelineConfig};
///
/// # fn main() -> Result<(), car_sales_preprocessing::PipelineError> {
/// let config = PipelineConfig {
///     input_path: "data/sales.csv".into(),
///     observer: Some(Arc::new(StdErrObserver)),
///     ..Default::default()
/// };
/// let out = run(&config)?;
/// println!("{}", out.report.render());
/// # Ok(())
/// # }
/// ```
pub fn run(config: &PipelineConfig) -> PipelineResult<PipelineOutput> {
    let start = Instant::now();
    let tracker = Tracker::new(config);
    tracker.emit(PipelineEvent::RunStarted);

    let mut report = Report::new();

    let raw = tracker.stage(Stage::Load, 1, |step| {
        let ds = ingest_csv_from_path(&config.input_path, &raw_schema())?;
        step("read csv");
        Ok(ds)
    })?;
    report.record_initial_shape(&raw);

    let cleaned = tracker.stage(Stage::Clean, CLEAN_STEPS.len(), |step| {
        clean_with_progress(&raw, config.zscore_threshold, step)
    })?;

    let enriched = tracker.stage(Stage::Enrich, ENRICH_STEPS.len(), |step| {
        enrich_with_progress(&cleaned, step)
    })?;

    let partitions = tracker.stage(Stage::Partition, 4, |step| {
        partition_with_progress(&enriched, step)
    })?;
    report.record_partitions(&partitions);

    tracker.stage(Stage::ExportWorkbook, 1, |step| {
        write_workbook(&config.workbook_path, &partitions.sheets())?;
        step("workbook");
        Ok(())
    })?;
    report.record_export(&config.workbook_path);

    tracker.stage(Stage::ExportReport, 1, |step| {
        write_report(&config.report_path, &report)?;
        step("report");
        Ok(())
    })?;

    tracker.emit(PipelineEvent::RunFinished {
        elapsed: start.elapsed(),
    });

    Ok(PipelineOutput {
        partitions,
        report,
        workbook_path: config.workbook_path.clone(),
        report_path: config.report_path.clone(),
    })
}

/// Load, clean, enrich and partition without writing anything.
pub fn process(input_path: impl AsRef<Path>, zscore_threshold: f64) -> PipelineResult<Partitions> {
    let raw = ingest_csv_from_path(input_path, &raw_schema())?;
    let cleaned = clean(&raw, zscore_threshold)?;
    partition(&enrich(&cleaned)?)
}

/// Forwards stage progress and failures to the configured observer.
struct Tracker<'a> {
    observer: Option<&'a dyn PipelineObserver>,
    alert_at_or_above: Severity,
}

impl<'a> Tracker<'a> {
    fn new(config: &'a PipelineConfig) -> Self {
        Self {
            observer: config.observer.as_deref(),
            alert_at_or_above: config.alert_at_or_above,
        }
    }

    fn emit(&self, event: PipelineEvent) {
        if let Some(obs) = self.observer {
            obs.on_event(&event);
        }
    }

    /// Run one stage, emitting start/step/finish events around it.
    fn stage<T, F>(&self, stage: Stage, total_steps: usize, body: F) -> PipelineResult<T>
    where
        T: StageRows,
        F: FnOnce(&mut dyn FnMut(&'static str)) -> PipelineResult<T>,
    {
        let start = Instant::now();
        self.emit(PipelineEvent::StageStarted { stage, total_steps });

        let mut step = 0usize;
        let result = body(&mut |label: &'static str| {
            step += 1;
            self.emit(PipelineEvent::StepCompleted {
                stage,
                step,
                total_steps,
                label,
            });
        });

        match &result {
            Ok(out) => self.emit(PipelineEvent::StageFinished {
                stage,
                rows: out.rows(),
                elapsed: start.elapsed(),
            }),
            Err(e) => {
                if let Some(obs) = self.observer {
                    let sev = Severity::for_error(e);
                    obs.on_failure(stage, sev, e);
                    if sev >= self.alert_at_or_above {
                        obs.on_alert(stage, sev, e);
                    }
                }
            }
        }
        result
    }
}

/// Row count reported in [`PipelineEvent::StageFinished`].
trait StageRows {
    fn rows(&self) -> usize;
}

impl StageRows for DataSet {
    fn rows(&self) -> usize {
        self.row_count()
    }
}

impl StageRows for Partitions {
    fn rows(&self) -> usize {
        self.sales.row_count()
    }
}

impl StageRows for () {
    fn rows(&self) -> usize {
        0
    }
}
