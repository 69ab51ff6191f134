use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use car_sales_preprocessing::observability::{PipelineEvent, PipelineObserver, Severity, Stage};
use car_sales_preprocessing::pipeline::{run, PipelineConfig};
use car_sales_preprocessing::PipelineError;

#[derive(Default)]
struct RecordingObserver {
    events: Mutex<Vec<PipelineEvent>>,
    failures: Mutex<Vec<(Stage, Severity)>>,
    alerts: Mutex<Vec<(Stage, Severity)>>,
}

impl PipelineObserver for RecordingObserver {
    fn on_event(&self, event: &PipelineEvent) {
        self.events.lock().unwrap().push(event.clone());
    }

    fn on_failure(&self, stage: Stage, severity: Severity, _error: &PipelineError) {
        self.failures.lock().unwrap().push((stage, severity));
    }

    fn on_alert(&self, stage: Stage, severity: Severity, _error: &PipelineError) {
        self.alerts.lock().unwrap().push((stage, severity));
    }
}

fn tmp_file(name: &str, ext: &str) -> std::path::PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("car-sales-preprocessing-obs-{name}-{nanos}.{ext}"))
}

fn config_with(obs: Arc<RecordingObserver>, input: &str, name: &str) -> PipelineConfig {
    PipelineConfig {
        input_path: input.into(),
        workbook_path: tmp_file(name, "xlsx"),
        report_path: tmp_file(name, "txt"),
        observer: Some(obs),
        alert_at_or_above: Severity::Critical,
        ..Default::default()
    }
}

#[test]
fn observer_sees_every_stage_in_order() {
    let obs = Arc::new(RecordingObserver::default());
    let cfg = config_with(obs.clone(), "tests/fixtures/car_sales.csv", "ok");
    run(&cfg).unwrap();

    let events = obs.events.lock().unwrap().clone();
    assert_eq!(events.first(), Some(&PipelineEvent::RunStarted));
    assert!(matches!(events.last(), Some(PipelineEvent::RunFinished { .. })));

    let started: Vec<Stage> = events
        .iter()
        .filter_map(|e| match e {
            PipelineEvent::StageStarted { stage, .. } => Some(*stage),
            _ => None,
        })
        .collect();
    assert_eq!(
        started,
        vec![
            Stage::Load,
            Stage::Clean,
            Stage::Enrich,
            Stage::Partition,
            Stage::ExportWorkbook,
            Stage::ExportReport
        ]
    );

    let clean_steps = events
        .iter()
        .filter(|e| matches!(e, PipelineEvent::StepCompleted { stage: Stage::Clean, .. }))
        .count();
    assert_eq!(clean_steps, 9);

    let clean_rows = events.iter().find_map(|e| match e {
        PipelineEvent::StageFinished {
            stage: Stage::Clean,
            rows,
            ..
        } => Some(*rows),
        _ => None,
    });
    assert_eq!(clean_rows, Some(17));
    assert!(obs.failures.lock().unwrap().is_empty());

    let _ = std::fs::remove_file(&cfg.workbook_path);
    let _ = std::fs::remove_file(&cfg.report_path);
}

#[test]
fn observer_receives_failure_and_alert_on_critical_io_error() {
    let obs = Arc::new(RecordingObserver::default());
    let cfg = config_with(obs.clone(), "tests/fixtures/does_not_exist.csv", "io");

    // Missing file -> csv I/O error -> Critical
    let _ = run(&cfg).unwrap_err();

    let failures = obs.failures.lock().unwrap().clone();
    let alerts = obs.alerts.lock().unwrap().clone();
    assert_eq!(failures, vec![(Stage::Load, Severity::Critical)]);
    assert_eq!(alerts, vec![(Stage::Load, Severity::Critical)]);
}

#[test]
fn observer_receives_failure_without_alert_for_non_critical_error() {
    let obs = Arc::new(RecordingObserver::default());
    let input = tmp_file("constant-price", "csv");
    let mut csv = String::from(
        "Car_id,Date,Customer Name,Gender,Annual Income,Dealer_Name,Company,Model,Engine,\
         Transmission,Color,Price,Dealer_No,Body Style,Phone,Dealer_Region\n",
    );
    for i in 0..3 {
        csv.push_str(&format!(
            "C_{i},1/2/2022,Ann,Female,40000,Acme,Ford,Focus,DOHC,Auto,Red,20000,D1,Sedan,555,\
             North\n"
        ));
    }
    std::fs::write(&input, csv).unwrap();

    // Every price identical -> zero standard deviation -> Numeric error (Error severity)
    let cfg = config_with(obs.clone(), input.to_str().unwrap(), "numeric");
    let err = run(&cfg).unwrap_err();
    assert!(matches!(err, PipelineError::Numeric { .. }));

    let failures = obs.failures.lock().unwrap().clone();
    assert_eq!(failures, vec![(Stage::Clean, Severity::Error)]);
    assert!(obs.alerts.lock().unwrap().is_empty());
    assert!(!cfg.report_path.exists());

    let _ = std::fs::remove_file(&input);
}
