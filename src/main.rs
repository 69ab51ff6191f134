use std::sync::Arc;

use car_sales_preprocessing::observability::StdErrObserver;
use car_sales_preprocessing::pipeline::{run, PipelineConfig};
use car_sales_preprocessing::PipelineResult;

fn main() -> PipelineResult<()> {
    let config = PipelineConfig {
        observer: Some(Arc::new(StdErrObserver)),
        ..Default::default()
    };
    let out = run(&config)?;
    println!(
        "Data preprocessing complete. Report saved to '{}'.",
        out.report_path.display()
    );
    Ok(())
}
