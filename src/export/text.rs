//! Plain-text report export.

use std::fs;
use std::path::Path;

use crate::error::{PipelineError, PipelineResult};
use crate::report::Report;

/// Write the rendered report to `path`, replacing any existing file.
pub fn write_report(path: impl AsRef<Path>, report: &Report) -> PipelineResult<()> {
    let path = path.as_ref();
    fs::write(path, report.render()).map_err(|source| PipelineError::Storage {
        path: path.to_path_buf(),
        source,
    })
}
