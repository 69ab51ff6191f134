use std::path::PathBuf;

use thiserror::Error;

/// Convenience result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Error type returned by every pipeline stage.
///
/// A single enum is shared by loading, cleaning, partitioning and export. No stage recovers from
/// an error; the first one aborts the run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Underlying I/O error (e.g. input file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reader error (malformed input, ragged rows, or I/O while reading).
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// A column required by a stage is absent.
    #[error("missing required column '{column}'. headers={headers:?}")]
    MissingColumn { column: String, headers: Vec<String> },

    /// A value could not be parsed into the required [`crate::types::DataType`].
    #[error("failed to parse value at row {row} column '{column}': {message} (raw='{raw}')")]
    ParseError {
        row: usize,
        column: String,
        raw: String,
        message: String,
    },

    /// Degenerate statistics, e.g. a zero standard deviation in the outlier filter.
    #[error("numeric error: {message}")]
    Numeric { message: String },

    /// The output workbook could not be built or saved.
    #[error("failed to write workbook '{}': {source}", path.display())]
    Workbook {
        path: PathBuf,
        #[source]
        source: rust_xlsxwriter::XlsxError,
    },

    /// A plain output file could not be written.
    #[error("failed to write '{}': {source}", path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
