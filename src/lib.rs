//! `car-sales-preprocessing` turns a flat CSV of vehicle sales into four normalized tables and a
//! plain-text summary report.
//!
//! The primary entrypoint is [`pipeline::run`], which executes, in order:
//!
//! 1. **Load**: [`ingestion::ingest_csv_from_path`] reads the CSV into an in-memory
//!    [`types::DataSet`], checking the required columns in [`columns::raw_schema`].
//! 2. **Clean**: [`processing::clean()`] fills missing income/gender/phone, coerces price and
//!    date, drops invalid rows and price outliers (single-pass z-score), and title-cases names.
//! 3. **Enrich**: [`processing::enrich()`] adds `Year`, `Month`, `DayOfWeek`, `Quarter` and
//!    `IncomeSegment`.
//! 4. **Partition**: [`processing::partition()`] projects the customers, dealers, cars and sales
//!    tables, de-duplicating each one independently.
//! 5. **Export**: [`export::write_workbook`] writes one worksheet per table and
//!    [`export::write_report`] writes the [`report::Report`].
//!
//! Every stage is fatal on error ([`PipelineError`]); nothing is retried and there is no
//! partial-output cleanup.
//!
//! ## Quick example
//!
//! ```no_run
//! use car_sales_preprocessing::pipeline::{run, PipelineConfig};
//!
//! # fn main() -> Result<(), car_sales_preprocessing::PipelineError> {
//! let out = run(&PipelineConfig::default())?;
//! for (sheet, rows) in out.partitions.row_counts() {
//!     println!("{sheet}: {rows}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`pipeline`]: configuration and the end-to-end run
//! - [`ingestion`]: CSV loading
//! - [`processing`]: cleaning, enrichment, partitioning and column statistics
//! - [`export`]: workbook and report writers
//! - [`report`]: the append-only summary report
//! - [`observability`]: progress/failure observers
//! - [`columns`]: column names of the sales dataset
//! - [`types`]: schema + in-memory dataset types
//! - [`error`]: the crate-wide error type

pub mod columns;
pub mod error;
pub mod export;
pub mod ingestion;
pub mod observability;
pub mod pipeline;
pub mod processing;
pub mod report;
pub mod types;

pub use error::{PipelineError, PipelineResult};
