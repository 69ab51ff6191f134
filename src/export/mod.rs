//! Persisting the partitioned tables and the report.
//!
//! - [`xlsx::write_workbook`]: one worksheet per table
//! - [`text::write_report`]: the report as a plain-text file
//!
//! The two writes are independent. If the second one fails, the first file stays on disk.

pub mod text;
pub mod xlsx;

pub use text::write_report;
pub use xlsx::write_workbook;
