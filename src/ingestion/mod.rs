//! Loading the raw sales table.
//!
//! Only CSV input is supported; see [`csv::ingest_csv_from_path`]. The pipeline calls it with
//! [`crate::columns::raw_schema`] as the set of required columns.

pub mod csv;

pub use self::csv::{ingest_csv_from_path, ingest_csv_from_reader, MISSING_TOKENS};
