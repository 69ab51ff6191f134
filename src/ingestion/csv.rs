//! CSV ingestion implementation.

use std::path::Path;

use crate::error::{PipelineError, PipelineResult};
use crate::processing::coerce::{parse_date, parse_number};
use crate::types::{DataSet, DataType, Field, Schema, Value};

/// Cell contents read as missing, in addition to the empty cell. Matched after trimming and
/// case-sensitively.
pub const MISSING_TOKENS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN", "<NA>",
    "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Ingest a CSV file into an in-memory [`DataSet`].
///
/// Rules:
///
/// - CSV must have headers.
/// - Headers must contain all `required` fields (order can differ).
/// - The output keeps every column of the file, in file order. Required columns are parsed
///   according to their declared type; any other column is kept as [`DataType::Utf8`].
/// - Cells are trimmed. Empty cells and [`MISSING_TOKENS`] become [`Value::Null`].
pub fn ingest_csv_from_path(path: impl AsRef<Path>, required: &Schema) -> PipelineResult<DataSet> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)?;
    ingest_csv_from_reader(&mut rdr, required)
}

/// Ingest CSV data from an existing CSV reader.
pub fn ingest_csv_from_reader<R: std::io::Read>(
    rdr: &mut csv::Reader<R>,
    required: &Schema,
) -> PipelineResult<DataSet> {
    let headers = rdr.headers()?.clone();
    let header_names: Vec<String> = headers.iter().map(|h| h.trim().to_string()).collect();

    for field in &required.fields {
        if !header_names.iter().any(|h| *h == field.name) {
            return Err(PipelineError::MissingColumn {
                column: field.name.clone(),
                headers: header_names,
            });
        }
    }

    let schema = Schema::new(
        header_names
            .iter()
            .map(|name| match required.index_of(name) {
                Some(idx) => required.fields[idx].clone(),
                None => Field::new(name.clone(), DataType::Utf8),
            })
            .collect(),
    );

    let mut rows: Vec<Vec<Value>> = Vec::new();
    for (row_idx0, result) in rdr.records().enumerate() {
        // Report 1-based row number for users; +1 again because header is row 1.
        let user_row = row_idx0 + 2;
        let record = result?;

        let mut row: Vec<Value> = Vec::with_capacity(schema.fields.len());
        for (csv_idx, field) in schema.fields.iter().enumerate() {
            let raw = record.get(csv_idx).unwrap_or("");
            row.push(parse_typed_value(user_row, &field.name, &field.data_type, raw)?);
        }
        rows.push(row);
    }

    Ok(DataSet::new(schema, rows))
}

fn parse_typed_value(
    row: usize,
    column: &str,
    data_type: &DataType,
    raw: &str,
) -> PipelineResult<Value> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || MISSING_TOKENS.contains(&trimmed) {
        return Ok(Value::Null);
    }

    let parse_err = |message: String| PipelineError::ParseError {
        row,
        column: column.to_owned(),
        raw: raw.to_owned(),
        message,
    };

    match data_type {
        DataType::Utf8 => Ok(Value::Utf8(trimmed.to_owned())),
        DataType::Int64 => trimmed
            .parse::<i64>()
            .map(Value::Int64)
            .map_err(|e| parse_err(e.to_string())),
        DataType::Float64 => parse_number(trimmed)
            .map(Value::Float64)
            .ok_or_else(|| parse_err("expected a finite number".to_string())),
        DataType::Date => parse_date(trimmed)
            .map(Value::Date)
            .ok_or_else(|| parse_err("expected a calendar date".to_string())),
    }
}

