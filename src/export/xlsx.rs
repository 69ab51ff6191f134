//! Workbook export.

use std::path::Path;

use chrono::{Datelike, NaiveDate};
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook, Worksheet, XlsxError};

use crate::error::{PipelineError, PipelineResult};
use crate::types::{DataSet, Value};

const EXCEL_YEARS: std::ops::RangeInclusive<u16> = 1900..=9999;

/// Write each `(sheet name, table)` pair to its own worksheet of a new workbook at `path`.
///
/// Every sheet gets a bold header row followed by the data rows; there is no index column.
/// Dates are written as Excel dates (`yyyy-mm-dd`) and nulls as empty cells. Dates outside the
/// years Excel can represent (1900 to 9999) are written as `yyyy-mm-dd` text instead. An existing
/// file at `path` is replaced.
pub fn write_workbook(path: impl AsRef<Path>, sheets: &[(&str, &DataSet)]) -> PipelineResult<()> {
    let path = path.as_ref();
    build_and_save(path, sheets).map_err(|source| PipelineError::Workbook {
        path: path.to_path_buf(),
        source,
    })
}

fn build_and_save(path: &Path, sheets: &[(&str, &DataSet)]) -> Result<(), XlsxError> {
    let header = Format::new().set_bold();
    let date = Format::new().set_num_format("yyyy-mm-dd");

    let mut wb = Workbook::new();
    for (name, dataset) in sheets {
        let ws = wb.add_worksheet();
        ws.set_name(*name)?;
        write_sheet(ws, dataset, &header, &date)?;
    }
    wb.save(path)
}

fn write_sheet(
    ws: &mut Worksheet,
    dataset: &DataSet,
    header: &Format,
    date: &Format,
) -> Result<(), XlsxError> {
    for (col, name) in dataset.schema.field_names().enumerate() {
        ws.write_string_with_format(0, col_num(col)?, name, header)?;
    }

    for (idx0, row) in dataset.rows.iter().enumerate() {
        // Row 0 is the header.
        let r = row_num(idx0 + 1)?;
        for (col, value) in row.iter().enumerate() {
            let c = col_num(col)?;
            match value {
                Value::Null => {}
                Value::Int64(i) => {
                    ws.write_number(r, c, *i as f64)?;
                }
                Value::Float64(f) => {
                    ws.write_number(r, c, *f)?;
                }
                Value::Utf8(s) => {
                    ws.write_string(r, c, s)?;
                }
                Value::Date(d) => match excel_date(d) {
                    Some(dt) => {
                        ws.write_datetime_with_format(r, c, &dt, date)?;
                    }
                    None => {
                        ws.write_string(r, c, d.format("%Y-%m-%d").to_string())?;
                    }
                },
            }
        }
    }
    Ok(())
}

fn excel_date(d: &NaiveDate) -> Option<ExcelDateTime> {
    let year = u16::try_from(d.year()).ok().filter(|y| EXCEL_YEARS.contains(y))?;
    // Month and day of a valid `NaiveDate` always fit in `u8`.
    ExcelDateTime::from_ymd(year, d.month() as u8, d.day() as u8).ok()
}

fn row_num(idx: usize) -> Result<u32, XlsxError> {
    u32::try_from(idx).map_err(|_| XlsxError::RowColumnLimitError)
}

fn col_num(idx: usize) -> Result<u16, XlsxError> {
    u16::try_from(idx).map_err(|_| XlsxError::RowColumnLimitError)
}
