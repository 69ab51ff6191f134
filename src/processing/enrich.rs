//! Derived calendar and customer segmentation columns.

use std::fmt;

use chrono::{Datelike, NaiveDate};

use crate::columns::{ANNUAL_INCOME, DATE, DAY_OF_WEEK, INCOME_SEGMENT, MONTH, QUARTER, YEAR};
use crate::error::PipelineResult;
use crate::types::{DataSet, DataType, Field, Value};

pub const ENRICH_STEPS: [&str; 5] = ["year", "month", "day of week", "quarter", "income segment"];

/// Income bucket. Bounds are left-open and right-closed: `(0, 50k]`, `(50k, 100k]`,
/// `(100k, 200k]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum IncomeSegment {
    Low,
    Medium,
    High,
}

impl IncomeSegment {
    pub fn from_income(income: f64) -> Option<Self> {
        if income.is_nan() || income <= 0.0 {
            None
        } else if income <= 50_000.0 {
            Some(Self::Low)
        } else if income <= 100_000.0 {
            Some(Self::Medium)
        } else if income <= 200_000.0 {
            Some(Self::High)
        } else {
            None
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl fmt::Display for IncomeSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Quarter of the year, 1 to 4.
pub fn quarter(date: NaiveDate) -> u32 {
    (date.month() - 1) / 3 + 1
}

/// Day of the week with Monday as 0 and Sunday as 6.
pub fn day_of_week(date: NaiveDate) -> u32 {
    date.weekday().num_days_from_monday()
}

/// Append every derived column.
pub fn enrich(dataset: &DataSet) -> PipelineResult<DataSet> {
    enrich_with_progress(dataset, |_| {})
}

/// Like [`enrich`], calling `on_step` after each derived column.
pub fn enrich_with_progress<F>(dataset: &DataSet, mut on_step: F) -> PipelineResult<DataSet>
where
    F: FnMut(&'static str),
{
    let date_idx = dataset.schema.require(DATE)?;
    let income_idx = dataset.schema.require(ANNUAL_INCOME)?;

    let calendar: [(&str, fn(NaiveDate) -> i64); 4] = [
        (YEAR, |d: NaiveDate| i64::from(d.year())),
        (MONTH, |d: NaiveDate| i64::from(d.month())),
        (DAY_OF_WEEK, |d: NaiveDate| i64::from(day_of_week(d))),
        (QUARTER, |d: NaiveDate| i64::from(quarter(d))),
    ];

    let mut ds = dataset.clone();
    for ((name, part), label) in calendar.into_iter().zip(ENRICH_STEPS) {
        ds = ds.with_column(Field::new(name, DataType::Int64), |row| match &row[date_idx] {
            Value::Date(d) => Value::Int64(part(*d)),
            _ => Value::Null,
        });
        on_step(label);
    }

    ds = ds.with_column(Field::new(INCOME_SEGMENT, DataType::Utf8), |row| {
        row[income_idx]
            .as_f64()
            .and_then(IncomeSegment::from_income)
            .map(|s| Value::Utf8(s.as_str().to_string()))
            .unwrap_or(Value::Null)
    });
    on_step(ENRICH_STEPS[4]);

    Ok(ds)
}
