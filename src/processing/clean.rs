//! Cleaning: missing-value defaults, type coercion, invalid-row removal, outlier removal and
//! name normalization.

use crate::columns::{ANNUAL_INCOME, CUSTOMER_NAME, DATE, DEALER_NAME, GENDER, PHONE, PRICE};
use crate::error::{PipelineError, PipelineResult};
use crate::types::{DataSet, DataType, Value};

use super::coerce::{parse_date, parse_number};
use super::reduce::{mean, median, numeric_values, population_std_dev};

pub const UNKNOWN_GENDER: &str = "Unknown";
pub const PHONE_NOT_PROVIDED: &str = "Not Provided";
pub const DEFAULT_ZSCORE_THRESHOLD: f64 = 3.0;

/// Labels of the cleaning steps, in the order [`clean_with_progress`] runs them.
pub const CLEAN_STEPS: [&str; 9] = [
    "fill missing annual income",
    "fill missing gender",
    "fill missing phone",
    "coerce price",
    "coerce date",
    "drop rows without price or date",
    "drop negative prices",
    "remove price outliers",
    "normalize names",
];

/// Run every cleaning step in order.
pub fn clean(dataset: &DataSet, zscore_threshold: f64) -> PipelineResult<DataSet> {
    clean_with_progress(dataset, zscore_threshold, |_| {})
}

/// Like [`clean`], calling `on_step` with the label of each finished step.
pub fn clean_with_progress<F>(
    dataset: &DataSet,
    zscore_threshold: f64,
    mut on_step: F,
) -> PipelineResult<DataSet>
where
    F: FnMut(&'static str),
{
    let mut steps = CLEAN_STEPS.iter().copied();
    let mut done = |ds: DataSet| {
        if let Some(label) = steps.next() {
            on_step(label);
        }
        ds
    };

    let ds = done(fill_missing_median(dataset, ANNUAL_INCOME)?);
    let ds = done(fill_missing_text(&ds, GENDER, UNKNOWN_GENDER)?);
    let ds = done(fill_missing_text(&ds, PHONE, PHONE_NOT_PROVIDED)?);
    let ds = done(coerce_numeric(&ds, PRICE)?);
    let ds = done(coerce_date(&ds, DATE)?);
    let ds = done(drop_nulls(&ds, &[PRICE, DATE])?);
    let ds = done(drop_negative(&ds, PRICE)?);
    let ds = done(remove_outliers(&ds, PRICE, zscore_threshold)?);
    let ds = done(normalize_names(&ds, &[CUSTOMER_NAME, DEALER_NAME])?);
    Ok(ds)
}

/// Replace nulls in a numeric column with the median of its present values.
///
/// A column with no present values is returned unchanged.
pub fn fill_missing_median(dataset: &DataSet, column: &str) -> PipelineResult<DataSet> {
    let idx = dataset.schema.require(column)?;
    let Some(fill) = median(&numeric_values(dataset, idx)) else {
        return Ok(dataset.clone());
    };
    let data_type = dataset.schema.fields[idx].data_type.clone();
    dataset.map_column(column, data_type, |v| match v {
        Value::Null => Value::Float64(fill),
        other => other.clone(),
    })
}

/// Replace nulls in a column with a fixed string.
pub fn fill_missing_text(dataset: &DataSet, column: &str, fill: &str) -> PipelineResult<DataSet> {
    dataset.map_column(column, DataType::Utf8, |v| match v {
        Value::Null => Value::Utf8(fill.to_string()),
        other => other.clone(),
    })
}

/// Convert a column to [`DataType::Float64`]; anything that is not a finite number becomes null.
pub fn coerce_numeric(dataset: &DataSet, column: &str) -> PipelineResult<DataSet> {
    dataset.map_column(column, DataType::Float64, |v| {
        let parsed = match v {
            Value::Float64(f) => Some(*f).filter(|f| f.is_finite()),
            Value::Int64(i) => Some(*i as f64),
            Value::Utf8(s) => parse_number(s),
            _ => None,
        };
        parsed.map(Value::Float64).unwrap_or(Value::Null)
    })
}

/// Convert a column to [`DataType::Date`]; anything that is not a valid date becomes null.
pub fn coerce_date(dataset: &DataSet, column: &str) -> PipelineResult<DataSet> {
    dataset.map_column(column, DataType::Date, |v| {
        let parsed = match v {
            Value::Date(d) => Some(*d),
            Value::Utf8(s) => parse_date(s),
            _ => None,
        };
        parsed.map(Value::Date).unwrap_or(Value::Null)
    })
}

/// Drop rows with a null in any of `columns`.
pub fn drop_nulls(dataset: &DataSet, columns: &[&str]) -> PipelineResult<DataSet> {
    let idxs = columns
        .iter()
        .map(|c| dataset.schema.require(c))
        .collect::<PipelineResult<Vec<_>>>()?;
    Ok(dataset.filter_rows(|row| idxs.iter().all(|&i| !row[i].is_null())))
}

/// Keep rows whose value in `column` is a number `>= 0`.
pub fn drop_negative(dataset: &DataSet, column: &str) -> PipelineResult<DataSet> {
    let idx = dataset.schema.require(column)?;
    Ok(dataset.filter_rows(|row| row[idx].as_f64().is_some_and(|v| v >= 0.0)))
}

/// z-score of every value against the population mean and standard deviation of `values`.
///
/// Fails with [`PipelineError::Numeric`] when `values` is empty or all values are equal.
pub fn zscores(values: &[f64]) -> PipelineResult<Vec<f64>> {
    let (Some(m), Some(sd)) = (mean(values), population_std_dev(values)) else {
        return Err(PipelineError::Numeric {
            message: "cannot compute z-scores of an empty column".to_string(),
        });
    };
    if sd == 0.0 {
        return Err(PipelineError::Numeric {
            message: format!(
                "standard deviation is zero ({} identical values), z-score is undefined",
                values.len()
            ),
        });
    }
    Ok(values.iter().map(|v| (v - m) / sd).collect())
}

/// Drop rows whose value in `column` lies more than `threshold` standard deviations from the
/// mean. Mean and standard deviation are computed once, over all rows of `dataset`.
///
/// `column` must already be numeric with no nulls (see [`coerce_numeric`] and [`drop_nulls`]).
pub fn remove_outliers(dataset: &DataSet, column: &str, threshold: f64) -> PipelineResult<DataSet> {
    let idx = dataset.schema.require(column)?;
    let values = dataset
        .rows
        .iter()
        .map(|row| {
            row[idx].as_f64().ok_or_else(|| PipelineError::Numeric {
                message: format!("column '{column}' has non-numeric values"),
            })
        })
        .collect::<PipelineResult<Vec<_>>>()?;

    let mut z = zscores(&values)?.into_iter();
    Ok(dataset.filter_rows(|_| z.next().is_some_and(|z| z.abs() <= threshold)))
}

/// Trim and title-case text columns.
pub fn normalize_names(dataset: &DataSet, columns: &[&str]) -> PipelineResult<DataSet> {
    columns.iter().try_fold(dataset.clone(), |ds, column| {
        ds.map_column(column, DataType::Utf8, |v| match v {
            Value::Utf8(s) => Value::Utf8(title_case(s.trim())),
            other => other.clone(),
        })
    })
}

/// Upper-case the first letter of every word and lower-case the rest.
///
/// A word starts at any letter that does not follow another letter, so `"o'neil-smith"`
/// becomes `"O'Neil-Smith"`.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_is_letter = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(c);
            prev_is_letter = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Field, Schema};
    use chrono::NaiveDate;

    fn utf8(s: &str) -> Value {
        Value::Utf8(s.to_string())
    }

    fn price_dataset(prices: &[f64]) -> DataSet {
        let schema = Schema::new(vec![Field::new(PRICE, DataType::Float64)]);
        DataSet::new(
            schema,
            prices.iter().map(|p| vec![Value::Float64(*p)]).collect(),
        )
    }

    #[test]
    fn income_nulls_take_the_median_of_present_values() {
        let schema = Schema::new(vec![Field::new(ANNUAL_INCOME, DataType::Float64)]);
        let ds = DataSet::new(
            schema,
            vec![
                vec![Value::Float64(10_000.0)],
                vec![Value::Null],
                vec![Value::Float64(30_000.0)],
                vec![Value::Float64(90_000.0)],
                vec![Value::Float64(20_000.0)],
            ],
        );
        let out = fill_missing_median(&ds, ANNUAL_INCOME).unwrap();
        assert_eq!(out.rows[1][0], Value::Float64(25_000.0));
        assert_eq!(out.rows[0][0], Value::Float64(10_000.0));
    }

    #[test]
    fn income_column_with_no_values_is_left_alone() {
        let schema = Schema::new(vec![Field::new(ANNUAL_INCOME, DataType::Float64)]);
        let ds = DataSet::new(schema, vec![vec![Value::Null]]);
        assert_eq!(fill_missing_median(&ds, ANNUAL_INCOME).unwrap(), ds);
    }

    #[test]
    fn text_defaults_fill_only_nulls() {
        let schema = Schema::new(vec![Field::new(GENDER, DataType::Utf8)]);
        let ds = DataSet::new(schema, vec![vec![Value::Null], vec![utf8("Male")]]);
        let out = fill_missing_text(&ds, GENDER, UNKNOWN_GENDER).unwrap();
        assert_eq!(out.rows, vec![vec![utf8("Unknown")], vec![utf8("Male")]]);
    }

    #[test]
    fn coercion_turns_bad_values_into_nulls() {
        let schema = Schema::new(vec![
            Field::new(PRICE, DataType::Utf8),
            Field::new(DATE, DataType::Utf8),
        ]);
        let ds = DataSet::new(
            schema,
            vec![
                vec![utf8("26000"), utf8("1/2/2022")],
                vec![utf8("abc"), utf8("2022-13-40")],
                vec![Value::Null, utf8("12/31/2023")],
            ],
        );
        let out = coerce_date(&coerce_numeric(&ds, PRICE).unwrap(), DATE).unwrap();
        assert_eq!(out.schema.fields[0].data_type, DataType::Float64);
        assert_eq!(out.schema.fields[1].data_type, DataType::Date);
        assert_eq!(
            out.rows,
            vec![
                vec![
                    Value::Float64(26_000.0),
                    Value::Date(NaiveDate::from_ymd_opt(2022, 1, 2).unwrap())
                ],
                vec![Value::Null, Value::Null],
                vec![
                    Value::Null,
                    Value::Date(NaiveDate::from_ymd_opt(2023, 12, 31).unwrap())
                ],
            ]
        );

        let kept = drop_nulls(&out, &[PRICE, DATE]).unwrap();
        assert_eq!(kept.row_count(), 1);
    }

    #[test]
    fn negative_prices_are_dropped_but_zero_is_kept() {
        let ds = price_dataset(&[-1.0, 0.0, 5.0]);
        let out = drop_negative(&ds, PRICE).unwrap();
        assert_eq!(out.rows, vec![vec![Value::Float64(0.0)], vec![Value::Float64(5.0)]]);
    }

    #[test]
    fn outlier_filter_is_single_pass() {
        // Twenty values near 100, one far value, one moderately far value.
        let mut prices: Vec<f64> = (0..20).map(|i| 100.0 + (i % 5) as f64).collect();
        prices.push(10_000.0);
        prices.push(400.0);
        let ds = price_dataset(&prices);

        let out = remove_outliers(&ds, PRICE, DEFAULT_ZSCORE_THRESHOLD).unwrap();
        assert_eq!(out.row_count(), 21);
        assert!(!out.rows.contains(&vec![Value::Float64(10_000.0)]));
        // 400 would be an outlier against the trimmed set, but trimming is not repeated.
        assert!(out.rows.contains(&vec![Value::Float64(400.0)]));
    }

    #[test]
    fn zero_variance_is_a_numeric_error() {
        let ds = price_dataset(&[5.0, 5.0, 5.0]);
        let err = remove_outliers(&ds, PRICE, DEFAULT_ZSCORE_THRESHOLD).unwrap_err();
        assert!(matches!(err, PipelineError::Numeric { .. }));

        let empty = price_dataset(&[]);
        assert!(matches!(
            remove_outliers(&empty, PRICE, DEFAULT_ZSCORE_THRESHOLD),
            Err(PipelineError::Numeric { .. })
        ));
    }

    #[test]
    fn title_case_matches_word_boundaries() {
        assert_eq!(title_case("geraldine"), "Geraldine");
        assert_eq!(title_case("SAUL MOTORS"), "Saul Motors");
        assert_eq!(title_case("o'brien mc-donald"), "O'Brien Mc-Donald");
        assert_eq!(title_case("1st choice"), "1St Choice");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn names_are_trimmed_and_title_cased() {
        let schema = Schema::new(vec![
            Field::new(CUSTOMER_NAME, DataType::Utf8),
            Field::new(DEALER_NAME, DataType::Utf8),
        ]);
        let ds = DataSet::new(schema, vec![vec![utf8("  jANE doe "), utf8("buddy storbeck's ")]]);
        let out = normalize_names(&ds, &[CUSTOMER_NAME, DEALER_NAME]).unwrap();
        assert_eq!(out.rows[0], vec![utf8("Jane Doe"), utf8("Buddy Storbeck'S")]);
    }
}
