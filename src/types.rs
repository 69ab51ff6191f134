//! Core data model types.
//!
//! The pipeline loads the sales CSV into an in-memory [`DataSet`] described by a [`Schema`] (a
//! list of typed [`Field`]s) and every later stage produces a new [`DataSet`] from the previous
//! one.

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::error::{PipelineError, PipelineResult};

/// Logical data type for a schema field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataType {
    /// 64-bit signed integer.
    Int64,
    /// 64-bit floating point number.
    Float64,
    /// UTF-8 string.
    Utf8,
    /// Calendar date without a time component.
    Date,
}

/// A single named, typed field in a [`Schema`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Field/column name.
    pub name: String,
    /// Field data type.
    pub data_type: DataType,
}

impl Field {
    /// Create a new field.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// An ordered list of fields describing the shape of a [`DataSet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    /// Ordered list of fields.
    pub fields: Vec<Field>,
}

impl Schema {
    /// Create a new schema from fields.
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Iterate field names in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Returns the index of a field by name, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Like [`Schema::index_of`], but a missing field is a [`PipelineError::MissingColumn`].
    pub fn require(&self, name: &str) -> PipelineResult<usize> {
        self.index_of(name).ok_or_else(|| PipelineError::MissingColumn {
            column: name.to_string(),
            headers: self.field_names().map(str::to_string).collect(),
        })
    }
}

/// A single typed value in a [`DataSet`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Missing/empty value.
    Null,
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit float.
    Float64(f64),
    /// UTF-8 string.
    Utf8(String),
    /// Calendar date.
    Date(NaiveDate),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Numeric view of the value; integers are widened, everything else is `None`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float64(v) => Some(*v),
            Value::Int64(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Utf8(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

/// Hashable stand-in for a [`Value`], used for row de-duplication.
///
/// Floats compare by bit pattern after folding `-0.0` into `0.0` and every NaN into one NaN, so
/// two missing-looking values land in the same bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum ValueKey<'a> {
    Null,
    Int64(i64),
    Float64(u64),
    Utf8(&'a str),
    Date(NaiveDate),
}

impl<'a> From<&'a Value> for ValueKey<'a> {
    fn from(v: &'a Value) -> Self {
        match v {
            Value::Null => ValueKey::Null,
            Value::Int64(i) => ValueKey::Int64(*i),
            Value::Float64(f) => {
                let f = if f.is_nan() {
                    f64::NAN
                } else if *f == 0.0 {
                    0.0
                } else {
                    *f
                };
                ValueKey::Float64(f.to_bits())
            }
            Value::Utf8(s) => ValueKey::Utf8(s.as_str()),
            Value::Date(d) => ValueKey::Date(*d),
        }
    }
}

/// In-memory tabular dataset.
///
/// Rows are stored as `Vec<Vec<Value>>` in the same order as the [`Schema`] fields.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSet {
    /// Schema describing row shape.
    pub schema: Schema,
    /// Row-major value storage.
    pub rows: Vec<Vec<Value>>,
}

impl DataSet {
    /// Create a dataset from schema and rows.
    pub fn new(schema: Schema, rows: Vec<Vec<Value>>) -> Self {
        Self { schema, rows }
    }

    /// Number of rows in the dataset.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns in the dataset.
    pub fn column_count(&self) -> usize {
        self.schema.fields.len()
    }

    /// Create a new dataset containing only rows that match `predicate`.
    ///
    /// The returned dataset preserves the original schema.
    pub fn filter_rows<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&[Value]) -> bool,
    {
        let rows = self
            .rows
            .iter()
            .filter(|row| predicate(row.as_slice()))
            .cloned()
            .collect();
        Self {
            schema: self.schema.clone(),
            rows,
        }
    }

    /// Reduce (fold) all rows into an accumulator value.
    ///
    /// This is similar to `Iterator::fold`, but provides each row as `&[Value]`.
    pub fn reduce_rows<A, F>(&self, init: A, mut reducer: F) -> A
    where
        F: FnMut(A, &[Value]) -> A,
    {
        self.rows
            .iter()
            .fold(init, |acc, row| reducer(acc, row.as_slice()))
    }

    /// Iterate the values of one column.
    pub fn column_values(&self, name: &str) -> PipelineResult<impl Iterator<Item = &Value>> {
        let idx = self.schema.require(name)?;
        Ok(self.rows.iter().map(move |row| &row[idx]))
    }

    /// Rewrite a single column in place of the old one, optionally changing its type.
    pub fn map_column<F>(&self, name: &str, data_type: DataType, mut f: F) -> PipelineResult<Self>
    where
        F: FnMut(&Value) -> Value,
    {
        let idx = self.schema.require(name)?;
        let mut schema = self.schema.clone();
        schema.fields[idx].data_type = data_type;

        let rows = self
            .rows
            .iter()
            .map(|row| {
                let mut out = row.clone();
                out[idx] = f(&row[idx]);
                out
            })
            .collect();
        Ok(Self { schema, rows })
    }

    /// Append a derived column computed from each row.
    pub fn with_column<F>(&self, field: Field, mut f: F) -> Self
    where
        F: FnMut(&[Value]) -> Value,
    {
        let mut schema = self.schema.clone();
        schema.fields.push(field);

        let rows = self
            .rows
            .iter()
            .map(|row| {
                let mut out = Vec::with_capacity(row.len() + 1);
                out.extend_from_slice(row);
                out.push(f(row.as_slice()));
                out
            })
            .collect();
        Self { schema, rows }
    }

    /// Project the dataset onto `names`, in that order.
    pub fn select(&self, names: &[&str]) -> PipelineResult<Self> {
        let idxs = names
            .iter()
            .map(|n| self.schema.require(n))
            .collect::<PipelineResult<Vec<_>>>()?;

        let schema = Schema::new(idxs.iter().map(|&i| self.schema.fields[i].clone()).collect());
        let rows = self
            .rows
            .iter()
            .map(|row| idxs.iter().map(|&i| row[i].clone()).collect())
            .collect();
        Ok(Self { schema, rows })
    }

    /// Drop rows that are fully equal to an earlier row. Order of first occurrence is kept.
    pub fn distinct(&self) -> Self {
        let mut seen: HashSet<Vec<ValueKey<'_>>> = HashSet::with_capacity(self.rows.len());
        let mut rows = Vec::new();
        for row in &self.rows {
            let key: Vec<ValueKey<'_>> = row.iter().map(ValueKey::from).collect();
            if seen.insert(key) {
                rows.push(row.clone());
            }
        }
        Self {
            schema: self.schema.clone(),
            rows,
        }
    }

    /// Count of [`Value::Null`] cells per column, in schema order.
    pub fn null_counts(&self) -> Vec<(String, usize)> {
        let counts = self.reduce_rows(vec![0usize; self.column_count()], |mut acc, row| {
            for (count, value) in acc.iter_mut().zip(row) {
                if value.is_null() {
                    *count += 1;
                }
            }
            acc
        });
        self.schema
            .field_names()
            .map(str::to_string)
            .zip(counts)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{DataSet, DataType, Field, Schema, Value};
    use crate::error::PipelineError;

    fn sample_dataset() -> DataSet {
        let schema = Schema::new(vec![
            Field::new("id", DataType::Int64),
            Field::new("name", DataType::Utf8),
            Field::new("score", DataType::Float64),
        ]);

        let rows = vec![
            vec![Value::Int64(1), Value::Utf8("a".to_string()), Value::Float64(1.5)],
            vec![Value::Int64(2), Value::Null, Value::Float64(0.0)],
            vec![Value::Int64(1), Value::Utf8("a".to_string()), Value::Float64(1.5)],
            vec![Value::Int64(2), Value::Null, Value::Float64(-0.0)],
        ];

        DataSet::new(schema, rows)
    }

    #[test]
    fn require_reports_missing_column_with_headers() {
        let ds = sample_dataset();
        assert_eq!(ds.schema.require("name").unwrap(), 1);
        match ds.schema.require("missing").unwrap_err() {
            PipelineError::MissingColumn { column, headers } => {
                assert_eq!(column, "missing");
                assert_eq!(headers, vec!["id", "name", "score"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn distinct_keeps_first_occurrence_and_treats_nulls_as_equal() {
        let ds = sample_dataset();
        let out = ds.distinct();
        assert_eq!(out.row_count(), 2);
        assert_eq!(out.rows[0], ds.rows[0]);
        assert_eq!(out.rows[1], ds.rows[1]);
        // Idempotent.
        assert_eq!(out.distinct(), out);
    }

    #[test]
    fn select_projects_in_requested_order() {
        let ds = sample_dataset();
        let out = ds.select(&["score", "id"]).unwrap();
        assert_eq!(out.schema.field_names().collect::<Vec<_>>(), vec!["score", "id"]);
        assert_eq!(out.rows[0], vec![Value::Float64(1.5), Value::Int64(1)]);
        assert!(ds.select(&["id", "nope"]).is_err());
    }

    #[test]
    fn map_column_changes_type_and_values() {
        let ds = sample_dataset();
        let out = ds
            .map_column("id", DataType::Utf8, |v| match v {
                Value::Int64(i) => Value::Utf8(format!("#{i}")),
                other => other.clone(),
            })
            .unwrap();
        assert_eq!(out.schema.fields[0].data_type, DataType::Utf8);
        assert_eq!(out.rows[1][0], Value::Utf8("#2".to_string()));
        // Original unchanged
        assert_eq!(ds.rows[1][0], Value::Int64(2));
    }

    #[test]
    fn with_column_appends_a_derived_field() {
        let ds = sample_dataset();
        let with = ds.with_column(Field::new("double", DataType::Float64), |row| {
            row[2].as_f64().map(|v| Value::Float64(v * 2.0)).unwrap_or(Value::Null)
        });
        assert_eq!(with.column_count(), 4);
        assert_eq!(with.rows[0][3], Value::Float64(3.0));
        assert_eq!(with.rows[1][3], Value::Float64(0.0));
        assert_eq!(with.select(&["id", "name", "score"]).unwrap(), ds);
    }

    #[test]
    fn null_counts_are_per_column() {
        let ds = sample_dataset();
        assert_eq!(
            ds.null_counts(),
            vec![
                ("id".to_string(), 0),
                ("name".to_string(), 2),
                ("score".to_string(), 0)
            ]
        );
    }
}
