//! Column statistics for [`crate::types::DataSet`].
//!
//! These are pure functions over the snapshot they are given; the cleaner calls them again on
//! every new snapshot instead of caching anything.

use crate::types::{DataSet, Value};

/// Non-null numeric values of column `idx`, in row order.
pub fn numeric_values(dataset: &DataSet, idx: usize) -> Vec<f64> {
    dataset
        .rows
        .iter()
        .filter_map(|row| row.get(idx).and_then(Value::as_f64))
        .collect()
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

pub fn population_std_dev(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    Some(var.sqrt())
}
