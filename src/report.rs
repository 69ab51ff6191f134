//! The plain-text summary report.
//!
//! A [`Report`] is an append-only list of lines. The pipeline owns one per run, adds to it
//! after loading, after partitioning and after export, and hands it back in
//! [`crate::pipeline::PipelineOutput`].

use std::path::Path;

use crate::processing::partition::Partitions;
use crate::types::DataSet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    lines: Vec<String>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Shape and per-column null counts of the freshly loaded table.
    pub fn record_initial_shape(&mut self, dataset: &DataSet) {
        self.push("=== Initial Dataset Information ===");
        self.push(format!("Total Rows: {}", dataset.row_count()));
        self.push(format!("Total Columns: {}", dataset.column_count()));
        self.push("\nMissing Values:\n");
        self.push(format_missing_counts(&dataset.null_counts()));
    }

    pub fn record_partitions(&mut self, partitions: &Partitions) {
        self.push("\n\n=== Partition Summary ===");
        for (sheet, rows) in partitions.row_counts() {
            self.push(format!("{sheet} Table: {rows} rows"));
        }
    }

    pub fn record_export(&mut self, workbook_path: &Path) {
        self.push("\n\n=== Export Details ===");
        self.push(format!(
            "Data successfully exported to '{}'.",
            workbook_path.display()
        ));
    }

    /// Lines joined by `\n`, without a trailing newline.
    pub fn render(&self) -> String {
        self.lines.join("\n")
    }
}

/// One `name  count` line per column: names left-aligned, counts right-aligned.
fn format_missing_counts(counts: &[(String, usize)]) -> String {
    let name_width = counts.iter().map(|(n, _)| n.chars().count()).max().unwrap_or(0);
    let count_width = counts
        .iter()
        .map(|(_, c)| c.to_string().len())
        .max()
        .unwrap_or(0);
    counts
        .iter()
        .map(|(name, count)| format!("{name:<name_width$}    {count:>count_width$}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::Report;
    use crate::types::{DataSet, DataType, Field, Schema, Value};
    use std::path::Path;

    #[test]
    fn initial_shape_lists_missing_values_per_column() {
        let schema = Schema::new(vec![
            Field::new("Gender", DataType::Utf8),
            Field::new("Annual Income", DataType::Float64),
        ]);
        let ds = DataSet::new(
            schema,
            vec![
                vec![Value::Null, Value::Float64(1.0)],
                vec![Value::Null, Value::Null],
            ],
        );

        let mut report = Report::new();
        report.record_initial_shape(&ds);
        assert_eq!(
            report.render(),
            "=== Initial Dataset Information ===\n\
             Total Rows: 2\n\
             Total Columns: 2\n\
             \nMissing Values:\n\n\
             Gender           2\n\
             Annual Income    1"
        );
    }

    #[test]
    fn lines_are_only_appended() {
        let mut report = Report::new();
        report.push("first");
        report.record_export(Path::new("out.xlsx"));
        assert_eq!(report.lines()[0], "first");
        assert_eq!(
            report.lines().last().map(String::as_str),
            Some("Data successfully exported to 'out.xlsx'.")
        );
        assert!(!report.render().ends_with('\n'));
    }
}
