/// Result previews for the terminal
/// Gives a cheap look at a table without printing every row
use crate::table::{Scalar, Table};
use serde::{Deserialize, Serialize};

/// How much of a table to show
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ResultFormat {
    /// Full results (all rows) - default
    #[default]
    Full,
    /// Summary only (counts + numeric statistics, no rows)
    Summary,
    /// First N rows + summary
    Sample(usize),
    /// Metadata only (shape + column names)
    Metadata,
}

/// Formatted preview of a table
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FormattedResult {
    /// Summary text (for Summary/Sample/Metadata modes)
    pub summary: Option<String>,
    /// Sample rows (for Sample mode)
    pub sample_rows: Vec<Vec<String>>,
    /// Full rows (for Full mode only)
    pub full_rows: Vec<Vec<String>>,
    /// Column names
    pub columns: Vec<String>,
    /// Total row count
    pub row_count: usize,
    /// Whether this is a summary (not full results)
    pub is_summary: bool,
}

impl FormattedResult {
    /// Rows to display, whichever mode produced them
    pub fn rows(&self) -> &[Vec<String>] {
        if self.is_summary {
            &self.sample_rows
        } else {
            &self.full_rows
        }
    }
}

/// Format a table based on ResultFormat
pub fn format_results(table: &Table, format: ResultFormat) -> FormattedResult {
    let columns = table.column_names();
    let row_count = table.num_rows();

    match format {
        ResultFormat::Full => FormattedResult {
            summary: None,
            sample_rows: vec![],
            full_rows: table_rows(table, row_count),
            columns,
            row_count,
            is_summary: false,
        },
        ResultFormat::Summary => FormattedResult {
            summary: Some(generate_summary(table)),
            sample_rows: vec![],
            full_rows: vec![],
            columns,
            row_count,
            is_summary: true,
        },
        ResultFormat::Sample(n) => FormattedResult {
            summary: Some(generate_summary(table)),
            sample_rows: table_rows(table, n),
            full_rows: vec![],
            columns,
            row_count,
            is_summary: true,
        },
        ResultFormat::Metadata => {
            let summary = format!(
                "Table has {} rows, {} columns: [{}]",
                row_count,
                columns.len(),
                columns.join(", ")
            );
            FormattedResult {
                summary: Some(summary),
                sample_rows: vec![],
                full_rows: vec![],
                columns,
                row_count,
                is_summary: true,
            }
        }
    }
}

/// First `limit` rows as display strings
fn table_rows(table: &Table, limit: usize) -> Vec<Vec<String>> {
    (0..table.num_rows().min(limit))
        .map(|row| table.row(row).iter().map(format_cell).collect())
        .collect()
}

fn format_cell(cell: &Scalar) -> String {
    match cell {
        Scalar::Null => "NULL".to_string(),
        other => other.to_string(),
    }
}

/// Generate summary text for a table
fn generate_summary(table: &Table) -> String {
    let columns = table.column_names();
    if table.num_rows() == 0 {
        return format!("Table has 0 rows. Columns: [{}]", columns.join(", "));
    }

    // Statistics for numeric columns
    let stats: Vec<String> = table
        .column_summaries()
        .into_iter()
        .filter_map(|summary| {
            let array = table.column(&summary.name).ok()?;
            let values: Vec<f64> = (0..array.len())
                .filter_map(|i| Scalar::from_array(array.as_ref(), i).as_f64())
                .filter(|v| !v.is_nan())
                .collect();
            let (min, max) = summary.bounds?;
            let avg = values.iter().sum::<f64>() / values.len() as f64;
            Some(format!(
                "{}: avg={:.2}, min={:.2}, max={:.2}",
                summary.name, avg, min, max
            ))
        })
        .collect();

    let stats_text = if stats.is_empty() {
        String::new()
    } else {
        format!(" Statistics: {}", stats.join("; "))
    };

    format!(
        "Table has {} rows, {} columns: [{}].{}",
        table.num_rows(),
        columns.len(),
        columns.join(", "),
        stats_text
    )
}

/// Widest cell shown before truncation
const MAX_CELL_WIDTH: usize = 24;

fn clip(cell: &str) -> String {
    if cell.chars().count() <= MAX_CELL_WIDTH {
        cell.to_string()
    } else {
        let mut clipped: String = cell.chars().take(MAX_CELL_WIDTH - 1).collect();
        clipped.push('…');
        clipped
    }
}

/// Fixed-width text grid with the summary line underneath
pub fn render_text(result: &FormattedResult) -> String {
    let mut out = String::new();
    let rows = result.rows();

    if !result.columns.is_empty() && (!rows.is_empty() || !result.is_summary) {
        let header: Vec<String> = result.columns.iter().map(|c| clip(c)).collect();
        let body: Vec<Vec<String>> = rows
            .iter()
            .map(|row| row.iter().map(|c| clip(c)).collect())
            .collect();
        let widths: Vec<usize> = (0..header.len())
            .map(|i| {
                body.iter()
                    .filter_map(|row| row.get(i))
                    .chain(std::iter::once(&header[i]))
                    .map(|cell| cell.chars().count())
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let line = |cells: &[String]| -> String {
            cells
                .iter()
                .zip(&widths)
                .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
                .collect::<Vec<_>>()
                .join(" | ")
                .trim_end()
                .to_string()
        };
        out.push_str(&line(&header));
        out.push('\n');
        out.push_str(
            &widths
                .iter()
                .map(|w| "-".repeat(*w))
                .collect::<Vec<_>>()
                .join("-+-"),
        );
        out.push('\n');
        for row in &body {
            out.push_str(&line(row));
            out.push('\n');
        }
        if rows.len() < result.row_count {
            out.push_str(&format!("... {} more rows\n", result.row_count - rows.len()));
        }
    }

    if let Some(summary) = &result.summary {
        out.push_str(summary);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{ArrayRef, Float64Array, StringArray};
    use std::sync::Arc;

    fn table() -> Table {
        Table::from_columns(vec![
            (
                "name".to_string(),
                Arc::new(StringArray::from(vec![Some("ann"), None, Some("cy")])) as ArrayRef,
            ),
            (
                "score".to_string(),
                Arc::new(Float64Array::from(vec![1.0, 2.0, 6.0])) as ArrayRef,
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_full_and_sample() {
        let full = format_results(&table(), ResultFormat::Full);
        assert!(!full.is_summary);
        assert_eq!(full.full_rows[1], vec!["NULL", "2.0"]);

        let sample = format_results(&table(), ResultFormat::Sample(2));
        assert_eq!(sample.sample_rows.len(), 2);
        assert_eq!(sample.row_count, 3);
        assert!(sample
            .summary
            .unwrap()
            .contains("score: avg=3.00, min=1.00, max=6.00"));
    }

    #[test]
    fn test_metadata() {
        let meta = format_results(&table(), ResultFormat::Metadata);
        assert_eq!(meta.summary.as_deref(), Some("Table has 3 rows, 2 columns: [name, score]"));
    }

    #[test]
    fn test_render_grid() {
        let text = render_text(&format_results(&table(), ResultFormat::Sample(2)));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "name | score");
        assert_eq!(lines[1], "-----+------");
        assert_eq!(lines[2], "ann  | 1.0");
        assert_eq!(lines[4], "... 1 more rows");
        assert!(lines[5].starts_with("Table has 3 rows"));
    }

    #[test]
    fn test_clip_long_cells() {
        let long = "x".repeat(40);
        assert_eq!(clip(&long).chars().count(), MAX_CELL_WIDTH);
    }
}
