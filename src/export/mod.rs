//! Export - cleaned tables written back out as CSV and/or xlsx
//!
//! Output names follow `{base}_cleaned.{ext}` where `base` is the source
//! file name up to its first dot.

pub mod csv_writer;
pub mod excel_writer;

use crate::config::{ExportFormat, ExportOptions};
use crate::error::{CleanerError, CleanerResult};
use crate::ingestion::file_stem;
use crate::table::Table;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use tracing::info;

pub use csv_writer::{to_csv_bytes, write_csv};
pub use excel_writer::{to_excel_bytes, write_excel};

/// A single output file type
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputKind {
    Csv,
    Excel,
}

impl OutputKind {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputKind::Csv => "csv",
            OutputKind::Excel => "xlsx",
        }
    }
}

impl ExportFormat {
    /// Files this format produces, CSV first
    pub fn outputs(&self) -> Vec<OutputKind> {
        let mut kinds = Vec::with_capacity(2);
        if self.includes_csv() {
            kinds.push(OutputKind::Csv);
        }
        if self.includes_excel() {
            kinds.push(OutputKind::Excel);
        }
        kinds
    }
}

/// `{base}_cleaned.{ext}` for a source file name
pub fn output_file_name(source: &str, kind: OutputKind) -> String {
    format!("{}_cleaned.{}", file_stem(source), kind.extension())
}

/// Write the requested files and return their paths
pub fn export_table(table: &Table, source: &str, options: &ExportOptions) -> CleanerResult<Vec<PathBuf>> {
    let dir = options.out_dir.clone().unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&dir)
        .map_err(|e| CleanerError::io_with_path(e.to_string(), dir.display().to_string()))?;

    let mut written = Vec::new();
    for kind in options.format.outputs() {
        let path = dir.join(output_file_name(source, kind));
        match kind {
            OutputKind::Csv => {
                let file = File::create(&path).map_err(|e| {
                    CleanerError::io_with_path(e.to_string(), path.display().to_string())
                })?;
                write_csv(table, BufWriter::new(file), options)?;
            }
            OutputKind::Excel => write_excel(table, &path, &options.sheet_name)?,
        }
        info!("wrote {} ({} rows)", path.display(), table.num_rows());
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{ArrayRef, Int64Array};
    use std::sync::Arc;

    #[test]
    fn test_output_file_name() {
        assert_eq!(output_file_name("sales.2024.csv", OutputKind::Csv), "sales_cleaned.csv");
        assert_eq!(output_file_name("report.xls", OutputKind::Excel), "report_cleaned.xlsx");
        assert_eq!(output_file_name("combined", OutputKind::Csv), "combined_cleaned.csv");
    }

    #[test]
    fn test_format_outputs() {
        assert_eq!(ExportFormat::Both.outputs(), vec![OutputKind::Csv, OutputKind::Excel]);
        assert_eq!(ExportFormat::Excel.outputs(), vec![OutputKind::Excel]);
    }

    #[test]
    fn test_export_both() {
        let dir = tempfile::tempdir().unwrap();
        let table = Table::from_columns(vec![(
            "n".to_string(),
            Arc::new(Int64Array::from(vec![1, 2, 3])) as ArrayRef,
        )])
        .unwrap();
        let options = ExportOptions {
            out_dir: Some(dir.path().join("out")),
            ..ExportOptions::default()
        };
        let paths = export_table(&table, "data.csv", &options).unwrap();
        assert_eq!(paths.len(), 2);
        assert!(paths[0].ends_with("data_cleaned.csv"));
        assert!(paths[1].ends_with("data_cleaned.xlsx"));
        let csv = std::fs::read(&paths[0]).unwrap();
        assert_eq!(&csv[3..], b"n\n1\n2\n3\n");
    }
}
