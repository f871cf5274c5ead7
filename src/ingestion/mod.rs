//! Ingestion - turns uploaded files into tables
//!
//! Delimited text goes through the `csv` crate after line skipping and
//! delimiter sniffing; workbooks go through `calamine`.

pub mod sniff;
pub mod text_reader;
pub mod workbook_reader;

use crate::config::ReadOptions;
use crate::error::{CleanerError, CleanerResult};
use crate::table::Table;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

pub use sniff::sniff_delimiter;

/// Input file format, decided by extension
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileFormat {
    Csv,
    Tsv,
    Txt,
    Dat,
    Xlsx,
    Xlsm,
    Xls,
    Ods,
}

impl FileFormat {
    /// Format from the lowercase extension after the final dot of a file name
    pub fn from_name(name: &str) -> CleanerResult<Self> {
        let extension = name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "csv" => Ok(FileFormat::Csv),
            "tsv" => Ok(FileFormat::Tsv),
            "txt" => Ok(FileFormat::Txt),
            "dat" => Ok(FileFormat::Dat),
            "xlsx" => Ok(FileFormat::Xlsx),
            "xlsm" => Ok(FileFormat::Xlsm),
            "xls" => Ok(FileFormat::Xls),
            "ods" => Ok(FileFormat::Ods),
            _ => Err(CleanerError::unsupported_format(extension)),
        }
    }

    pub fn from_path(path: &Path) -> CleanerResult<Self> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::from_name(&name)
    }

    /// Delimited text (as opposed to a workbook)
    pub fn is_text(&self) -> bool {
        matches!(
            self,
            FileFormat::Csv | FileFormat::Tsv | FileFormat::Txt | FileFormat::Dat
        )
    }
}

/// A parsed file together with where it came from
#[derive(Clone, Debug)]
pub struct LoadedTable {
    /// File name as uploaded (no directory)
    pub name: String,
    pub format: FileFormat,
    /// Delimiter used for text formats
    pub delimiter: Option<u8>,
    pub table: Table,
}

impl LoadedTable {
    pub fn new(name: impl Into<String>, format: FileFormat, table: Table) -> Self {
        Self {
            name: name.into(),
            format,
            delimiter: None,
            table,
        }
    }

    /// File name up to its first dot (`sales.2024.csv` -> `sales`)
    pub fn stem(&self) -> &str {
        file_stem(&self.name)
    }
}

/// File name up to its first dot
pub fn file_stem(name: &str) -> &str {
    name.split('.').next().unwrap_or(name)
}

/// Load a file from disk
pub fn load_table(path: impl AsRef<Path>, options: &ReadOptions) -> CleanerResult<LoadedTable> {
    let path = path.as_ref();
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let format = FileFormat::from_path(path)?;

    let loaded = if format.is_text() {
        let bytes = std::fs::read(path).map_err(|e| {
            CleanerError::io_with_path(e.to_string(), path.display().to_string())
        })?;
        load_text(&name, format, &bytes, options)?
    } else {
        let table = workbook_reader::read_workbook(path, options)?;
        LoadedTable::new(&name, format, table)
    };
    log_loaded(&loaded);
    Ok(loaded)
}

/// Load an in-memory upload; the format comes from `name`'s extension
pub fn load_bytes(name: &str, bytes: Vec<u8>, options: &ReadOptions) -> CleanerResult<LoadedTable> {
    let format = FileFormat::from_name(name)?;
    let loaded = if format.is_text() {
        load_text(name, format, &bytes, options)?
    } else {
        let table = workbook_reader::read_workbook_bytes(bytes, options)?;
        LoadedTable::new(name, format, table)
    };
    log_loaded(&loaded);
    Ok(loaded)
}

/// Worksheet names of a workbook; text files have none
pub fn sheet_names(path: impl AsRef<Path>) -> CleanerResult<Vec<String>> {
    let path = path.as_ref();
    if FileFormat::from_path(path)?.is_text() {
        return Ok(Vec::new());
    }
    workbook_reader::workbook_sheet_names(path)
}

fn load_text(
    name: &str,
    format: FileFormat,
    bytes: &[u8],
    options: &ReadOptions,
) -> CleanerResult<LoadedTable> {
    let (table, delimiter) = text_reader::read_delimited(bytes, options)
        .map_err(|e| e.with_context(name.to_string()))?;
    tracing::debug!(file = name, delimiter = %(delimiter as char).escape_default(), "parsed delimited text");
    let mut loaded = LoadedTable::new(name, format, table);
    loaded.delimiter = Some(delimiter);
    Ok(loaded)
}

fn log_loaded(loaded: &LoadedTable) {
    let (rows, cols) = loaded.table.shape();
    info!("loaded {}: {} rows, {} columns", loaded.name, rows, cols);
}

/// Separate the header row from the data rows.
///
/// Rows above the header are discarded; `None` keeps every row as data.
pub(crate) fn split_header<T>(
    mut rows: Vec<T>,
    header_row: Option<usize>,
) -> CleanerResult<(Option<T>, Vec<T>)> {
    match header_row {
        None => Ok((None, rows)),
        Some(h) if h >= rows.len() => Err(CleanerError::invalid_option_named(
            format!(
                "header row {} is past the end of the data ({} rows after skipping)",
                h,
                rows.len()
            ),
            "header_row",
        )),
        Some(h) => {
            let data = rows.split_off(h + 1);
            let header = rows.pop();
            Ok((header, data))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_name() {
        assert_eq!(FileFormat::from_name("a.CSV").unwrap(), FileFormat::Csv);
        assert_eq!(FileFormat::from_name("report.v2.xlsx").unwrap(), FileFormat::Xlsx);
        assert!(FileFormat::from_name("notes.pdf").is_err());
        assert!(FileFormat::from_name("README").is_err());
        assert!(FileFormat::Dat.is_text());
        assert!(!FileFormat::Ods.is_text());
    }

    #[test]
    fn test_file_stem_cuts_at_first_dot() {
        assert_eq!(file_stem("sales.2024.csv"), "sales");
        assert_eq!(file_stem("plain"), "plain");
    }

    #[test]
    fn test_split_header() {
        let (header, data) = split_header(vec![1, 2, 3, 4], Some(1)).unwrap();
        assert_eq!(header, Some(2));
        assert_eq!(data, vec![3, 4]);
        let (header, data) = split_header(vec![1, 2], None).unwrap();
        assert_eq!(header, None);
        assert_eq!(data, vec![1, 2]);
        assert!(split_header(vec![1], Some(1)).is_err());
    }

    #[test]
    fn test_load_bytes_text() {
        let loaded = load_bytes("data.tsv", b"a\tb\n1\t2\n".to_vec(), &ReadOptions::default()).unwrap();
        assert_eq!(loaded.delimiter, Some(b'\t'));
        assert_eq!(loaded.table.shape(), (1, 2));
        assert_eq!(loaded.stem(), "data");
    }
}
