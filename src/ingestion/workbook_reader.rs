use crate::config::ReadOptions;
use crate::error::{CleanerError, CleanerResult};
use crate::ingestion::split_header;
use crate::table::column::{build_scalar_column, dedupe_headers};
use crate::table::{Scalar, Table};
use arrow::array::ArrayRef;
use calamine::{open_workbook_auto, open_workbook_auto_from_rs, Data, DataType, Reader, Sheets};
use std::io::{Cursor, Read, Seek};
use std::path::Path;

/// Read one worksheet of a workbook on disk
pub fn read_workbook(path: &Path, options: &ReadOptions) -> CleanerResult<Table> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| CleanerError::from(e).with_context(path.display().to_string()))?;
    read_sheet(&mut workbook, options)
}

/// Read one worksheet of an in-memory workbook (e.g. an upload)
pub fn read_workbook_bytes(bytes: Vec<u8>, options: &ReadOptions) -> CleanerResult<Table> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    read_sheet(&mut workbook, options)
}

/// List the worksheet names of a workbook
pub fn workbook_sheet_names(path: &Path) -> CleanerResult<Vec<String>> {
    let workbook = open_workbook_auto(path)?;
    Ok(workbook.sheet_names())
}

fn read_sheet<RS: Read + Seek>(workbook: &mut Sheets<RS>, options: &ReadOptions) -> CleanerResult<Table> {
    let sheet_names = workbook.sheet_names();
    let sheet = match &options.sheet {
        Some(name) => {
            if !sheet_names.iter().any(|s| s == name) {
                return Err(CleanerError::invalid_option_named(
                    format!("sheet '{}' not found (sheets: {})", name, sheet_names.join(", ")),
                    "sheet",
                ));
            }
            name.clone()
        }
        None => sheet_names
            .first()
            .cloned()
            .ok_or_else(|| CleanerError::parse("workbook has no sheets"))?,
    };
    tracing::debug!(sheet = %sheet, "reading worksheet");

    let range = workbook.worksheet_range(&sheet)?;

    // Rows are numbered from the top of the sheet, not from the first used cell
    let leading_blank = range.start().map(|(row, _)| row as usize).unwrap_or(0);
    let mut rows: Vec<Vec<Scalar>> = vec![Vec::new(); leading_blank];
    rows.extend(range.rows().map(|cells| cells.iter().map(cell_scalar).collect::<Vec<_>>()));

    let rows: Vec<Vec<Scalar>> = rows.into_iter().skip(options.skip_rows).collect();
    if rows.is_empty() {
        return Err(CleanerError::parse(format!("sheet '{}' has no rows to parse", sheet)));
    }

    let (header, data) = split_header(rows, options.header_row)?;
    let width = header
        .as_ref()
        .map(|h| h.len())
        .unwrap_or(0)
        .max(data.iter().map(|r| r.len()).max().unwrap_or(0));
    let names = match header {
        Some(header) => {
            let mut raw: Vec<Option<String>> = header.iter().map(header_text).collect();
            raw.resize(width, None);
            dedupe_headers(raw)
        }
        None => (0..width).map(|i| i.to_string()).collect(),
    };

    let columns: Vec<(String, ArrayRef)> = names
        .into_iter()
        .enumerate()
        .map(|(col, name)| {
            let cells: Vec<Scalar> = data
                .iter()
                .map(|row| row.get(col).cloned().unwrap_or(Scalar::Null))
                .collect();
            (name, build_scalar_column(&cells))
        })
        .collect();
    Table::from_columns_with_rows(columns, data.len())
}

fn cell_scalar(cell: &Data) -> Scalar {
    match cell {
        Data::Int(i) => Scalar::Int(*i),
        Data::Float(f) => Scalar::float(*f),
        Data::Bool(b) => Scalar::Bool(*b),
        Data::String(s) if s.trim().is_empty() => Scalar::Null,
        Data::String(s) => Scalar::Text(s.clone()),
        Data::DateTime(_) => cell
            .as_datetime()
            .map(|dt| Scalar::Text(dt.format("%Y-%m-%d %H:%M:%S").to_string()))
            .unwrap_or(Scalar::Null),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Scalar::Text(s.clone()),
        Data::Error(_) | Data::Empty => Scalar::Null,
    }
}

/// Header cells print integral floats without a decimal (a year header stays "2020")
fn header_text(cell: &Scalar) -> Option<String> {
    match cell {
        Scalar::Null => None,
        Scalar::Float(v) if v.0.fract() == 0.0 && v.0.abs() < 1e16 => Some(format!("{}", v.0 as i64)),
        other => Some(other.to_string()),
    }
}
