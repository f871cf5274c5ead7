use crate::error::{CleanerError, CleanerResult};
use crate::table::{Scalar, Table};
use simple_excel_writer::{Row, Sheet, SheetWriter, Workbook};
use std::path::Path;

/// Excel caps worksheet names at 31 characters
const MAX_SHEET_NAME: usize = 31;

fn sheet_title(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if "[]:*?/\\".contains(c) { '_' } else { c })
        .take(MAX_SHEET_NAME)
        .collect();
    if cleaned.trim().is_empty() {
        "Sheet1".to_string()
    } else {
        cleaned
    }
}

pub(crate) fn cell_row(cells: impl IntoIterator<Item = Scalar>) -> Row {
    let mut row = Row::new();
    for cell in cells {
        match cell {
            Scalar::Null => row.add_cell(()),
            Scalar::Bool(b) => row.add_cell(b),
            Scalar::Int(i) => row.add_cell(i as f64),
            Scalar::Float(f) => row.add_cell(f.into_inner()),
            Scalar::Text(s) => row.add_cell(s),
        }
    }
    row
}

fn write_rows(table: &Table, writer: &mut SheetWriter) -> std::io::Result<()> {
    writer.append_row(cell_row(table.column_names().into_iter().map(Scalar::Text)))?;
    for row in 0..table.num_rows() {
        writer.append_row(cell_row(table.row(row)))?;
    }
    Ok(())
}

fn fill_workbook(workbook: &mut Workbook, table: &Table, sheet_name: &str) -> CleanerResult<()> {
    let mut sheet: Sheet = workbook.create_sheet(&sheet_title(sheet_name));
    workbook.write_sheet(&mut sheet, |writer| write_rows(table, writer))?;
    Ok(())
}

/// Write a single-sheet workbook: numbers as numeric cells, nulls as blanks
pub fn write_excel(table: &Table, path: &Path, sheet_name: &str) -> CleanerResult<()> {
    let target = path.to_str().ok_or_else(|| {
        CleanerError::io_with_path("output path is not valid UTF-8", path.display().to_string())
    })?;
    let mut workbook = Workbook::create(target);
    fill_workbook(&mut workbook, table, sheet_name)?;
    workbook
        .close()
        .map_err(|e| CleanerError::io_with_path(e.to_string(), path.display().to_string()))?;
    Ok(())
}

/// Workbook output held in memory
pub fn to_excel_bytes(table: &Table, sheet_name: &str) -> CleanerResult<Vec<u8>> {
    let mut workbook = Workbook::create_in_memory();
    fill_workbook(&mut workbook, table, sheet_name)?;
    workbook
        .close()?
        .ok_or_else(|| CleanerError::internal("in-memory workbook produced no bytes"))
}
