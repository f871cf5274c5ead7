use crate::config::ReadOptions;
use crate::error::{CleanerError, CleanerResult};
use crate::ingestion::split_header;
use crate::table::column::{dedupe_headers, infer_text_column};
use crate::table::Table;
use arrow::array::ArrayRef;
use csv::ReaderBuilder;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Drop the first `n` physical lines
fn skip_lines(bytes: &[u8], n: usize) -> &[u8] {
    let mut rest = bytes;
    for _ in 0..n {
        match rest.iter().position(|&b| b == b'\n') {
            Some(pos) => rest = &rest[pos + 1..],
            None => return &[],
        }
    }
    rest
}

/// One parsed record with its physical line number (1-based)
struct TextRow {
    line: usize,
    fields: Vec<String>,
}

/// Parse delimited text into a table, returning the delimiter actually used
pub fn read_delimited(bytes: &[u8], options: &ReadOptions) -> CleanerResult<(Table, u8)> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let body = skip_lines(bytes, options.skip_rows);
    let delimiter = options.delimiter.resolve(body)?;

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(body);

    let mut rows = Vec::new();
    for result in reader.byte_records() {
        let record = result.map_err(|e| {
            let line = e.position().map(|p| p.line() as usize + options.skip_rows);
            CleanerError::Parse {
                message: e.to_string(),
                line,
                context: None,
            }
        })?;
        if record.len() == 1 && record[0].is_empty() {
            continue;
        }
        let line = record
            .position()
            .map(|p| p.line() as usize + options.skip_rows)
            .unwrap_or(0);
        let fields = record
            .iter()
            .map(|f| String::from_utf8_lossy(f).into_owned())
            .collect();
        rows.push(TextRow { line, fields });
    }

    if rows.is_empty() {
        return Err(CleanerError::parse("no columns to parse from file"));
    }

    let (header, data) = split_header(rows, options.header_row)?;
    let names = match header {
        Some(header) => dedupe_headers(header.fields.into_iter().map(Some).collect()),
        None => {
            let width = data.iter().map(|r| r.fields.len()).max().unwrap_or(0);
            (0..width).map(|i| i.to_string()).collect()
        }
    };
    let width = names.len();

    let mut cells: Vec<Vec<Option<String>>> = vec![Vec::with_capacity(data.len()); width];
    for row in &data {
        let extra = row.fields.iter().skip(width);
        if extra.clone().any(|f| !f.trim().is_empty()) {
            return Err(CleanerError::parse_at_line(
                format!(
                    "expected {} fields in line {}, saw {}",
                    width,
                    row.line,
                    row.fields.len()
                ),
                row.line,
            ));
        }
        for (col, column_cells) in cells.iter_mut().enumerate() {
            column_cells.push(row.fields.get(col).cloned());
        }
    }

    let columns: Vec<(String, ArrayRef)> = names
        .into_iter()
        .zip(cells)
        .map(|(name, column_cells)| (name, infer_text_column(column_cells)))
        .collect();
    let table = Table::from_columns_with_rows(columns, data.len())?;
    Ok((table, delimiter))
}
