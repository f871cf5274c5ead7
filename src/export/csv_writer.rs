use crate::config::ExportOptions;
use crate::error::{CleanerError, CleanerResult};
use crate::table::{Scalar, Table};
use std::io::Write;

/// UTF-8 byte order mark, so spreadsheet apps detect the encoding
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

fn delimiter_byte(delimiter: char) -> CleanerResult<u8> {
    if delimiter.is_ascii() {
        Ok(delimiter as u8)
    } else {
        Err(CleanerError::invalid_option_named(
            format!("CSV delimiter must be ASCII, got {:?}", delimiter),
            "delimiter",
        ))
    }
}

/// Write the header and every row; nulls become empty fields
pub fn write_csv<W: Write>(table: &Table, mut writer: W, options: &ExportOptions) -> CleanerResult<()> {
    let delimiter = delimiter_byte(options.delimiter)?;
    if options.bom {
        writer.write_all(UTF8_BOM)?;
    }

    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);
    csv_writer.write_record(table.column_names())?;

    let columns = table.batch().columns();
    let mut record: Vec<String> = Vec::with_capacity(columns.len());
    for row in 0..table.num_rows() {
        record.clear();
        record.extend(columns.iter().map(|array| {
            match Scalar::from_array(array.as_ref(), row) {
                Scalar::Null => String::new(),
                cell => cell.to_string(),
            }
        }));
        csv_writer.write_record(&record)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// CSV output held in memory
pub fn to_csv_bytes(table: &Table, options: &ExportOptions) -> CleanerResult<Vec<u8>> {
    let mut buffer = Vec::new();
    write_csv(table, &mut buffer, options)?;
    Ok(buffer)
}
