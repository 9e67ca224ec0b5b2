//! CSV serialization of [`CsvTable`]

use csv::{Terminator, WriterBuilder};

use crate::table::DEFAULT_DELIMITER;
use crate::types::*;

/// Serialize a statement with the default `;` delimiter
pub fn serialize_statement(table: &CsvTable) -> ReconcileResult<String> {
    serialize_table(table, DEFAULT_DELIMITER)
}

/// Serialize a table, header first, columns in header order
///
/// A row missing one of the header columns writes an empty field for it.
pub fn serialize_table(table: &CsvTable, delimiter: u8) -> ReconcileResult<String> {
    if table.headers.is_empty() {
        return Ok(String::new());
    }

    let mut writer = WriterBuilder::new()
        .delimiter(delimiter)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer
        .write_record(&table.headers)
        .map_err(|e| ReconcileError::Storage(format!("Cannot encode CSV header: {}", e)))?;

    for (idx, row) in table.rows.iter().enumerate() {
        writer
            .write_record(table.headers.iter().map(|header| row.get(header)))
            .map_err(|e| ReconcileError::Storage(format!("Cannot encode CSV row {}: {}", idx, e)))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ReconcileError::Storage(format!("Cannot flush CSV output: {}", e)))?;
    String::from_utf8(bytes)
        .map_err(|e| ReconcileError::Storage(format!("CSV output is not UTF-8: {}", e)))
}
