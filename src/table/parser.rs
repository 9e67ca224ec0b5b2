//! CSV parsing into [`CsvTable`]
//!
//! A malformed file does not fail the parse: rows read before the problem are
//! kept and the problem is handed back next to them, leaving the caller to
//! decide whether a partial table is acceptable.

use csv::{ReaderBuilder, StringRecord};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::table::DEFAULT_DELIMITER;
use crate::types::*;

/// Why parsing stopped early
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvParseError {
    /// 1-based line in the file where the problem was found, when known
    pub line: Option<u64>,
    pub message: String,
}

impl fmt::Display for CsvParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "line {}: {}", line, self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for CsvParseError {}

impl From<csv::Error> for CsvParseError {
    fn from(error: csv::Error) -> Self {
        Self {
            line: error.position().map(|position| position.line()),
            message: error.to_string(),
        }
    }
}

/// Result of a parse: every row read, plus the error that stopped it, if any
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedTable {
    pub table: CsvTable,
    pub error: Option<CsvParseError>,
}

impl ParsedTable {
    /// Whether the whole input was consumed without error
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }

    /// Keep the rows read so far, logging the error that cut the parse short
    pub fn into_table_lossy(self, file_name: &str) -> CsvTable {
        if let Some(error) = &self.error {
            tracing::warn!(
                file = file_name,
                rows = self.table.len(),
                "statement parsed partially: {}",
                error
            );
        }
        self.table
    }
}

/// Parse a statement with the default `;` delimiter
pub fn parse_statement(content: &str) -> ParsedTable {
    parse_table(content, DEFAULT_DELIMITER)
}

/// Parse delimited text whose first record is the header
///
/// Blank lines are skipped and fields missing from a short record read as
/// empty. Empty fields beyond the header (a trailing delimiter) are dropped,
/// but a record carrying data past the last column stops the parse: its
/// values no longer line up with the header.
pub fn parse_table(content: &str, delimiter: u8) -> ParsedTable {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = match reader.headers() {
        Ok(headers) => headers.iter().map(str::to_string).collect(),
        Err(e) => {
            return ParsedTable {
                table: CsvTable::default(),
                error: Some(e.into()),
            }
        }
    };

    let mut parsed = ParsedTable {
        table: CsvTable::new(headers),
        error: None,
    };

    for result in reader.records() {
        match result {
            Ok(record) if is_blank(&record) => continue,
            Ok(record) if overflows(&record, parsed.table.headers.len()) => {
                parsed.error = Some(CsvParseError {
                    line: record.position().map(|position| position.line()),
                    message: format!(
                        "record has {} fields, header has {}",
                        record.len(),
                        parsed.table.headers.len()
                    ),
                });
                break;
            }
            Ok(record) => {
                let row = to_row(&parsed.table.headers, &record);
                parsed.table.push_row(row);
            }
            Err(e) => {
                parsed.error = Some(e.into());
                break;
            }
        }
    }

    parsed
}

fn is_blank(record: &StringRecord) -> bool {
    record.len() <= 1 && record.iter().all(|field| field.trim().is_empty())
}

fn overflows(record: &StringRecord, width: usize) -> bool {
    record.iter().skip(width).any(|field| !field.trim().is_empty())
}

fn to_row(headers: &[String], record: &StringRecord) -> Row {
    Row::from_pairs(
        headers
            .iter()
            .enumerate()
            .map(|(idx, header)| (header.as_str(), record.get(idx).unwrap_or(""))),
    )
}
