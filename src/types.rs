//! Core types and data structures for statement reconciliation

use serde::{Deserialize, Serialize};

/// Column holding the origin tag of a transaction (historically the source file name)
pub const SOURCE_COLUMN: &str = "Source";
/// Column holding the declared, human-readable account name
pub const COMPTE_COLUMN: &str = "Compte";
/// Column holding the transaction date, formatted `dd/mm/yyyy`
pub const DATE_COLUMN: &str = "Date";

/// Label prepended to the expected account when a prefix has no directory entry
pub const INVALID_PREFIX_LABEL: &str = "PRÉFIXE INVALIDE: ";

/// A single statement row: an ordered mapping from column name to value
///
/// Columns the reconciliation does not know about are carried untouched so
/// that correction and splitting never lose data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    fields: Vec<(String, String)>,
}

impl Row {
    /// Create an empty row
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a row from `(column, value)` pairs, keeping their order
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut row = Self::new();
        for (column, value) in pairs {
            row.set(column, value);
        }
        row
    }

    /// Value of a column; a missing column reads as the empty string
    pub fn get(&self, column: &str) -> &str {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
            .unwrap_or("")
    }

    /// Whether the row carries the column at all
    pub fn contains(&self, column: &str) -> bool {
        self.fields.iter().any(|(name, _)| name == column)
    }

    /// Set a column, replacing its value in place or appending it
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<String>) {
        let column = column.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(name, _)| *name == column) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((column, value)),
        }
    }

    /// Iterate over `(column, value)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn source(&self) -> &str {
        self.get(SOURCE_COLUMN)
    }

    pub fn compte(&self) -> &str {
        self.get(COMPTE_COLUMN)
    }

    pub fn date(&self) -> &str {
        self.get(DATE_COLUMN)
    }

    pub fn set_compte(&mut self, compte: impl Into<String>) {
        self.set(COMPTE_COLUMN, compte);
    }
}

/// In-memory statement table: header plus rows
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvTable {
    /// Column names in file order, used to keep column order on write
    pub headers: Vec<String>,
    /// Parsed data rows, header excluded
    pub rows: Vec<Row>,
}

impl CsvTable {
    /// Create an empty table with the given header
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Create a table from a header and its rows
    pub fn with_rows(headers: Vec<String>, rows: Vec<Row>) -> Self {
        Self { headers, rows }
    }

    pub fn push_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A row whose declared account does not match its origin tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inconsistency {
    /// File the row was read from
    pub file_name: String,
    /// 0-based position among parsed rows, header excluded
    pub line_index: usize,
    /// Origin tag the prefix was resolved from
    pub source: String,
    /// Account name currently declared on the row
    pub compte_found: String,
    /// Directory name for the prefix, or `PRÉFIXE INVALIDE: <prefix>`
    pub compte_expected: String,
    /// Resolved account code
    pub prefix: String,
}

impl Inconsistency {
    /// Whether this row points at an account code missing from the directory
    pub fn is_invalid_prefix(&self) -> bool {
        self.compte_expected.starts_with(INVALID_PREFIX_LABEL)
    }
}

/// Outcome of validating one table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub inconsistencies: Vec<Inconsistency>,
    /// Every parsed row, valid or not
    pub total_lines: usize,
    pub inconsistent_lines: usize,
}

impl ValidationResult {
    /// Build a result from the inconsistencies found over `total_lines` rows
    pub fn new(total_lines: usize, inconsistencies: Vec<Inconsistency>) -> Self {
        Self {
            is_valid: inconsistencies.is_empty(),
            inconsistent_lines: inconsistencies.len(),
            inconsistencies,
            total_lines,
        }
    }
}

/// Outcome of rewriting declared accounts in a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrectionOutcome {
    /// The table with every fixable `Compte` rewritten; always returned
    pub corrected_table: CsvTable,
    /// Rows whose `Compte` was rewritten
    pub corrected: usize,
    /// Rows left alone because their prefix is unknown
    pub errors: usize,
}

/// Rows of one account, destined for their own file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitGroup {
    pub file_name: String,
    pub rows: Vec<Row>,
}

impl SplitGroup {
    /// Turn the group into a table carrying the original header
    pub fn into_table(self, headers: &[String]) -> CsvTable {
        CsvTable::with_rows(headers.to_vec(), self.rows)
    }
}

/// Outcome of partitioning a table by declared account
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitOutcome {
    /// Empty when the table holds a single account
    pub groups: Vec<SplitGroup>,
    /// Groups dropped because no directory entry carries their name
    pub errors: usize,
}

/// Errors that can occur while reconciling statements
#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    #[error("Failed to {operation} '{path}': {message}")]
    Io {
        operation: String,
        path: String,
        message: String,
    },
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Account directory error: {0}")]
    Directory(String),
    #[error("Validation error: {0}")]
    Validation(String),
}

impl ReconcileError {
    /// Wrap a collaborator failure with the operation and file it concerned
    pub fn io(
        operation: impl Into<String>,
        path: impl Into<String>,
        message: impl std::fmt::Display,
    ) -> Self {
        ReconcileError::Io {
            operation: operation.into(),
            path: path.into(),
            message: message.to_string(),
        }
    }
}

/// Result type for reconciliation operations
pub type ReconcileResult<T> = Result<T, ReconcileError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_missing_column_reads_empty() {
        let row = Row::from_pairs([("Source", "CCAL_x.csv")]);
        assert_eq!(row.source(), "CCAL_x.csv");
        assert_eq!(row.compte(), "");
        assert_eq!(row.date(), "");
        assert!(!row.contains("Compte"));
    }

    #[test]
    fn test_row_set_keeps_column_position() {
        let mut row = Row::from_pairs([("Date", "01/01/2025"), ("Compte", "A"), ("Montant", "3")]);
        row.set_compte("B");
        let columns: Vec<&str> = row.iter().map(|(name, _)| name).collect();
        assert_eq!(columns, vec!["Date", "Compte", "Montant"]);
        assert_eq!(row.compte(), "B");
    }

    #[test]
    fn test_validation_result_counts() {
        let empty = ValidationResult::new(4, Vec::new());
        assert!(empty.is_valid);
        assert_eq!(empty.inconsistent_lines, 0);
        assert_eq!(empty.total_lines, 4);

        let flagged = ValidationResult::new(
            4,
            vec![Inconsistency {
                file_name: "f.csv".to_string(),
                line_index: 2,
                source: "ZZ_f.csv".to_string(),
                compte_found: "X".to_string(),
                compte_expected: format!("{}ZZ", INVALID_PREFIX_LABEL),
                prefix: "ZZ".to_string(),
            }],
        );
        assert!(!flagged.is_valid);
        assert_eq!(flagged.inconsistent_lines, 1);
        assert!(flagged.inconsistencies[0].is_invalid_prefix());
    }

    #[test]
    fn test_io_error_message_names_operation_and_file() {
        let err = ReconcileError::io("read", "CCAL_a.csv", "permission denied");
        assert_eq!(
            err.to_string(),
            "Failed to read 'CCAL_a.csv': permission denied"
        );
    }
}
