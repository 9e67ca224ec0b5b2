//! Consistency checks between a row's declared account and its origin tag

use serde::{Deserialize, Serialize};

use crate::directory::AccountDirectory;
use crate::reconciliation::prefix::extract_prefix;
use crate::table::{parse_table, CsvParseError, DEFAULT_DELIMITER};
use crate::types::*;

/// Origin tag of a row: its `Source`, or the file name when `Source` is empty
pub fn row_origin<'a>(row: &'a Row, file_name_fallback: &'a str) -> &'a str {
    match row.source() {
        "" => file_name_fallback,
        source => source,
    }
}

/// Flag every row whose `Compte` disagrees with the account its origin resolves to
///
/// A row whose prefix has no directory entry is reported with
/// `PRÉFIXE INVALIDE: <prefix>` as the expected account and is not checked
/// any further.
pub fn validate(
    table: &CsvTable,
    file_name_fallback: &str,
    directory: &AccountDirectory,
) -> ValidationResult {
    let inconsistencies = table
        .rows
        .iter()
        .enumerate()
        .filter_map(|(line_index, row)| {
            let source = row_origin(row, file_name_fallback);
            let prefix = extract_prefix(source);

            let compte_expected = match directory.get(&prefix) {
                None => format!("{}{}", INVALID_PREFIX_LABEL, prefix),
                Some(account) if account.name != row.compte() => account.name.clone(),
                Some(_) => return None,
            };

            Some(Inconsistency {
                file_name: file_name_fallback.to_string(),
                line_index,
                source: source.to_string(),
                compte_found: row.compte().to_string(),
                compte_expected,
                prefix,
            })
        })
        .collect();

    ValidationResult::new(table.len(), inconsistencies)
}

/// Validation of one file within a batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileValidation {
    pub file_name: String,
    pub result: ValidationResult,
    /// Set when the file was only partially readable; `result` covers the rows before it
    pub parse_error: Option<CsvParseError>,
}

/// A file a batch could not process
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedFile {
    pub file_name: String,
    pub reason: String,
}

/// Aggregate of validating several files, in processing order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchValidation {
    pub files: Vec<FileValidation>,
    pub skipped: Vec<SkippedFile>,
}

impl BatchValidation {
    /// Every inconsistency, file by file in processing order
    pub fn inconsistencies(&self) -> impl Iterator<Item = &Inconsistency> {
        self.files
            .iter()
            .flat_map(|file| file.result.inconsistencies.iter())
    }

    pub fn total_inconsistencies(&self) -> usize {
        self.files.iter().map(|file| file.result.inconsistent_lines).sum()
    }

    pub fn total_lines(&self) -> usize {
        self.files.iter().map(|file| file.result.total_lines).sum()
    }

    /// True when every processed file is consistent
    pub fn is_valid(&self) -> bool {
        self.files.iter().all(|file| file.result.is_valid)
    }

    pub(crate) fn skip(&mut self, file_name: &str, error: &ReconcileError) {
        tracing::warn!(file = file_name, "skipping statement: {}", error);
        self.skipped.push(SkippedFile {
            file_name: file_name.to_string(),
            reason: error.to_string(),
        });
    }
}

/// Parse and validate one file's content
pub fn validate_content(
    file_name: &str,
    content: &str,
    delimiter: u8,
    directory: &AccountDirectory,
) -> FileValidation {
    let parsed = parse_table(content, delimiter);
    let parse_error = parsed.error.clone();
    let table = parsed.into_table_lossy(file_name);

    FileValidation {
        file_name: file_name.to_string(),
        result: validate(&table, file_name, directory),
        parse_error,
    }
}

/// Validate several files one after another, in the order given
///
/// A file the loader cannot produce is logged and left out of the aggregate;
/// the remaining files are still processed.
pub fn detect_all<S, F>(
    file_names: &[S],
    mut loader: F,
    directory: &AccountDirectory,
) -> BatchValidation
where
    S: AsRef<str>,
    F: FnMut(&str) -> ReconcileResult<String>,
{
    let mut batch = BatchValidation::default();

    for file_name in file_names {
        let file_name = file_name.as_ref();
        match loader(file_name) {
            Ok(content) => {
                let file = validate_content(file_name, &content, DEFAULT_DELIMITER, directory);
                tracing::debug!(
                    file = file_name,
                    rows = file.result.total_lines,
                    inconsistent = file.result.inconsistent_lines,
                    "statement validated"
                );
                batch.files.push(file);
            }
            Err(e) => batch.skip(file_name, &e),
        }
    }

    batch
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::parse_statement;

    fn directory() -> AccountDirectory {
        AccountDirectory::new()
            .with_account("CCAL", "BNP Courant", "#1e88e5")
            .unwrap()
    }

    #[test]
    fn test_name_mismatch_is_flagged() {
        let table = parse_statement(
            "Source;Compte;Date\nCCAL_01.01.2025_31.01.2025.csv;Wrong Bank;02/01/2025\n",
        )
        .table;

        let result = validate(&table, "CCAL_01.01.2025_31.01.2025.csv", &directory());
        assert!(!result.is_valid);
        assert_eq!(result.total_lines, 1);
        assert_eq!(result.inconsistent_lines, 1);

        let found = &result.inconsistencies[0];
        assert_eq!(found.compte_expected, "BNP Courant");
        assert_eq!(found.compte_found, "Wrong Bank");
        assert_eq!(found.prefix, "CCAL");
        assert_eq!(found.line_index, 0);
    }

    #[test]
    fn test_unknown_prefix_is_flagged_as_invalid() {
        let table = parse_statement(
            "Source;Compte;Date\nCCAL_a.csv;BNP Courant;01/01/2025\nLIVA_a.csv;BNP Courant;02/01/2025\n",
        )
        .table;

        let result = validate(&table, "CCAL_a.csv", &directory());
        assert_eq!(result.inconsistencies.len(), 1);

        let found = &result.inconsistencies[0];
        assert_eq!(found.line_index, 1);
        assert_eq!(found.compte_expected, "PRÉFIXE INVALIDE: LIVA");
        assert!(found.is_invalid_prefix());
    }

    #[test]
    fn test_empty_source_falls_back_to_file_name() {
        let table = parse_statement("Source;Compte;Date\n;BNP Courant;01/01/2025\n;Autre;02/01/2025\n").table;

        let result = validate(&table, "ccal_01.01.2025.csv", &directory());
        assert_eq!(result.total_lines, 2);
        assert_eq!(result.inconsistent_lines, 1);
        assert_eq!(result.inconsistencies[0].source, "ccal_01.01.2025.csv");
        assert_eq!(result.inconsistencies[0].line_index, 1);
    }

    #[test]
    fn test_missing_compte_column_reads_empty() {
        let table = parse_statement("Source;Date\nCCAL_a.csv;01/01/2025\n").table;

        let result = validate(&table, "CCAL_a.csv", &directory());
        assert_eq!(result.inconsistencies[0].compte_found, "");
        assert_eq!(result.inconsistencies[0].compte_expected, "BNP Courant");
    }

    #[test]
    fn test_validate_content_reports_parse_error() {
        let validation = validate_content(
            "CCAL_a.csv",
            "Source;Compte;Date\n\
             CCAL_a.csv;Autre;01/01/2025\n\
             CCAL_a.csv;BNP Courant;02/01/2025;-12,00;EUR\n\
             CCAL_a.csv;Autre;03/01/2025\n",
            DEFAULT_DELIMITER,
            &directory(),
        );

        let error = validation.parse_error.unwrap();
        assert_eq!(error.line, Some(3));
        // only the row before the bad record is checked
        assert_eq!(validation.result.total_lines, 1);
        assert_eq!(validation.result.inconsistent_lines, 1);
        assert_eq!(validation.result.inconsistencies[0].line_index, 0);
    }

    #[test]
    fn test_detect_all_isolates_failures() {
        let names = ["CCAL_1.csv", "CCAL_2.csv", "CCAL_3.csv"];
        let batch = detect_all(
            &names[..],
            |name| match name {
                "CCAL_2.csv" => Err(ReconcileError::io("read", name, "disk error")),
                "CCAL_1.csv" => Ok("Source;Compte;Date\nCCAL_1.csv;Bad;01/01/2025\n".to_string()),
                _ => Ok("Source;Compte;Date\nCCAL_3.csv;BNP Courant;01/01/2025\n".to_string()),
            },
            &directory(),
        );

        let processed: Vec<&str> = batch.files.iter().map(|f| f.file_name.as_str()).collect();
        assert_eq!(processed, vec!["CCAL_1.csv", "CCAL_3.csv"]);
        assert_eq!(batch.skipped.len(), 1);
        assert_eq!(batch.skipped[0].file_name, "CCAL_2.csv");
        assert_eq!(batch.total_inconsistencies(), 1);
        assert_eq!(batch.total_lines(), 2);
        assert!(!batch.is_valid());
    }
}
