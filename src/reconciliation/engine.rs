//! Reconciler that coordinates storage, parsing and the reconciliation passes

use serde::{Deserialize, Serialize};

use crate::config::ReconcileConfig;
use crate::directory::AccountDirectory;
use crate::reconciliation::corrector::correct;
use crate::reconciliation::splitter::split;
use crate::reconciliation::validator::{validate_content, BatchValidation, FileValidation, SkippedFile};
use crate::table::{parse_table, serialize_table};
use crate::traits::*;
use crate::types::*;
use crate::utils::validation::validate_file_name;

/// Result of correcting one statement file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrectionReport {
    pub file_name: String,
    pub corrected: usize,
    pub errors: usize,
    /// Whether the file was rewritten; only happens when `corrected > 0`
    pub written: bool,
}

/// Corrections applied over a directory of statements
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchCorrection {
    pub reports: Vec<CorrectionReport>,
    pub skipped: Vec<SkippedFile>,
}

impl BatchCorrection {
    pub fn total_corrected(&self) -> usize {
        self.reports.iter().map(|report| report.corrected).sum()
    }

    pub fn total_errors(&self) -> usize {
        self.reports.iter().map(|report| report.errors).sum()
    }
}

/// Result of splitting one statement file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitReport {
    pub file_name: String,
    /// Files written, one per account, in group order with the original's name last
    pub written: Vec<String>,
    /// Groups dropped because no account code carries their name
    pub errors: usize,
    /// Set when the original's own account group was written over it
    pub replaced_original: bool,
    /// Group named like the original but not written, so rows of dropped
    /// groups stay in the original
    pub withheld: Option<String>,
}

/// Main reconciler over a statement store
///
/// Every operation takes the account directory as an explicit snapshot; see
/// [`AccountRepository`](crate::directory::AccountRepository) for caching it.
/// Files are always processed one at a time, batches in listing order.
pub struct Reconciler<S: StatementStorage> {
    storage: S,
    config: ReconcileConfig,
}

impl<S: StatementStorage> Reconciler<S> {
    /// Create a reconciler with the default configuration
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            config: ReconcileConfig::default(),
        }
    }

    /// Create a reconciler with a custom configuration
    pub fn with_config(storage: S, config: ReconcileConfig) -> ReconcileResult<Self> {
        config.validate()?;
        Ok(Self { storage, config })
    }

    pub fn config(&self) -> &ReconcileConfig {
        &self.config
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Statement file names in the configured directory, in listing order
    pub async fn list_statements(&self) -> ReconcileResult<Vec<String>> {
        let dir = &self.config.statements_dir;
        let files = self
            .storage
            .list_files(dir)
            .await
            .map_err(|e| wrap_io("list", dir, e))?;

        Ok(files
            .into_iter()
            .filter(|name| self.config.is_statement_file(name))
            .collect())
    }

    async fn read_statement(&self, file_name: &str) -> ReconcileResult<String> {
        validate_file_name(file_name)?;
        let path = self.config.statement_path(file_name);
        self.storage
            .read_text(&path)
            .await
            .map_err(|e| wrap_io("read", &path, e))
    }

    async fn write_statement(&mut self, file_name: &str, content: &str) -> ReconcileResult<()> {
        validate_file_name(file_name)?;
        let path = self.config.statement_path(file_name);
        self.storage
            .write_text(&path, content)
            .await
            .map_err(|e| wrap_io("write", &path, e))?;
        tracing::info!(file = file_name, "statement written");
        Ok(())
    }

    /// Read, parse and validate one statement
    pub async fn validate_file(
        &self,
        file_name: &str,
        directory: &AccountDirectory,
    ) -> ReconcileResult<FileValidation> {
        let content = self.read_statement(file_name).await?;
        Ok(validate_content(
            file_name,
            &content,
            self.config.delimiter_byte()?,
            directory,
        ))
    }

    /// Validate every statement in the configured directory
    ///
    /// Files are processed sequentially in listing order. A file that cannot
    /// be read is logged and reported in `skipped`; it never stops the batch.
    pub async fn detect_all(&self, directory: &AccountDirectory) -> ReconcileResult<BatchValidation> {
        let mut batch = BatchValidation::default();

        for file_name in self.list_statements().await? {
            match self.validate_file(&file_name, directory).await {
                Ok(file) => {
                    tracing::debug!(
                        file = %file_name,
                        rows = file.result.total_lines,
                        inconsistent = file.result.inconsistent_lines,
                        "statement validated"
                    );
                    batch.files.push(file);
                }
                Err(e) => batch.skip(&file_name, &e),
            }
        }

        Ok(batch)
    }

    /// Correct one statement, writing it back only when a row changed
    pub async fn correct_file(
        &mut self,
        file_name: &str,
        directory: &AccountDirectory,
    ) -> ReconcileResult<CorrectionReport> {
        let content = self.read_statement(file_name).await?;
        let delimiter = self.config.delimiter_byte()?;
        let table = parse_table(&content, delimiter).into_table_lossy(file_name);

        let outcome = correct(table, file_name, directory);
        let written = outcome.corrected > 0;
        if written {
            let output = serialize_table(&outcome.corrected_table, delimiter)?;
            self.write_statement(file_name, &output).await?;
        }

        tracing::info!(
            file = file_name,
            corrected = outcome.corrected,
            errors = outcome.errors,
            "statement corrected"
        );

        Ok(CorrectionReport {
            file_name: file_name.to_string(),
            corrected: outcome.corrected,
            errors: outcome.errors,
            written,
        })
    }

    /// Correct every statement in the configured directory, one file at a time
    pub async fn correct_all(&mut self, directory: &AccountDirectory) -> ReconcileResult<BatchCorrection> {
        let mut batch = BatchCorrection::default();

        for file_name in self.list_statements().await? {
            match self.correct_file(&file_name, directory).await {
                Ok(report) => batch.reports.push(report),
                Err(e) => {
                    tracing::warn!(file = %file_name, "skipping statement: {}", e);
                    batch.skipped.push(SkippedFile {
                        file_name,
                        reason: e.to_string(),
                    });
                }
            }
        }

        Ok(batch)
    }

    /// Split one statement into a file per account, next to the original
    ///
    /// The original is never deleted. When its own account group carries its
    /// name, that group is written last and only if no group was dropped;
    /// otherwise it is reported in `withheld` and the original keeps every
    /// row. All outputs are encoded before the first write, so a failed write
    /// never leaves the original truncated.
    pub async fn split_file(
        &mut self,
        file_name: &str,
        directory: &AccountDirectory,
    ) -> ReconcileResult<SplitReport> {
        let content = self.read_statement(file_name).await?;
        let delimiter = self.config.delimiter_byte()?;
        let table = parse_table(&content, delimiter).into_table_lossy(file_name);

        let outcome = split(&table, file_name, directory);
        let mut report = SplitReport {
            file_name: file_name.to_string(),
            errors: outcome.errors,
            ..SplitReport::default()
        };

        let mut outputs = Vec::with_capacity(outcome.groups.len());
        let mut over_original = None;
        for group in outcome.groups {
            let name = group.file_name.clone();
            let text = serialize_table(&group.into_table(&table.headers), delimiter)?;
            if name != file_name {
                outputs.push((name, text));
            } else if report.errors == 0 {
                over_original = Some((name, text));
            } else {
                tracing::warn!(
                    file = file_name,
                    dropped = report.errors,
                    "original kept whole, some groups have no account code"
                );
                report.withheld = Some(name);
            }
        }

        for (name, text) in outputs {
            self.write_statement(&name, &text).await?;
            report.written.push(name);
        }

        if let Some((name, text)) = over_original {
            self.write_statement(&name, &text).await?;
            report.replaced_original = true;
            report.written.push(name);
        }

        tracing::info!(
            file = file_name,
            files = report.written.len(),
            errors = report.errors,
            "statement split"
        );

        Ok(report)
    }
}

fn wrap_io(operation: &str, path: &str, error: ReconcileError) -> ReconcileError {
    match error {
        ReconcileError::Io { .. } => error,
        other => ReconcileError::io(operation, path, other),
    }
}
