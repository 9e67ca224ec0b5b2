//! Reconciler configuration

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::types::*;

/// Where statements live and how they are encoded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileConfig {
    /// Directory holding the statement files, relative to the storage root
    pub statements_dir: String,
    /// Field delimiter of statement files
    pub delimiter: char,
    /// Extension batch operations pick up, compared case-insensitively
    pub file_extension: String,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            statements_dir: ".".to_string(),
            delimiter: ';',
            file_extension: "csv".to_string(),
        }
    }
}

impl ReconcileConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON configuration; absent fields take their defaults
    pub fn from_json(json: &str) -> ReconcileResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| ReconcileError::Validation(format!("Invalid configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_statements_dir(mut self, dir: impl Into<String>) -> Self {
        self.statements_dir = dir.into();
        self
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_file_extension(mut self, extension: impl Into<String>) -> Self {
        self.file_extension = extension.into();
        self
    }

    /// Check the delimiter is a single-byte character the CSV layer can use
    pub fn validate(&self) -> ReconcileResult<()> {
        self.delimiter_byte().map(|_| ())
    }

    /// Delimiter as the byte the CSV reader and writer expect
    ///
    /// The fields are public, so a configuration that never went through
    /// [`validate`](Self::validate) is checked again here.
    pub fn delimiter_byte(&self) -> ReconcileResult<u8> {
        match u8::try_from(self.delimiter) {
            Ok(byte) if byte.is_ascii() && !matches!(byte, b'"' | b'\n' | b'\r') => Ok(byte),
            _ => Err(ReconcileError::Validation(format!(
                "Delimiter {:?} is not usable for statements",
                self.delimiter
            ))),
        }
    }

    /// Whether a listed file name is a statement batch operations should process
    pub fn is_statement_file(&self, file_name: &str) -> bool {
        let extension = self.file_extension.trim_start_matches('.');
        Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
    }

    /// Storage path of a statement in the configured directory
    pub fn statement_path(&self, file_name: &str) -> String {
        match self.statements_dir.trim_end_matches('/') {
            "" | "." => file_name.to_string(),
            dir => format!("{}/{}", dir, file_name),
        }
    }
}
