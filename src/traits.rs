//! Traits for the collaborators the reconciliation core depends on

use async_trait::async_trait;

use crate::directory::AccountDirectory;
use crate::types::*;

/// Raw file access for statement files
///
/// This trait allows the reconciliation core to work against any backing
/// store (local disk, app sandbox, in-memory, etc.). Implementations should
/// report failures through [`ReconcileError::Io`] so callers know which
/// operation and file failed.
#[async_trait]
pub trait StatementStorage: Send + Sync {
    /// Read a whole file as UTF-8 text
    async fn read_text(&self, path: &str) -> ReconcileResult<String>;

    /// Replace a file's content, creating it when missing
    async fn write_text(&mut self, path: &str, content: &str) -> ReconcileResult<()>;

    /// List the file names (not paths) in a directory, in listing order
    async fn list_files(&self, dir: &str) -> ReconcileResult<Vec<String>>;
}

/// Source of the account-code to display-name mapping
///
/// The directory is owned by an external configuration store; the core only
/// ever reads it.
#[async_trait]
pub trait AccountSource: Send + Sync {
    /// Load a fresh copy of the account directory
    async fn load_account_directory(&self) -> ReconcileResult<AccountDirectory>;
}
