//! Filesystem-backed storage rooted at a directory

use async_trait::async_trait;
use std::fs;
use std::path::{Path, PathBuf};

use crate::directory::AccountDirectory;
use crate::traits::*;
use crate::types::*;

/// Statement storage over the local filesystem
///
/// Paths handed to the trait methods are resolved against `root`. The account
/// directory, when configured, is read from a JSON file on every load; use an
/// [`AccountRepository`](crate::directory::AccountRepository) to cache it.
///
/// The trait methods call `std::fs` directly and block the thread they run
/// on. That suits command-line tools and the demo; inside a multi-task async
/// runtime, wrap calls in `spawn_blocking` or provide a
/// [`StatementStorage`] over the runtime's own file API.
#[derive(Debug, Clone)]
pub struct FsStorage {
    root: PathBuf,
    directory_file: Option<PathBuf>,
}

impl FsStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            directory_file: None,
        }
    }

    /// Read the account directory from this JSON file
    pub fn with_directory_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.directory_file = Some(path.into());
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }
}

#[async_trait]
impl StatementStorage for FsStorage {
    async fn read_text(&self, path: &str) -> ReconcileResult<String> {
        fs::read_to_string(self.resolve(path)).map_err(|e| ReconcileError::io("read", path, e))
    }

    async fn write_text(&mut self, path: &str, content: &str) -> ReconcileResult<()> {
        fs::write(self.resolve(path), content).map_err(|e| ReconcileError::io("write", path, e))
    }

    async fn list_files(&self, dir: &str) -> ReconcileResult<Vec<String>> {
        let entries = fs::read_dir(self.resolve(dir)).map_err(|e| ReconcileError::io("list", dir, e))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| ReconcileError::io("list", dir, e))?;
            let is_file = entry
                .file_type()
                .map_err(|e| ReconcileError::io("list", dir, e))?
                .is_file();
            if is_file {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        // read_dir order is platform dependent
        names.sort();
        Ok(names)
    }
}

#[async_trait]
impl AccountSource for FsStorage {
    async fn load_account_directory(&self) -> ReconcileResult<AccountDirectory> {
        let Some(path) = &self.directory_file else {
            return Ok(AccountDirectory::new());
        };
        let json = fs::read_to_string(path)
            .map_err(|e| ReconcileError::io("read", path.display().to_string(), e))?;
        AccountDirectory::from_json(&json)
    }
}
