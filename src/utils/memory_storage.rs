//! In-memory storage implementation for testing

use async_trait::async_trait;
use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::directory::AccountDirectory;
use crate::traits::*;
use crate::types::*;

/// In-memory statement storage and account source for testing and embedding
///
/// Paths are `/`-separated; a file belongs to the directory named by
/// everything before its last `/` (the root directory is `""` or `"."`).
/// Listings come back sorted by name.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    files: Arc<RwLock<BTreeMap<String, String>>>,
    directory: Arc<RwLock<AccountDirectory>>,
    unreadable: Arc<RwLock<HashSet<String>>>,
    unwritable: Arc<RwLock<HashSet<String>>>,
}

fn read_lock<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write_lock<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn normalize_dir(dir: &str) -> &str {
    match dir.trim_end_matches('/') {
        "." => "",
        other => other,
    }
}

impl MemoryStorage {
    /// Create a new memory storage instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a file directly
    pub fn insert_file(&self, path: impl Into<String>, content: impl Into<String>) {
        write_lock(&self.files).insert(path.into(), content.into());
    }

    /// Content of a file, if present
    pub fn file(&self, path: &str) -> Option<String> {
        read_lock(&self.files).get(path).cloned()
    }

    /// All stored paths, sorted
    pub fn paths(&self) -> Vec<String> {
        read_lock(&self.files).keys().cloned().collect()
    }

    /// Replace the account directory served by [`AccountSource`]
    pub fn set_directory(&self, directory: AccountDirectory) {
        *write_lock(&self.directory) = directory;
    }

    /// Make every read of `path` fail, simulating a broken collaborator
    pub fn fail_reads_for(&self, path: impl Into<String>) {
        write_lock(&self.unreadable).insert(path.into());
    }

    /// Make every write to `path` fail
    pub fn fail_writes_for(&self, path: impl Into<String>) {
        write_lock(&self.unwritable).insert(path.into());
    }

    /// Clear all data (useful for testing)
    pub fn clear(&self) {
        write_lock(&self.files).clear();
        write_lock(&self.unreadable).clear();
        write_lock(&self.unwritable).clear();
        *write_lock(&self.directory) = AccountDirectory::new();
    }
}

#[async_trait]
impl StatementStorage for MemoryStorage {
    async fn read_text(&self, path: &str) -> ReconcileResult<String> {
        if read_lock(&self.unreadable).contains(path) {
            return Err(ReconcileError::io("read", path, "simulated read failure"));
        }
        read_lock(&self.files)
            .get(path)
            .cloned()
            .ok_or_else(|| ReconcileError::io("read", path, "no such file"))
    }

    async fn write_text(&mut self, path: &str, content: &str) -> ReconcileResult<()> {
        if read_lock(&self.unwritable).contains(path) {
            return Err(ReconcileError::io("write", path, "simulated write failure"));
        }
        write_lock(&self.files).insert(path.to_string(), content.to_string());
        Ok(())
    }

    async fn list_files(&self, dir: &str) -> ReconcileResult<Vec<String>> {
        let dir = normalize_dir(dir);
        let files = read_lock(&self.files);
        Ok(files
            .keys()
            .filter_map(|path| {
                let (parent, name) = path.rsplit_once('/').unwrap_or(("", path.as_str()));
                (parent == dir).then(|| name.to_string())
            })
            .collect())
    }
}

#[async_trait]
impl AccountSource for MemoryStorage {
    async fn load_account_directory(&self) -> ReconcileResult<AccountDirectory> {
        Ok(read_lock(&self.directory).clone())
    }
}
