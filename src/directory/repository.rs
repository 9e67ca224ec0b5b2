//! Explicitly managed cache over an [`AccountSource`]

use std::sync::Arc;

use crate::directory::AccountDirectory;
use crate::traits::AccountSource;
use crate::types::*;

/// Caches the account directory loaded from an [`AccountSource`]
///
/// The caller owns the repository and decides when it is refreshed. Every
/// call to [`snapshot`](Self::snapshot) hands out an immutable copy, so a
/// validate/correct/split run is never affected by a concurrent refresh.
pub struct AccountRepository<A: AccountSource> {
    source: A,
    cached: Option<Arc<AccountDirectory>>,
}

impl<A: AccountSource> AccountRepository<A> {
    /// Create a repository; nothing is loaded until the first snapshot
    pub fn new(source: A) -> Self {
        Self {
            source,
            cached: None,
        }
    }

    /// Current directory, loading it from the source if not cached
    pub async fn snapshot(&mut self) -> ReconcileResult<Arc<AccountDirectory>> {
        if let Some(directory) = &self.cached {
            return Ok(Arc::clone(directory));
        }
        self.refresh().await
    }

    /// Reload the directory from the source, replacing the cached copy
    pub async fn refresh(&mut self) -> ReconcileResult<Arc<AccountDirectory>> {
        let directory = Arc::new(self.source.load_account_directory().await?);
        tracing::debug!(accounts = directory.len(), "account directory loaded");
        self.cached = Some(Arc::clone(&directory));
        Ok(directory)
    }

    /// Drop the cached copy; the next snapshot reloads
    pub fn invalidate(&mut self) {
        self.cached = None;
    }

    pub fn is_cached(&self) -> bool {
        self.cached.is_some()
    }

    pub fn source(&self) -> &A {
        &self.source
    }
}
