//! Post-write indexing hook.
//!
//! The namespace notifies an [`Indexer`] after every successful write or
//! append.  Failures are reported back as errors but the namespace only
//! logs them; a write never fails because indexing did.

use std::path::Path;

use async_trait::async_trait;

/// Receives `(resolved path, owner)` after each successful write.
#[async_trait]
pub trait Indexer: Send + Sync {
    async fn index(&self, path: &Path, owner: &str) -> anyhow::Result<()>;
}

/// Indexer that only records each write in the log.
pub struct LogIndexer;

#[async_trait]
impl Indexer for LogIndexer {
    async fn index(&self, path: &Path, owner: &str) -> anyhow::Result<()> {
        tracing::info!(path = %path.display(), owner = %owner, "file changed");
        Ok(())
    }
}
