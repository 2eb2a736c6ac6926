//! Root-scoped, sandboxed file namespace.
//!
//! A [`Namespace`] owns one root directory.  Every caller-supplied path is
//! relative to that root and goes through [`Namespace::resolve`] before any
//! filesystem access, so nothing can be read or written outside it.
//! Ignore rules are compiled once when the namespace is opened.

mod error;
mod snapshot;

pub use error::NamespaceError;
pub use snapshot::{EntryBody, Snapshot, SnapshotEntry, EMPTY_TREE_MESSAGE};

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::ignore::IgnoreRules;
use crate::indexer::Indexer;

/// Default ignore file name, looked up at the top of the root.
pub const DEFAULT_IGNORE_FILE: &str = ".gitignore";

/// Result of a successful read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    Content(String),
    /// The file exists and has zero length.
    Empty,
}

/// Result of a successful write or append.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStatus {
    Written,
    Appended,
    /// Content was empty; nothing touched the disk.
    SkippedEmpty,
}

/// Sandboxed view of one root directory.
pub struct Namespace {
    root: PathBuf,
    ignore: IgnoreRules,
    indexer: Option<Arc<dyn Indexer>>,
}

impl std::fmt::Debug for Namespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Namespace")
            .field("root", &self.root)
            .field("ignore_rules", &self.ignore.len())
            .field("indexer", &self.indexer.is_some())
            .finish()
    }
}

impl Namespace {
    /// Open (creating if needed) `root`, reading `root/.gitignore`.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, NamespaceError> {
        Self::open_with_ignore_file(root, DEFAULT_IGNORE_FILE)
    }

    /// Open `root` reading ignore patterns from `root/<ignore_file>`.
    ///
    /// A missing or unreadable ignore file is not an error.
    pub fn open_with_ignore_file(
        root: impl AsRef<Path>,
        ignore_file: &str,
    ) -> Result<Self, NamespaceError> {
        let root = prepare_root(root.as_ref())?;
        let ignore = IgnoreRules::load(&root.join(ignore_file));
        Ok(Self::build(root, ignore))
    }

    /// Open `root` with explicit rules; no ignore file is read.
    pub fn with_rules(root: impl AsRef<Path>, ignore: IgnoreRules) -> Result<Self, NamespaceError> {
        let root = prepare_root(root.as_ref())?;
        Ok(Self::build(root, ignore))
    }

    fn build(root: PathBuf, ignore: IgnoreRules) -> Self {
        debug!(root = %root.display(), rules = ignore.len(), "namespace opened");
        Self {
            root,
            ignore,
            indexer: None,
        }
    }

    /// Attach the post-write indexing hook.
    pub fn with_indexer(mut self, indexer: Arc<dyn Indexer>) -> Self {
        self.indexer = Some(indexer);
        self
    }

    /// Canonical absolute root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn ignore_rules(&self) -> &IgnoreRules {
        &self.ignore
    }

    // -- resolution -----------------------------------------------------

    /// Resolve `relative` against the root, enforcing containment.
    ///
    /// `.` and `..` are collapsed lexically; absolute inputs are rejected.
    /// The longest existing prefix of the result is then canonicalized so a
    /// symlink pointing out of the root is rejected as well.
    pub fn resolve(&self, relative: &str) -> Result<PathBuf, NamespaceError> {
        let out_of_bounds = || NamespaceError::OutOfBounds {
            path: relative.to_string(),
        };

        let raw = Path::new(relative);
        if raw.is_absolute() || raw.has_root() {
            return Err(out_of_bounds());
        }

        let mut resolved = self.root.clone();
        for component in raw.components() {
            match component {
                Component::CurDir => {}
                Component::ParentDir => {
                    if !resolved.pop() {
                        return Err(out_of_bounds());
                    }
                }
                Component::Normal(part) => resolved.push(part),
                Component::Prefix(_) | Component::RootDir => return Err(out_of_bounds()),
            }
        }

        if !resolved.starts_with(&self.root) {
            return Err(out_of_bounds());
        }

        let real = canon_or_resolve(&resolved).map_err(|e| NamespaceError::io(relative, e))?;
        if !real.starts_with(&self.root) {
            return Err(out_of_bounds());
        }

        Ok(resolved)
    }

    // -- file operations ------------------------------------------------

    /// Read a file as UTF-8 text.
    pub async fn read(&self, relative: &str) -> Result<ReadOutcome, NamespaceError> {
        let path = self.resolve(relative)?;
        let classify = |e: std::io::Error| match e.kind() {
            std::io::ErrorKind::NotFound => NamespaceError::NotFound {
                path: relative.to_string(),
            },
            _ => NamespaceError::io(relative, e),
        };

        let meta = fs::metadata(&path).await.map_err(classify)?;
        if meta.is_dir() {
            return Err(NamespaceError::io(
                relative,
                std::io::Error::other("path is a directory"),
            ));
        }
        if meta.len() == 0 {
            return Ok(ReadOutcome::Empty);
        }

        let content = fs::read_to_string(&path).await.map_err(classify)?;
        Ok(ReadOutcome::Content(content))
    }

    /// Create or truncate a file with `content`.
    ///
    /// Empty or absent content is a successful no-op that never touches the
    /// disk.  Parent directories are created as needed.
    pub async fn write(
        &self,
        relative: &str,
        content: Option<&str>,
        owner: &str,
    ) -> Result<WriteStatus, NamespaceError> {
        let path = self.resolve(relative)?;

        let content = match content {
            Some(c) if !c.is_empty() => c,
            _ => {
                debug!(path = %relative, "empty content, write skipped");
                return Ok(WriteStatus::SkippedEmpty);
            }
        };

        ensure_parent(&path, relative).await?;
        fs::write(&path, content)
            .await
            .map_err(|e| NamespaceError::io(relative, e))?;

        debug!(path = %relative, bytes = content.len(), owner = %owner, "file written");
        self.notify(&path, relative, owner).await;
        Ok(WriteStatus::Written)
    }

    /// Append `content`, creating the file (and parents) when absent.
    pub async fn append(
        &self,
        relative: &str,
        content: &str,
        owner: &str,
    ) -> Result<WriteStatus, NamespaceError> {
        let path = self.resolve(relative)?;

        ensure_parent(&path, relative).await?;
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|e| NamespaceError::io(relative, e))?;
        file.write_all(content.as_bytes())
            .await
            .map_err(|e| NamespaceError::io(relative, e))?;
        file.flush()
            .await
            .map_err(|e| NamespaceError::io(relative, e))?;
        drop(file);

        debug!(path = %relative, bytes = content.len(), owner = %owner, "file appended");
        self.notify(&path, relative, owner).await;
        Ok(WriteStatus::Appended)
    }

    /// Walk the whole root and capture a sorted, ignore-filtered snapshot.
    pub async fn snapshot(&self) -> Result<Snapshot, NamespaceError> {
        snapshot::collect(&self.root, &self.ignore).await
    }

    /// Rendered snapshot text (see [`Snapshot::render`]).
    pub async fn list_tree(&self) -> Result<String, NamespaceError> {
        Ok(self.snapshot().await?.render())
    }

    async fn notify(&self, path: &Path, relative: &str, owner: &str) {
        let Some(indexer) = &self.indexer else {
            return;
        };
        if let Err(e) = indexer.index(path, owner).await {
            warn!(path = %relative, owner = %owner, error = %e, "failed to index file");
        }
    }
}

/// Create `root` if absent and return its canonical form.
fn prepare_root(root: &Path) -> Result<PathBuf, NamespaceError> {
    let shown = root.display().to_string();
    std::fs::create_dir_all(root).map_err(|e| NamespaceError::io(&shown, e))?;
    root.canonicalize().map_err(|e| NamespaceError::io(&shown, e))
}

async fn ensure_parent(path: &Path, relative: &str) -> Result<(), NamespaceError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| NamespaceError::io(relative, e))?;
    }
    Ok(())
}

/// Canonicalize the longest existing prefix of `p` and re-append the rest.
///
/// Existence is tested without following symlinks, so a dangling link is
/// canonicalized (and fails) rather than skipped.
fn canon_or_resolve(p: &Path) -> std::io::Result<PathBuf> {
    let mut existing = p.to_path_buf();
    let mut tail = Vec::new();
    while std::fs::symlink_metadata(&existing).is_err() {
        match (existing.file_name(), existing.parent()) {
            (Some(name), Some(parent)) => {
                tail.push(name.to_os_string());
                existing = parent.to_path_buf();
            }
            _ => break,
        }
    }
    let mut resolved = existing.canonicalize()?;
    for component in tail.into_iter().rev() {
        resolved.push(component);
    }
    Ok(resolved)
}

// ── Tests ────────────────────────────────────────────────────
