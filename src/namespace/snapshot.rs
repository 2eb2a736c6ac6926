//! Deterministic full-tree snapshot of a namespace.
//!
//! Text format, one block per entry in relative-path order:
//!
//! ```text
//! === <relative-path> ===
//! <body>
//!
//! ```
//!
//! where `<body>` is `[DIRECTORY]`, `[EMPTY FILE]`, the file content, or
//! `[ERROR READING FILE: <message>]`.

use std::fmt;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::warn;

use super::NamespaceError;
use crate::ignore::IgnoreRules;

/// Rendered in place of an empty snapshot.
pub const EMPTY_TREE_MESSAGE: &str =
    "The project folder is empty or all files are ignored by .gitignore.";

/// What a snapshot entry shows for its path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryBody {
    Directory,
    /// File whose content is empty or only whitespace.
    EmptyFile,
    File(String),
    Unreadable(String),
}

impl fmt::Display for EntryBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryBody::Directory => f.write_str("[DIRECTORY]"),
            EntryBody::EmptyFile => f.write_str("[EMPTY FILE]"),
            EntryBody::File(content) => f.write_str(content),
            EntryBody::Unreadable(msg) => write!(f, "[ERROR READING FILE: {msg}]"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotEntry {
    /// Forward-slash path relative to the root.
    pub path: String,
    pub body: EntryBody,
}

/// Sorted, ignore-filtered listing of every entry under a root.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    entries: Vec<SnapshotEntry>,
}

impl Snapshot {
    pub fn entries(&self) -> &[SnapshotEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render as text, or [`EMPTY_TREE_MESSAGE`] when there are no entries.
    pub fn render(&self) -> String {
        if self.entries.is_empty() {
            return EMPTY_TREE_MESSAGE.to_string();
        }
        let mut out = String::new();
        for entry in &self.entries {
            out.push_str("=== ");
            out.push_str(&entry.path);
            out.push_str(" ===\n");
            out.push_str(&entry.body.to_string());
            out.push_str("\n\n");
        }
        out
    }
}

enum Kind {
    Directory,
    File,
    Unreadable(String),
}

struct Found {
    relative: String,
    path: PathBuf,
    kind: Kind,
}

pub(super) async fn collect(root: &Path, ignore: &IgnoreRules) -> Result<Snapshot, NamespaceError> {
    let mut found = Vec::new();

    // Only the root itself is fatal; deeper failures are logged and skipped.
    let rd = fs::read_dir(root)
        .await
        .map_err(|e| NamespaceError::io(".", e))?;
    walk(rd, root, "", ignore, &mut found).await;

    found.sort_by(|a, b| a.relative.cmp(&b.relative));

    let mut entries = Vec::with_capacity(found.len());
    for item in found {
        let body = match item.kind {
            Kind::Directory => EntryBody::Directory,
            Kind::Unreadable(msg) => EntryBody::Unreadable(msg),
            Kind::File => match fs::read_to_string(&item.path).await {
                Ok(content) if content.trim().is_empty() => EntryBody::EmptyFile,
                Ok(content) => EntryBody::File(content),
                Err(e) => EntryBody::Unreadable(e.to_string()),
            },
        };
        entries.push(SnapshotEntry {
            path: item.relative,
            body,
        });
    }

    Ok(Snapshot { entries })
}

/// Recursively collect entries.
///
/// Ignored directories are pruned: every rule also matches all descendants
/// of what it matches, so nothing below them could be listed anyway.
/// Symlinks are never descended into.
async fn walk(
    mut rd: fs::ReadDir,
    root: &Path,
    prefix: &str,
    ignore: &IgnoreRules,
    found: &mut Vec<Found>,
) {
    loop {
        let entry = match rd.next_entry().await {
            Ok(Some(entry)) => entry,
            Ok(None) => break,
            Err(e) => {
                warn!(dir = %prefix, error = %e, "directory listing interrupted");
                break;
            }
        };

        let name = entry.file_name().to_string_lossy().to_string();
        let relative = if prefix.is_empty() {
            name
        } else {
            format!("{prefix}/{name}")
        };
        if ignore.is_ignored(&relative) {
            continue;
        }

        let path = entry.path();
        let file_type = match entry.file_type().await {
            Ok(ft) => ft,
            Err(e) => {
                found.push(Found {
                    relative,
                    path,
                    kind: Kind::Unreadable(e.to_string()),
                });
                continue;
            }
        };

        if file_type.is_symlink() {
            let kind = symlink_kind(&path, root).await;
            found.push(Found {
                relative,
                path,
                kind,
            });
        } else if file_type.is_dir() {
            let sub = fs::read_dir(&path).await;
            found.push(Found {
                relative: relative.clone(),
                path,
                kind: Kind::Directory,
            });
            match sub {
                Ok(sub) => Box::pin(walk(sub, root, &relative, ignore, found)).await,
                Err(e) => warn!(dir = %relative, error = %e, "cannot read directory, skipping its contents"),
            }
        } else {
            found.push(Found {
                relative,
                path,
                kind: Kind::File,
            });
        }
    }
}

async fn symlink_kind(path: &Path, root: &Path) -> Kind {
    match fs::canonicalize(path).await {
        Ok(target) if !target.starts_with(root) => {
            Kind::Unreadable("symlink target is outside the project folder".to_string())
        }
        Ok(target) if target.is_dir() => Kind::Directory,
        Ok(_) => Kind::File,
        Err(e) => Kind::Unreadable(e.to_string()),
    }
}

// ── Tests ────────────────────────────────────────────────────
