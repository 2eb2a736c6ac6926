//! Persistent chat memory: one JSON document per memory key.
//!
//! Storage: `<memory_dir>/<sanitized-key>_chat_memory.json`
//!
//! Keys are sanitized to filesystem-safe tokens: every character outside
//! `[A-Za-z0-9_-]` becomes `_` and an absent key becomes `default`.  Two
//! keys that sanitize to the same token share one document.
//!
//! [`ChatMemoryStore::update`] replaces the whole sequence; windowing lives
//! one layer up in [`ChatMemory`].

mod error;
mod message;
mod window;

pub use error::MemoryError;
pub use message::{ChatMessage, ToolExecutionRequest};
pub use window::{ChatMemory, DEFAULT_MAX_MESSAGES};

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use tokio::fs;
use tracing::debug;

/// Token used for an absent key.
pub const DEFAULT_KEY: &str = "default";

/// Suffix appended to the sanitized key to form the file name.
pub const FILE_SUFFIX: &str = "_chat_memory.json";

/// Map a key onto its storage token.
pub fn sanitize_key(key: Option<&str>) -> String {
    match key {
        None => DEFAULT_KEY.to_string(),
        Some(k) => k
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                    c
                } else {
                    '_'
                }
            })
            .collect(),
    }
}

/// JSON-file-backed store of per-key message sequences.
#[derive(Debug, Clone)]
pub struct ChatMemoryStore {
    dir: PathBuf,
}

impl ChatMemoryStore {
    /// Open (creating if needed) the memory directory.
    pub fn open(dir: impl AsRef<Path>) -> anyhow::Result<Self> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to initialize memory directory: {}", dir.display()))?;
        let dir = dir
            .canonicalize()
            .with_context(|| format!("failed to resolve memory directory: {}", dir.display()))?;
        debug!(dir = %dir.display(), "chat memory store opened");
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Backing file for `key`.
    pub fn path_for(&self, key: Option<&str>) -> PathBuf {
        self.dir
            .join(format!("{}{FILE_SUFFIX}", sanitize_key(key)))
    }

    /// Load the messages for `key`.
    ///
    /// A missing or blank document yields an empty list.  A document that
    /// does not parse is [`MemoryError::Corrupt`].
    pub async fn get(&self, key: Option<&str>) -> Result<Vec<ChatMessage>, MemoryError> {
        let path = self.path_for(key);
        let json = match fs::read_to_string(&path).await {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(MemoryError::Io {
                    key: display_key(key),
                    path,
                    source,
                })
            }
        };

        if json.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&json).map_err(|source| MemoryError::Corrupt {
            key: display_key(key),
            path,
            source,
        })
    }

    /// Replace the stored sequence for `key` with `messages`.
    pub async fn update(&self, key: Option<&str>, messages: &[ChatMessage]) -> Result<(), MemoryError> {
        let path = self.path_for(key);
        let io_err = |source| MemoryError::Io {
            key: display_key(key),
            path: path.clone(),
            source,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(io_err)?;
        }

        let json = serde_json::to_string(messages).map_err(|source| MemoryError::Serialize {
            key: display_key(key),
            source,
        })?;
        fs::write(&path, json).await.map_err(io_err)?;

        debug!(key = %display_key(key), messages = messages.len(), "chat memory updated");
        Ok(())
    }

    /// Remove the document for `key`; absent documents are fine.
    pub async fn delete(&self, key: Option<&str>) -> Result<(), MemoryError> {
        let path = self.path_for(key);
        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!(key = %display_key(key), "chat memory deleted");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(MemoryError::Io {
                key: display_key(key),
                path,
                source,
            }),
        }
    }

    /// Sanitized tokens of every stored document, sorted.
    pub async fn keys(&self) -> Result<Vec<String>, MemoryError> {
        let io_err = |source| MemoryError::Io {
            key: "*".to_string(),
            path: self.dir.clone(),
            source,
        };

        let mut rd = match fs::read_dir(&self.dir).await {
            Ok(rd) => rd,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_err(e)),
        };

        let mut keys = Vec::new();
        while let Some(entry) = rd.next_entry().await.map_err(io_err)? {
            let name = entry.file_name().to_string_lossy().to_string();
            if let Some(token) = name.strip_suffix(FILE_SUFFIX) {
                keys.push(token.to_string());
            }
        }
        keys.sort();
        Ok(keys)
    }
}

fn display_key(key: Option<&str>) -> String {
    key.unwrap_or(DEFAULT_KEY).to_string()
}

// ── Tests ────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, ChatMemoryStore) {
        let dir = TempDir::new().unwrap();
        let store = ChatMemoryStore::open(dir.path().join(".agent-memory")).unwrap();
        (dir, store)
    }

    #[test]
    fn sanitize_rules() {
        assert_eq!(sanitize_key(None), "default");
        assert_eq!(sanitize_key(Some("agent-1")), "agent-1");
        assert_eq!(sanitize_key(Some("team/lead")), "team_lead");
        assert_eq!(sanitize_key(Some("a b.c:d")), "a_b_c_d");
        assert_eq!(sanitize_key(Some("café")), "caf_");
    }

    #[test]
    fn file_name_pattern() {
        let (_dir, store) = store();
        let path = store.path_for(Some("analyst"));
        assert_eq!(path.file_name().unwrap(), "analyst_chat_memory.json");
        assert_eq!(path.parent().unwrap(), store.dir());
    }

    #[tokio::test]
    async fn get_update_delete_cycle() {
        let (_dir, store) = store();
        assert!(store.get(Some("agent-1")).await.unwrap().is_empty());

        let msgs = vec![ChatMessage::user("m1"), ChatMessage::ai("m2")];
        store.update(Some("agent-1"), &msgs).await.unwrap();
        assert_eq!(store.get(Some("agent-1")).await.unwrap(), msgs);

        store.delete(Some("agent-1")).await.unwrap();
        assert!(store.get(Some("agent-1")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_replaces_whole_sequence() {
        let (_dir, store) = store();
        store
            .update(Some("k"), &[ChatMessage::user("a"), ChatMessage::user("b")])
            .await
            .unwrap();
        store.update(Some("k"), &[ChatMessage::user("c")]).await.unwrap();
        assert_eq!(store.get(Some("k")).await.unwrap(), vec![ChatMessage::user("c")]);
    }

    #[tokio::test]
    async fn blank_document_is_empty() {
        let (_dir, store) = store();
        std::fs::write(store.path_for(Some("k")), "  \n").unwrap();
        assert!(store.get(Some("k")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn malformed_document_is_corrupt() {
        let (_dir, store) = store();
        std::fs::write(store.path_for(Some("k")), "{not json").unwrap();
        let err = store.get(Some("k")).await.unwrap_err();
        assert!(matches!(err, MemoryError::Corrupt { .. }));
        assert!(err.to_string().contains("'k'"));
    }

    #[tokio::test]
    async fn delete_missing_is_noop() {
        let (_dir, store) = store();
        store.delete(Some("ghost")).await.unwrap();
        store.delete(None).await.unwrap();
    }

    #[tokio::test]
    async fn absent_key_uses_default_document() {
        let (_dir, store) = store();
        store.update(None, &[ChatMessage::user("x")]).await.unwrap();
        assert!(store.path_for(Some("default")).exists());
        assert_eq!(store.get(Some("default")).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn keys_lists_stored_tokens() {
        let (_dir, store) = store();
        store.update(Some("developer"), &[]).await.unwrap();
        store.update(Some("team/lead"), &[]).await.unwrap();
        std::fs::write(store.dir().join("notes.txt"), "x").unwrap();
        assert_eq!(store.keys().await.unwrap(), vec!["developer", "team_lead"]);
    }
}
