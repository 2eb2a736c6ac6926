//! agentfs: sandboxed file namespace and persistent chat memory for
//! autonomous agents.
//!
//! This library crate re-exports modules so integration tests
//! (under `tests/`) can access them.

pub mod config;
pub mod ignore;
pub mod indexer;
pub mod memory;
pub mod namespace;
pub mod roles;
pub mod tools;

pub use ignore::{IgnoreRule, IgnoreRules};
pub use indexer::Indexer;
pub use memory::{ChatMemory, ChatMemoryStore, ChatMessage, MemoryError};
pub use namespace::{Namespace, NamespaceError, ReadOutcome, Snapshot, WriteStatus};
pub use roles::{owner_from_label, AgentRole};

/// Return the agentfs home directory.
///
/// Resolution order:
/// 1. `AGENTFS_HOME` environment variable
/// 2. `$HOME/.agentfs`
pub fn agentfs_home() -> std::path::PathBuf {
    if let Ok(p) = std::env::var("AGENTFS_HOME") {
        std::path::PathBuf::from(p)
    } else {
        dirs::home_dir()
            .unwrap_or_else(|| std::path::PathBuf::from("."))
            .join(".agentfs")
    }
}
