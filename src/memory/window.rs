//! Sliding-window chat memory on top of [`ChatMemoryStore`].

use std::sync::Arc;

use super::{ChatMemoryStore, ChatMessage, MemoryError};
use crate::roles::AgentRole;

/// Window size used by the per-role constructors.
pub const DEFAULT_MAX_MESSAGES: usize = 100;

/// A bounded conversation window persisted under one key.
///
/// At most one system message is kept and it is never evicted.  When the
/// window overflows the oldest other message goes first; evicting an AI
/// message that requested tools also drops the tool results answering it,
/// so the log never starts with an orphaned result.
#[derive(Debug, Clone)]
pub struct ChatMemory {
    id: String,
    max_messages: usize,
    store: Arc<ChatMemoryStore>,
}

impl ChatMemory {
    /// `max_messages` below 1 is raised to 1.
    pub fn new(id: impl Into<String>, max_messages: usize, store: Arc<ChatMemoryStore>) -> Self {
        Self {
            id: id.into(),
            max_messages: max_messages.max(1),
            store,
        }
    }

    /// Memory keyed by the role name with the default window.
    pub fn for_role(role: AgentRole, store: Arc<ChatMemoryStore>) -> Self {
        Self::new(role.as_str(), DEFAULT_MAX_MESSAGES, store)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn max_messages(&self) -> usize {
        self.max_messages
    }

    /// Add `message` and persist the resulting window.
    pub async fn add(&self, message: ChatMessage) -> Result<(), MemoryError> {
        let mut messages = self.store.get(Some(&self.id)).await?;

        if message.is_system() {
            if let Some(pos) = messages.iter().position(ChatMessage::is_system) {
                if messages[pos] == message {
                    return Ok(());
                }
                messages.remove(pos);
            }
        }

        messages.push(message);
        ensure_capacity(&mut messages, self.max_messages);
        self.store.update(Some(&self.id), &messages).await
    }

    /// Current window, oldest first.
    pub async fn messages(&self) -> Result<Vec<ChatMessage>, MemoryError> {
        let mut messages = self.store.get(Some(&self.id)).await?;
        ensure_capacity(&mut messages, self.max_messages);
        Ok(messages)
    }

    pub async fn clear(&self) -> Result<(), MemoryError> {
        self.store.delete(Some(&self.id)).await
    }
}

fn ensure_capacity(messages: &mut Vec<ChatMessage>, max: usize) {
    while messages.len() > max {
        let idx = usize::from(messages[0].is_system());
        if idx >= messages.len() {
            break;
        }
        let evicted = messages.remove(idx);
        if evicted.has_tool_requests() {
            while matches!(messages.get(idx), Some(ChatMessage::ToolExecutionResult { .. })) {
                messages.remove(idx);
            }
        }
    }
}
