//! Integration tests for the JSON-file chat memory store and its window.

use std::sync::Arc;

use agentfs::memory::{ChatMemory, ChatMemoryStore, ChatMessage, MemoryError};
use agentfs::AgentRole;
use tempfile::TempDir;

fn store() -> (TempDir, Arc<ChatMemoryStore>) {
    let dir = TempDir::new().unwrap();
    let store = ChatMemoryStore::open(dir.path().join(".agent-memory")).unwrap();
    (dir, Arc::new(store))
}

// ── Store contract ──────────────────────────────────────────

#[tokio::test]
async fn store_round_trip_survives_reopen() {
    let (dir, store) = store();
    let msgs = vec![ChatMessage::system("sys"), ChatMessage::user("m1")];
    store.update(Some("agent-1"), &msgs).await.unwrap();

    let reopened = ChatMemoryStore::open(dir.path().join(".agent-memory")).unwrap();
    assert_eq!(reopened.get(Some("agent-1")).await.unwrap(), msgs);
    assert!(dir
        .path()
        .join(".agent-memory/agent-1_chat_memory.json")
        .exists());
}

#[tokio::test]
async fn colliding_keys_share_one_document() {
    let (_dir, store) = store();
    store
        .update(Some("team/lead"), &[ChatMessage::user("from slash")])
        .await
        .unwrap();

    let seen = store.get(Some("team_lead")).await.unwrap();
    assert_eq!(seen, vec![ChatMessage::user("from slash")]);

    store.delete(Some("team_lead")).await.unwrap();
    assert!(store.get(Some("team/lead")).await.unwrap().is_empty());
}

#[tokio::test]
async fn corrupt_document_surfaces_error() {
    let (_dir, store) = store();
    std::fs::write(store.path_for(Some("analyst")), "[{\"type\":\"NOPE\"}]").unwrap();

    let err = store.get(Some("analyst")).await.unwrap_err();
    assert!(matches!(err, MemoryError::Corrupt { .. }), "got {err:?}");
}

#[tokio::test]
async fn memories_are_isolated_per_key() {
    let (_dir, store) = store();
    store.update(Some("a"), &[ChatMessage::user("1")]).await.unwrap();
    store.update(Some("b"), &[ChatMessage::user("2")]).await.unwrap();
    store.delete(Some("a")).await.unwrap();
    assert_eq!(store.get(Some("b")).await.unwrap(), vec![ChatMessage::user("2")]);
}

// ── Window ──────────────────────────────────────────────────

#[tokio::test]
async fn role_memories_persist_between_instances() {
    let (_dir, store) = store();
    let first = ChatMemory::for_role(AgentRole::Developer, store.clone());
    first.add(ChatMessage::user("build it")).await.unwrap();
    first.add(ChatMessage::ai("done")).await.unwrap();

    let second = ChatMemory::for_role(AgentRole::Developer, store.clone());
    let msgs = second.messages().await.unwrap();
    assert_eq!(msgs, vec![ChatMessage::user("build it"), ChatMessage::ai("done")]);

    let other = ChatMemory::for_role(AgentRole::Analyst, store);
    assert!(other.messages().await.unwrap().is_empty());
}

#[tokio::test]
async fn window_never_exceeds_limit() {
    let (_dir, store) = store();
    let mem = ChatMemory::new("bounded", 4, store.clone());
    mem.add(ChatMessage::system("rules")).await.unwrap();
    for i in 0..10 {
        mem.add(ChatMessage::user(format!("u{i}"))).await.unwrap();
    }

    let persisted = store.get(Some("bounded")).await.unwrap();
    assert_eq!(persisted.len(), 4);
    assert_eq!(persisted[0], ChatMessage::system("rules"));
    assert_eq!(persisted[3], ChatMessage::user("u9"));
}
