//! Agent-facing tool boundary.
//!
//! Every tool takes JSON arguments and returns **text**.  Failures of any
//! kind (bad arguments, sandbox violations, I/O errors) come back as a
//! human-readable string so the calling agent always has something to act
//! on; nothing here returns an error past [`call_tool`].
//!
//! A **tools metadata registry** tracks each tool's name, description and
//! JSON-Schema for its arguments.  Call [`init()`] at startup to register
//! the builtins; use [`list_tools()`] to retrieve the catalogue (e.g. for
//! prompt injection).

pub mod builtins;

use once_cell::sync::Lazy;
use serde_json::Value;
use std::sync::Mutex;
use tracing::debug;

use crate::namespace::Namespace;

pub use builtins::list_project_files::list_project_files;
pub use builtins::read_file::read_file;
pub use builtins::write_file::{append_to_file, write_file};

// ── Tool metadata registry ──────────────────────────────────

/// Metadata describing a tool available to agents.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ToolMeta {
    /// Short machine-friendly name (e.g. `"read_file"`).
    pub name: String,
    /// Human-readable one-liner describing what the tool does.
    pub description: String,
    /// JSON Schema object describing the expected `args` value.
    pub args_schema: Value,
}

static REGISTRY: Lazy<Mutex<Vec<ToolMeta>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Register a tool's metadata.
///
/// Duplicate names are silently ignored (first-registration wins).
pub fn register_tool(meta: ToolMeta) {
    let mut reg = REGISTRY.lock().expect("tool registry poisoned");
    if reg.iter().any(|m| m.name == meta.name) {
        return;
    }
    reg.push(meta);
}

/// Return metadata for every registered tool.
pub fn list_tools() -> Vec<ToolMeta> {
    REGISTRY.lock().expect("tool registry poisoned").clone()
}

/// List the names of all built-in tools.
pub fn builtin_tool_names() -> &'static [&'static str] {
    &["read_file", "write_file", "append_to_file", "list_project_files"]
}

/// Register all built-in tools in the metadata registry.
pub fn init() {
    builtins::read_file::register();
    builtins::write_file::register();
    builtins::list_project_files::register();
}

// ── Dispatcher ───────────────────────────────────────────────

/// Call a built-in tool by name on behalf of `owner`.
///
/// The owner is attributed to writes (and passed to the indexing hook).
pub async fn call_tool(name: &str, ns: &Namespace, args: Value, owner: &str) -> String {
    debug!(tool = %name, owner = %owner, "tool call");
    let result = match name {
        "read_file" => builtins::read_file::read_file(ns, args).await,
        "write_file" => builtins::write_file::write_file(ns, args, owner).await,
        "append_to_file" => builtins::write_file::append_to_file(ns, args, owner).await,
        "list_project_files" => builtins::list_project_files::list_project_files(ns, args).await,
        other => Err(anyhow::anyhow!("unknown tool: {other}")),
    };
    match result {
        Ok(text) => text,
        Err(e) => e.to_string(),
    }
}

/// Fetch a required string argument.
pub(crate) fn required_str<'a>(args: &'a Value, key: &str, tool: &str) -> anyhow::Result<&'a str> {
    args.get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| anyhow::anyhow!("{tool}: missing `{key}` argument"))
}
