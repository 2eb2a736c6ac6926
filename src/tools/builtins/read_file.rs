//! Built-in `read_file` tool: reads a file inside the namespace.

use serde_json::{json, Value};

use crate::namespace::{Namespace, NamespaceError, ReadOutcome};
use crate::tools::{register_tool, required_str, ToolMeta};

/// Read a whole file as text.
///
/// Args: `{ "path": "…" }`
/// Returns the content, `The file is empty`, or an error description.
pub async fn read_file(ns: &Namespace, args: Value) -> anyhow::Result<String> {
    let path = required_str(&args, "path", "read_file")?;

    let text = match ns.read(path).await {
        Ok(ReadOutcome::Content(content)) => content,
        Ok(ReadOutcome::Empty) => "The file is empty".to_string(),
        Err(NamespaceError::Io { source, .. }) => format!("Error reading file {path}: {source}"),
        Err(e) => e.to_string(),
    };
    Ok(text)
}

/// Register the `read_file` tool metadata in the global registry.
pub fn register() {
    register_tool(ToolMeta {
        name: "read_file".into(),
        description: "Reads the content of a file (path is relative to the project folder).".into(),
        args_schema: json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "The relative path to the file to read."
                }
            },
            "required": ["path"],
            "additionalProperties": false
        }),
    });
}
