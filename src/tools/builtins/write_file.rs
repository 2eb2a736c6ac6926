//! Built-in `write_file` and `append_to_file` tools.

use serde_json::{json, Value};

use crate::namespace::{Namespace, NamespaceError, WriteStatus};
use crate::tools::{register_tool, required_str, ToolMeta};

/// Create or overwrite a file.
///
/// Args: `{ "path": "…", "content": "…" }`.  A missing or empty `content`
/// performs no write.
pub async fn write_file(ns: &Namespace, args: Value, owner: &str) -> anyhow::Result<String> {
    let path = required_str(&args, "path", "write_file")?;
    let content = args.get("content").and_then(Value::as_str);

    let text = match ns.write(path, content, owner).await {
        Ok(WriteStatus::SkippedEmpty) => "Content is empty. No write operation performed.".to_string(),
        Ok(_) => format!("File written successfully: {path}"),
        Err(NamespaceError::Io { source, .. }) => format!("Error writing file {path}: {source}"),
        Err(e) => e.to_string(),
    };
    Ok(text)
}

/// Append to a file, creating it when absent.
///
/// Args: `{ "path": "…", "content": "…" }`
pub async fn append_to_file(ns: &Namespace, args: Value, owner: &str) -> anyhow::Result<String> {
    let path = required_str(&args, "path", "append_to_file")?;
    let content = required_str(&args, "content", "append_to_file")?;

    let text = match ns.append(path, content, owner).await {
        Ok(_) => format!("Content appended successfully: {path}"),
        Err(NamespaceError::Io { source, .. }) => {
            format!("Error appending to file {path}: {source}")
        }
        Err(e) => e.to_string(),
    };
    Ok(text)
}

/// Register the `write_file` and `append_to_file` tool metadata.
pub fn register() {
    register_tool(ToolMeta {
        name: "write_file".into(),
        description: "Writes content to a file (path is relative to the project folder). Overwrites if the file exists.".into(),
        args_schema: json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "The relative path to the file to write."
                },
                "content": {
                    "type": "string",
                    "description": "The complete content to write to the file."
                }
            },
            "required": ["path", "content"],
            "additionalProperties": false
        }),
    });
    register_tool(ToolMeta {
        name: "append_to_file".into(),
        description: "Appends content to a file (path is relative to the project folder), creating it if needed.".into(),
        args_schema: json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "The relative path to the file to append to."
                },
                "content": {
                    "type": "string",
                    "description": "The content to append to the file."
                }
            },
            "required": ["path", "content"],
            "additionalProperties": false
        }),
    });
}
