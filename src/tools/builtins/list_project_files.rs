//! Built-in `list_project_files` tool: renders the whole namespace,
//! file contents included, honouring the ignore file.

use serde_json::{json, Value};

use crate::namespace::{Namespace, NamespaceError};
use crate::tools::{register_tool, ToolMeta};

/// Args: `{}`.  Returns the rendered snapshot, or an error naming the root.
pub async fn list_project_files(ns: &Namespace, _args: Value) -> anyhow::Result<String> {
    let text = match ns.list_tree().await {
        Ok(rendered) => rendered,
        Err(NamespaceError::Io { source, .. }) => format!(
            "Error listing project files in {}: {source}",
            ns.root().display()
        ),
        Err(e) => format!("Error listing project files in {}: {e}", ns.root().display()),
    };
    Ok(text)
}

/// Register the `list_project_files` tool metadata.
pub fn register() {
    register_tool(ToolMeta {
        name: "list_project_files".into(),
        description: "Lists the entire content of the project folder as a tree with file contents, respecting .gitignore patterns.".into(),
        args_schema: json!({
            "type": "object",
            "properties": {},
            "additionalProperties": false
        }),
    });
}
