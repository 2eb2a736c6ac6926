//! Chat message schema persisted by the memory store.
//!
//! Messages serialize as objects tagged by `type`, e.g.
//! `{"type":"USER","text":"hi"}` or
//! `{"type":"AI","text":null,"toolExecutionRequests":[...]}`.

use serde::{Deserialize, Serialize};

/// A tool call requested by the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolExecutionRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    /// Arguments as a JSON-encoded string.
    #[serde(default)]
    pub arguments: String,
}

/// One message in an agent's conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChatMessage {
    System {
        text: String,
    },
    User {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
    Ai {
        #[serde(default)]
        text: Option<String>,
        #[serde(
            default,
            rename = "toolExecutionRequests",
            skip_serializing_if = "Vec::is_empty"
        )]
        tool_execution_requests: Vec<ToolExecutionRequest>,
    },
    ToolExecutionResult {
        #[serde(default)]
        id: Option<String>,
        #[serde(rename = "toolName")]
        tool_name: String,
        text: String,
    },
}

impl ChatMessage {
    pub fn system(text: impl Into<String>) -> Self {
        ChatMessage::System { text: text.into() }
    }

    pub fn user(text: impl Into<String>) -> Self {
        ChatMessage::User {
            text: text.into(),
            name: None,
        }
    }

    pub fn ai(text: impl Into<String>) -> Self {
        ChatMessage::Ai {
            text: Some(text.into()),
            tool_execution_requests: Vec::new(),
        }
    }

    pub fn ai_tool_calls(requests: Vec<ToolExecutionRequest>) -> Self {
        ChatMessage::Ai {
            text: None,
            tool_execution_requests: requests,
        }
    }

    pub fn tool_result(
        id: Option<String>,
        tool_name: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        ChatMessage::ToolExecutionResult {
            id,
            tool_name: tool_name.into(),
            text: text.into(),
        }
    }

    /// Role label: `system`, `user`, `ai` or `tool`.
    pub fn role(&self) -> &'static str {
        match self {
            ChatMessage::System { .. } => "system",
            ChatMessage::User { .. } => "user",
            ChatMessage::Ai { .. } => "ai",
            ChatMessage::ToolExecutionResult { .. } => "tool",
        }
    }

    /// Text content, if any.
    pub fn text(&self) -> Option<&str> {
        match self {
            ChatMessage::System { text }
            | ChatMessage::User { text, .. }
            | ChatMessage::ToolExecutionResult { text, .. } => Some(text),
            ChatMessage::Ai { text, .. } => text.as_deref(),
        }
    }

    pub fn is_system(&self) -> bool {
        matches!(self, ChatMessage::System { .. })
    }

    /// `true` for an AI message that requested at least one tool call.
    pub fn has_tool_requests(&self) -> bool {
        matches!(self, ChatMessage::Ai { tool_execution_requests, .. } if !tool_execution_requests.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wire_shape_is_type_tagged() {
        let msgs = vec![
            ChatMessage::system("be terse"),
            ChatMessage::user("hello"),
            ChatMessage::ai_tool_calls(vec![ToolExecutionRequest {
                id: Some("call-1".into()),
                name: "read_file".into(),
                arguments: r#"{"path":"a.txt"}"#.into(),
            }]),
            ChatMessage::tool_result(Some("call-1".into()), "read_file", "contents"),
        ];
        let value = serde_json::to_value(&msgs).unwrap();
        assert_eq!(
            value,
            json!([
                {"type": "SYSTEM", "text": "be terse"},
                {"type": "USER", "text": "hello"},
                {"type": "AI", "text": null, "toolExecutionRequests": [
                    {"id": "call-1", "name": "read_file", "arguments": "{\"path\":\"a.txt\"}"}
                ]},
                {"type": "TOOL_EXECUTION_RESULT", "id": "call-1", "toolName": "read_file", "text": "contents"}
            ])
        );
    }

    #[test]
    fn ai_message_without_requests_parses() {
        let msg: ChatMessage = serde_json::from_str(r#"{"type":"AI","text":"done"}"#).unwrap();
        assert_eq!(msg, ChatMessage::ai("done"));
        assert!(!msg.has_tool_requests());
        assert_eq!(msg.role(), "ai");
    }
}
