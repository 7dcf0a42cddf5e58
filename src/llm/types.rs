//! Common types for model backend interactions

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Transcript role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Tool => "tool",
        }
    }
}

/// One transcript entry.
///
/// `tool_calls` is only populated on assistant entries that request tool
/// execution; `tool_call_id` only on tool entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl Message {
    fn plain(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: Some(content.into()),
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::plain(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::plain(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::plain(Role::Assistant, content)
    }

    /// Assistant entry requesting tool execution
    pub fn assistant_tool_calls(content: Option<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            role: Role::Assistant,
            content,
            tool_calls,
            tool_call_id: None,
        }
    }

    /// Tool result entry answering the call with `tool_call_id`
    pub fn tool_result(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: Role::Tool,
            content: Some(content.into()),
            tool_calls: Vec::new(),
            tool_call_id: Some(tool_call_id.into()),
        }
    }

    pub fn text(&self) -> &str {
        self.content.as_deref().unwrap_or("")
    }
}

/// A tool invocation requested by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    /// Raw JSON arguments as emitted by the backend
    pub arguments: String,
}

impl ToolCall {
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments: arguments.into(),
        }
    }
}

/// Tool advertised to the backend
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub parameter_schema: Value,
}

/// Backend request
#[derive(Debug, Clone)]
pub struct LlmRequest {
    pub messages: Vec<Message>,
    pub tools: Vec<ToolDescriptor>,
    pub max_tokens: Option<u32>,
}

/// Backend finish indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    /// Plain natural-language answer
    Answer,
    /// The message carries tool calls to execute
    ToolCalls,
}

/// Backend response
#[derive(Debug, Clone)]
pub struct LlmResponse {
    pub finish: FinishReason,
    pub message: Message,
    pub usage: Usage,
}

impl LlmResponse {
    /// Plain answer response
    pub fn answer(text: impl Into<String>) -> Self {
        Self {
            finish: FinishReason::Answer,
            message: Message::assistant(text),
            usage: Usage::default(),
        }
    }

    /// Tool-call response
    pub fn tool_calls(calls: Vec<ToolCall>) -> Self {
        Self {
            finish: FinishReason::ToolCalls,
            message: Message::assistant_tool_calls(None, calls),
            usage: Usage::default(),
        }
    }

    pub fn text(&self) -> &str {
        self.message.text()
    }

    /// True when the loop has tool calls to execute
    pub fn wants_tools(&self) -> bool {
        self.finish == FinishReason::ToolCalls && !self.message.tool_calls.is_empty()
    }
}

/// Usage statistics
#[derive(Debug, Clone, Copy, Default)]
pub struct Usage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}
