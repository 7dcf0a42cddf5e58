//! Conversation session: the transcript for one turn
//!
//! A session starts as `[system, ...history, user]` and only ever grows.
//! It is private to the turn that created it.

use crate::llm::{Message, Role, ToolCall};
use thiserror::Error;

/// Correlation defects between tool calls and tool results
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranscriptError {
    #[error("tool result at index {index} has no tool_call_id")]
    MissingCallId { index: usize },
    #[error("tool result at index {index} answers unknown call {id}")]
    OrphanResult { index: usize, id: String },
    #[error("tool call {id} was never answered")]
    Unanswered { id: String },
}

/// Append-only transcript owned by one turn
#[derive(Debug, Clone, Default)]
pub struct Session {
    messages: Vec<Message>,
}

impl Session {
    /// Start a turn: persona instruction, prior history, then the new user message
    pub fn start(
        system_prompt: impl Into<String>,
        history: impl IntoIterator<Item = Message>,
        user_text: impl Into<String>,
    ) -> Self {
        let mut messages = vec![Message::system(system_prompt)];
        messages.extend(history);
        messages.push(Message::user(user_text));
        Self { messages }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Append an assistant message (plain answer or tool request)
    pub fn push_assistant(&mut self, message: Message) {
        debug_assert_eq!(message.role, Role::Assistant);
        self.messages.push(message);
    }

    /// Append the result for one tool call
    pub fn push_tool_result(&mut self, call: &ToolCall, content: impl Into<String>) {
        self.messages.push(Message::tool_result(call.id.clone(), content));
    }

    /// Check that tool results and tool calls pair up one-to-one, each
    /// result following the assistant message that requested it. Ids only
    /// need to be unique within one assistant message.
    pub fn verify_correlation(&self) -> Result<(), TranscriptError> {
        check_correlation(&self.messages)
    }
}

pub fn check_correlation(messages: &[Message]) -> Result<(), TranscriptError> {
    let mut pending: Vec<&str> = Vec::new();

    for (index, message) in messages.iter().enumerate() {
        match message.role {
            Role::Assistant => {
                if let Some(id) = pending.first() {
                    return Err(TranscriptError::Unanswered { id: (*id).to_string() });
                }
                pending.extend(message.tool_calls.iter().map(|c| c.id.as_str()));
            }
            Role::Tool => {
                let id = message
                    .tool_call_id
                    .as_deref()
                    .ok_or(TranscriptError::MissingCallId { index })?;
                let Some(position) = pending.iter().position(|p| *p == id) else {
                    return Err(TranscriptError::OrphanResult {
                        index,
                        id: id.to_string(),
                    });
                };
                pending.remove(position);
            }
            Role::System | Role::User => {}
        }
    }

    match pending.first() {
        Some(id) => Err(TranscriptError::Unanswered { id: (*id).to_string() }),
        None => Ok(()),
    }
}
