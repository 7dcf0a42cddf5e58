//! Conversion between the widget's pair-based history and the transcript
//!
//! The widget keeps history as `[user, assistant]` pairs. Either side may be
//! `null` or empty, as in the opening `["", greeting]` pair.

use crate::llm::Message;
use serde::{Deserialize, Serialize};

/// One `[user, assistant]` pair
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exchange(pub Option<String>, pub Option<String>);

impl Exchange {
    pub fn new(user: impl Into<String>, assistant: impl Into<String>) -> Self {
        Self(Some(user.into()), Some(assistant.into()))
    }

    /// The opening pair showing only the greeting
    pub fn greeting(text: impl Into<String>) -> Self {
        Self(Some(String::new()), Some(text.into()))
    }
}

/// Flatten widget history into transcript messages, skipping empty sides
pub fn to_transcript(history: &[Exchange]) -> Vec<Message> {
    let mut messages = Vec::with_capacity(history.len() * 2);
    for Exchange(user, assistant) in history {
        if let Some(text) = non_empty(user.as_deref()) {
            messages.push(Message::user(text));
        }
        if let Some(text) = non_empty(assistant.as_deref()) {
            messages.push(Message::assistant(text));
        }
    }
    messages
}

/// History after a completed turn
pub fn from_turn(
    mut history: Vec<Exchange>,
    user: impl Into<String>,
    assistant: impl Into<String>,
) -> Vec<Exchange> {
    history.push(Exchange::new(user, assistant));
    history
}

fn non_empty(text: Option<&str>) -> Option<&str> {
    text.filter(|t| !t.trim().is_empty())
}
