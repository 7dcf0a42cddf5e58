//! API request and response types

use super::history::Exchange;
use serde::{Deserialize, Serialize};

/// Request to send a chat message
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    /// Prior exchanges as rendered by the widget
    #[serde(default)]
    pub history: Vec<Exchange>,
}

/// Updated widget history after a turn
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub history: Vec<Exchange>,
}

/// Persona details for rendering the widget
#[derive(Debug, Serialize, Deserialize)]
pub struct PersonaResponse {
    pub name: String,
    pub greeting: String,
    /// Initial history: the greeting as the first assistant line
    pub history: Vec<Exchange>,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
