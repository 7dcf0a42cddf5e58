//! Strongly typed tool inputs
//!
//! Each known tool has a record mirroring its advertised schema. Records use
//! `deny_unknown_fields`, which matches `"additionalProperties": false`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Input for `record_user_details`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserDetailsInput {
    pub email: String,
    pub name: Option<String>,
    pub organization: Option<String>,
    pub role: Option<String>,
    pub notes: Option<String>,
    pub source: Option<String>,
    pub timestamp: Option<String>,
}

/// Input for `record_unknown_question`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UnknownQuestionInput {
    pub question: String,
    pub intent_estimation: Option<String>,
    pub timestamp: Option<String>,
}

/// Input for `record_conversation_log`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConversationLogInput {
    pub summary: String,
    pub sentiment: Option<String>,
    pub next_action: Option<String>,
}

/// Input for `record_job_interest`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobInterestInput {
    pub role_title: String,
    pub company: Option<String>,
    pub status: Option<String>,
}

/// Strongly typed tool input enum
#[derive(Debug, Clone, PartialEq)]
pub enum ToolInput {
    RecordUserDetails(UserDetailsInput),
    RecordUnknownQuestion(UnknownQuestionInput),
    RecordConversationLog(ConversationLogInput),
    RecordJobInterest(JobInterestInput),
    /// A name outside the known set; passed through for custom registry entries
    Unknown { name: String, input: Value },
}

#[derive(Debug, Error)]
pub enum ToolArgumentError {
    #[error("arguments for {tool} are not valid JSON: {source}")]
    Malformed {
        tool: String,
        source: serde_json::Error,
    },
    #[error("arguments for {tool} must be a JSON object")]
    NotAnObject { tool: String },
    #[error("arguments for {tool} do not match its schema: {source}")]
    Schema {
        tool: String,
        source: serde_json::Error,
    },
}

impl ToolInput {
    /// Parse the raw argument payload of a tool call.
    ///
    /// An empty payload is read as `{}` so required-field errors surface as
    /// schema errors rather than JSON syntax errors.
    pub fn parse(name: &str, arguments: &str) -> Result<Self, ToolArgumentError> {
        let trimmed = arguments.trim();
        let value = if trimmed.is_empty() {
            Value::Object(Map::new())
        } else {
            serde_json::from_str(trimmed).map_err(|source| ToolArgumentError::Malformed {
                tool: name.to_string(),
                source,
            })?
        };
        Self::from_value(name, value)
    }

    /// Parse from tool name and JSON value
    pub fn from_value(name: &str, value: Value) -> Result<Self, ToolArgumentError> {
        if !value.is_object() {
            return Err(ToolArgumentError::NotAnObject {
                tool: name.to_string(),
            });
        }

        match name {
            "record_user_details" => typed(name, value).map(ToolInput::RecordUserDetails),
            "record_unknown_question" => typed(name, value).map(ToolInput::RecordUnknownQuestion),
            "record_conversation_log" => typed(name, value).map(ToolInput::RecordConversationLog),
            "record_job_interest" => typed(name, value).map(ToolInput::RecordJobInterest),
            _ => Ok(ToolInput::Unknown {
                name: name.to_string(),
                input: value,
            }),
        }
    }

    /// Get the tool name
    pub fn tool_name(&self) -> &str {
        match self {
            ToolInput::RecordUserDetails(_) => "record_user_details",
            ToolInput::RecordUnknownQuestion(_) => "record_unknown_question",
            ToolInput::RecordConversationLog(_) => "record_conversation_log",
            ToolInput::RecordJobInterest(_) => "record_job_interest",
            ToolInput::Unknown { name, .. } => name,
        }
    }
}

fn typed<T: DeserializeOwned>(name: &str, value: Value) -> Result<T, ToolArgumentError> {
    serde_json::from_value(value).map_err(|source| ToolArgumentError::Schema {
        tool: name.to_string(),
        source,
    })
}
