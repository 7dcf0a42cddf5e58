//! Tools the model backend may invoke mid-turn
//!
//! Tools are stateless singletons; all per-call context arrives via
//! [`ToolContext`]. The registry is built once at startup and shared
//! read-only across turns.

pub mod input;
mod conversation_log;
mod job_interest;
mod unknown_question;
mod user_details;

pub use conversation_log::RecordConversationLogTool;
pub use input::{ToolArgumentError, ToolInput};
pub use job_interest::RecordJobInterestTool;
pub use unknown_question::RecordUnknownQuestionTool;
pub use user_details::RecordUserDetailsTool;

use crate::llm::ToolDescriptor;
use crate::notifier::Notifier;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use thiserror::Error;

/// Result from tool execution, serialized into the tool-role message
#[derive(Debug, Clone, PartialEq)]
pub struct ToolOutput {
    pub success: bool,
    pub value: Value,
}

impl ToolOutput {
    /// The `{"recorded": "ok"}` acknowledgement every record tool returns
    pub fn recorded() -> Self {
        Self {
            success: true,
            value: json!({ "recorded": "ok" }),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            value: json!({ "error": message.into() }),
        }
    }

    /// Content for the tool-role message
    pub fn to_content(&self) -> String {
        self.value.to_string()
    }
}

/// All context needed for a tool invocation.
///
/// Created fresh for each turn.
#[derive(Clone)]
pub struct ToolContext {
    /// Turn this call belongs to, for log correlation
    pub turn_id: String,
    notifier: Arc<dyn Notifier>,
}

impl ToolContext {
    pub fn new(turn_id: impl Into<String>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            turn_id: turn_id.into(),
            notifier,
        }
    }

    /// Forward a notification, tagged with the turn in logs
    pub async fn notify(&self, text: &str) {
        tracing::debug!(turn_id = %self.turn_id, "Sending notification");
        self.notifier.notify(text).await;
    }
}

/// Trait for tools that can be executed by the dispatch loop
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool name, unique within a registry
    fn name(&self) -> &str;

    /// Tool description for the model backend
    fn description(&self) -> String;

    /// JSON schema for tool input, advertised verbatim
    fn input_schema(&self) -> Value;

    /// Execute with input already validated by [`ToolInput::parse`]
    async fn run(&self, input: ToolInput, ctx: ToolContext) -> ToolOutput;

    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: self.name().to_string(),
            description: self.description(),
            parameter_schema: self.input_schema(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("tool already registered: {0}")]
    DuplicateTool(String),
    #[error("unknown tool: {0}")]
    NotFound(String),
}

/// Ordered collection of uniquely named tools
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry advertising all four record tools
    pub fn standard() -> Self {
        let tools: Vec<Arc<dyn Tool>> = vec![
            Arc::new(RecordUserDetailsTool),
            Arc::new(RecordUnknownQuestionTool),
            Arc::new(RecordConversationLogTool),
            Arc::new(RecordJobInterestTool),
        ];
        Self { tools }
    }

    /// Add a tool. Fails without modifying the registry if the name is taken.
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Result<(), RegistryError> {
        if self.tools.iter().any(|t| t.name() == tool.name()) {
            return Err(RegistryError::DuplicateTool(tool.name().to_string()));
        }
        self.tools.push(tool);
        Ok(())
    }

    /// Look up a tool by name
    pub fn resolve(&self, name: &str) -> Result<Arc<dyn Tool>, RegistryError> {
        self.tools
            .iter()
            .find(|t| t.name() == name)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))
    }

    /// Descriptors in registration order, for advertising to the backend
    pub fn schemas(&self) -> Vec<ToolDescriptor> {
        self.tools.iter().map(|t| t.descriptor()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }
}

/// Render an optional field for notification text
pub(crate) fn or_not_provided(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => "not provided",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_registry_advertises_all_four() {
        let registry = ToolRegistry::standard();
        let names: Vec<_> = registry.schemas().into_iter().map(|d| d.name).collect();
        assert_eq!(
            names,
            vec![
                "record_user_details",
                "record_unknown_question",
                "record_conversation_log",
                "record_job_interest",
            ]
        );
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut registry = ToolRegistry::standard();
        let err = registry
            .register(Arc::new(RecordJobInterestTool))
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::DuplicateTool("record_job_interest".to_string())
        );
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn test_register_into_empty_registry() {
        let mut registry = ToolRegistry::new();
        assert_eq!(registry.len(), 0);
        registry.register(Arc::new(RecordUserDetailsTool)).unwrap();
        assert!(registry.resolve("record_user_details").is_ok());
    }

    #[test]
    fn test_resolve_is_deterministic_and_pure() {
        let registry = ToolRegistry::standard();
        let before = registry.schemas();

        for _ in 0..3 {
            let tool = registry.resolve("record_conversation_log").unwrap();
            assert_eq!(tool.name(), "record_conversation_log");
            assert_eq!(
                registry.resolve("nope").err(),
                Some(RegistryError::NotFound("nope".to_string()))
            );
        }

        assert_eq!(registry.schemas(), before);
    }

    #[test]
    fn test_schemas_reject_unlisted_fields() {
        for descriptor in ToolRegistry::standard().schemas() {
            assert_eq!(descriptor.parameter_schema["type"], "object");
            assert_eq!(
                descriptor.parameter_schema["additionalProperties"], false,
                "{} must reject unlisted fields",
                descriptor.name
            );
            assert!(!descriptor.description.is_empty());
        }
    }

    #[test]
    fn test_tool_output_content() {
        assert_eq!(ToolOutput::recorded().to_content(), r#"{"recorded":"ok"}"#);
        let err = ToolOutput::error("Unknown tool: x");
        assert!(!err.success);
        assert_eq!(err.to_content(), r#"{"error":"Unknown tool: x"}"#);
    }

    #[test]
    fn test_or_not_provided() {
        assert_eq!(or_not_provided(Some("Acme")), "Acme");
        assert_eq!(or_not_provided(Some("  ")), "not provided");
        assert_eq!(or_not_provided(None), "not provided");
    }
}
