//! `record_unknown_question` - log questions the agent could not answer

use super::{or_not_provided, Tool, ToolContext, ToolInput, ToolOutput};
use async_trait::async_trait;
use serde_json::{json, Value};

pub struct RecordUnknownQuestionTool;

#[async_trait]
impl Tool for RecordUnknownQuestionTool {
    fn name(&self) -> &'static str {
        "record_unknown_question"
    }

    fn description(&self) -> String {
        "Records questions the AI agent couldn't answer to improve future responses.".to_string()
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "question": {
                    "type": "string",
                    "description": "The question that the AI could not answer"
                },
                "intent_estimation": {
                    "type": "string",
                    "description": "Best guess of the user's intent (e.g., 'Job Role Inquiry', 'Project Detail', 'Education Background')"
                },
                "timestamp": {
                    "type": "string",
                    "description": "When this occurred (UTC format)"
                }
            },
            "required": ["question"],
            "additionalProperties": false
        })
    }

    async fn run(&self, input: ToolInput, ctx: ToolContext) -> ToolOutput {
        let args = match input {
            ToolInput::RecordUnknownQuestion(args) => args,
            other => {
                return ToolOutput::error(format!(
                    "record_unknown_question received input for {}",
                    other.tool_name()
                ))
            }
        };
        let timestamp = args
            .timestamp
            .unwrap_or_else(|| chrono::Utc::now().to_rfc3339());
        let message = format!(
            "Recording unknown question: {} (intent: {}, at {timestamp})",
            args.question,
            or_not_provided(args.intent_estimation.as_deref()),
        );
        ctx.notify(&message).await;
        ToolOutput::recorded()
    }
}
