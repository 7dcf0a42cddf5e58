//! `record_conversation_log` - summarize a conversation for follow-up

use super::{or_not_provided, Tool, ToolContext, ToolInput, ToolOutput};
use async_trait::async_trait;
use serde_json::{json, Value};

pub struct RecordConversationLogTool;

#[async_trait]
impl Tool for RecordConversationLogTool {
    fn name(&self) -> &'static str {
        "record_conversation_log"
    }

    fn description(&self) -> String {
        "Summarizes key conversation points for long-term memory or analytics.".to_string()
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "summary": {
                    "type": "string",
                    "description": "Brief summary of what the user and AI discussed"
                },
                "sentiment": {
                    "type": "string",
                    "description": "Overall tone of the conversation (e.g., friendly, professional, curious)"
                },
                "next_action": {
                    "type": "string",
                    "description": "Recommended next step (e.g., 'follow up via email', 'send resume', 'schedule call')"
                }
            },
            "required": ["summary"],
            "additionalProperties": false
        })
    }

    async fn run(&self, input: ToolInput, ctx: ToolContext) -> ToolOutput {
        let log = match input {
            ToolInput::RecordConversationLog(log) => log,
            other => {
                return ToolOutput::error(format!(
                    "record_conversation_log received input for {}",
                    other.tool_name()
                ))
            }
        };
        let message = format!(
            "Recording conversation log - Summary: {}, Sentiment: {}, Next Action: {}",
            log.summary,
            or_not_provided(log.sentiment.as_deref()),
            or_not_provided(log.next_action.as_deref()),
        );
        ctx.notify(&message).await;
        ToolOutput::recorded()
    }
}
