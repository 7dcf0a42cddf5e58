//! `record_job_interest` - note a role or opportunity a visitor mentions

use super::{or_not_provided, Tool, ToolContext, ToolInput, ToolOutput};
use async_trait::async_trait;
use serde_json::{json, Value};

pub struct RecordJobInterestTool;

#[async_trait]
impl Tool for RecordJobInterestTool {
    fn name(&self) -> &'static str {
        "record_job_interest"
    }

    fn description(&self) -> String {
        "Records when a recruiter or user mentions a role or opportunity of interest.".to_string()
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "role_title": {
                    "type": "string",
                    "description": "Job title or position discussed"
                },
                "company": {
                    "type": "string",
                    "description": "Company or organization name"
                },
                "status": {
                    "type": "string",
                    "description": "Status of interaction (interested, applied, follow-up scheduled)"
                }
            },
            "required": ["role_title"],
            "additionalProperties": false
        })
    }

    async fn run(&self, input: ToolInput, ctx: ToolContext) -> ToolOutput {
        let job = match input {
            ToolInput::RecordJobInterest(job) => job,
            other => {
                return ToolOutput::error(format!(
                    "record_job_interest received input for {}",
                    other.tool_name()
                ))
            }
        };
        let message = format!(
            "Recording job interest - Role: {}, Company: {}, Status: {}",
            job.role_title,
            or_not_provided(job.company.as_deref()),
            or_not_provided(job.status.as_deref()),
        );
        ctx.notify(&message).await;
        ToolOutput::recorded()
    }
}
