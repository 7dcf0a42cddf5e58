//! `record_user_details` - capture contact details a visitor shares

use super::input::UserDetailsInput;
use super::{or_not_provided, Tool, ToolContext, ToolInput, ToolOutput};
use async_trait::async_trait;
use serde_json::{json, Value};

pub struct RecordUserDetailsTool;

impl RecordUserDetailsTool {
    fn message(input: &UserDetailsInput) -> String {
        let name = input
            .name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or("Name not provided");
        let timestamp = input
            .timestamp
            .clone()
            .unwrap_or_else(|| chrono::Utc::now().to_rfc3339());

        format!(
            "Recording {name} with email {email} and notes {notes} \
             (organization: {organization}, role: {role}, source: {source}, at {timestamp})",
            email = input.email,
            notes = or_not_provided(input.notes.as_deref()),
            organization = or_not_provided(input.organization.as_deref()),
            role = or_not_provided(input.role.as_deref()),
            source = or_not_provided(input.source.as_deref()),
        )
    }
}

#[async_trait]
impl Tool for RecordUserDetailsTool {
    fn name(&self) -> &'static str {
        "record_user_details"
    }

    fn description(&self) -> String {
        "Records when a recruiter or user provides contact details or shows interest.".to_string()
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "email": {
                    "type": "string",
                    "description": "Email address of the recruiter or user"
                },
                "name": {
                    "type": "string",
                    "description": "Full name of the recruiter or user, if provided"
                },
                "organization": {
                    "type": "string",
                    "description": "Company or organization the user represents, if known"
                },
                "role": {
                    "type": "string",
                    "description": "User's job title or recruiting role, if provided"
                },
                "notes": {
                    "type": "string",
                    "description": "Summary of the conversation or their interest (e.g., internship, full-time role)"
                },
                "source": {
                    "type": "string",
                    "description": "Source of interaction (LinkedIn, website chat, email, etc.)"
                },
                "timestamp": {
                    "type": "string",
                    "description": "UTC timestamp of when the interaction was recorded"
                }
            },
            "required": ["email"],
            "additionalProperties": false
        })
    }

    async fn run(&self, input: ToolInput, ctx: ToolContext) -> ToolOutput {
        let details = match input {
            ToolInput::RecordUserDetails(details) => details,
            other => {
                return ToolOutput::error(format!(
                    "record_user_details received input for {}",
                    other.tool_name()
                ))
            }
        };
        ctx.notify(&Self::message(&details)).await;
        ToolOutput::recorded()
    }
}
