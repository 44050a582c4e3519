//! Email sending tool.

use async_trait::async_trait;
use proto::{ToolError, ToolResult};
use serde::Deserialize;
use tracing::debug;

use crate::Tool;

#[derive(Debug, Deserialize)]
struct WriteEmailArgs {
    to: String,
    subject: String,
    content: String,
}

/// Tool that writes and sends an email to a specified recipient.
pub struct WriteEmailTool;

#[async_trait]
impl Tool for WriteEmailTool {
    fn name(&self) -> &str {
        "write_email"
    }

    fn description(&self) -> &str {
        "Write and send an email to a specified recipient. Use when the \
         reply to the current thread is ready to go out and the recipient \
         address, subject, and body can be determined from the conversation."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "to": {
                    "type": "string",
                    "description": "The recipient's email address"
                },
                "subject": {
                    "type": "string",
                    "description": "The subject line of the email"
                },
                "content": {
                    "type": "string",
                    "description": "The full body content of the email"
                }
            },
            "required": ["to", "subject", "content"]
        })
    }

    async fn execute(
        &self,
        call_id: &str,
        args: serde_json::Value,
    ) -> Result<ToolResult, ToolError> {
        let args: WriteEmailArgs =
            serde_json::from_value(args).map_err(|e| ToolError::InvalidArgs(e.to_string()))?;

        debug!(to = %args.to, subject = %args.subject, "Sending email");

        Ok(ToolResult::success(
            call_id,
            self.name(),
            format!(
                "Email sent to {} with subject '{}' and content: {}",
                args.to, args.subject, args.content
            ),
        ))
    }
}
