//! Clarification question tool.

use async_trait::async_trait;
use proto::{ToolError, ToolResult};
use serde::Deserialize;

use crate::Tool;

#[derive(Debug, Deserialize)]
struct QuestionArgs {
    content: String,
}

/// Tool the model uses to ask the user a clarification question.
///
/// The approval flow answers (or declines) the question itself, so this
/// tool is never auto-invoked by a decision; executing it just echoes
/// the question back.
pub struct QuestionTool;

#[async_trait]
impl Tool for QuestionTool {
    fn name(&self) -> &str {
        "Question"
    }

    fn description(&self) -> &str {
        "Ask the user a clarification question when required to proceed. \
         Use only when the reply cannot be drafted confidently due to \
         missing, ambiguous, or conflicting information. Ask one clear \
         question at a time and do not include the drafted email."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "content": {
                    "type": "string",
                    "description": "The clarification question to ask the user"
                }
            },
            "required": ["content"]
        })
    }

    async fn execute(
        &self,
        call_id: &str,
        args: serde_json::Value,
    ) -> Result<ToolResult, ToolError> {
        let args: QuestionArgs =
            serde_json::from_value(args).map_err(|e| ToolError::InvalidArgs(e.to_string()))?;

        Ok(ToolResult::success(call_id, self.name(), args.content))
    }
}
