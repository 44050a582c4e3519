//! Review policy for the `write_email` tool.

use async_trait::async_trait;
use proto::{
    ActionRequest, AgentMessage, ApprovalRequest, Error, ReviewCapabilities, ReviewDecision,
    ToolCall,
};

use super::edit::handle_tool_edit;
use super::policy::{HandlerOutcome, ReviewPolicy, StateExtractor};
use crate::registry::ToolRegistry;
use crate::state::ConversationState;

const TOOL_NAME: &str = "write_email";

/// Outgoing email requires approval before it is sent. The reviewer may
/// accept, ignore the draft, edit it, or reply with feedback.
pub struct WriteEmailReview;

#[async_trait]
impl ReviewPolicy for WriteEmailReview {
    fn description(&self) -> &str {
        "Email sending requires approval"
    }

    fn build_payload(
        &self,
        call: &ToolCall,
        state: &ConversationState,
        extractor: Option<&StateExtractor>,
    ) -> ApprovalRequest {
        let email_context = extractor.map(|f| f(state)).unwrap_or_default();
        let recipient = call
            .arguments
            .get("to")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("unknown");

        ApprovalRequest {
            action_request: ActionRequest {
                action: call.name.clone(),
                args: call.arguments.clone(),
            },
            config: ReviewCapabilities {
                allow_ignore: true,
                allow_respond: true,
                allow_edit: true,
                allow_accept: true,
            },
            description: format!("{email_context}\n📧 Email to {recipient} pending approval"),
        }
    }

    async fn process(
        &self,
        decision: &ReviewDecision,
        call: &ToolCall,
        state: &ConversationState,
        tools: &ToolRegistry,
    ) -> Result<HandlerOutcome, Error> {
        match decision {
            ReviewDecision::Accept => {
                let observation = tools
                    .execute(&call.id, TOOL_NAME, call.arguments.clone())
                    .await?;
                Ok(HandlerOutcome::single(AgentMessage::tool_result(
                    &call.id,
                    TOOL_NAME,
                    observation.output,
                )))
            }
            ReviewDecision::Ignore => Ok(HandlerOutcome::single(AgentMessage::tool_result(
                &call.id,
                TOOL_NAME,
                "User ignored this email draft. Ignore this email and end the workflow.",
            ))),
            ReviewDecision::Edit { args } => {
                let messages =
                    handle_tool_edit(call, &args.args, state, tools, TOOL_NAME).await?;
                Ok(HandlerOutcome { messages })
            }
            ReviewDecision::Response { args } => {
                Ok(HandlerOutcome::single(AgentMessage::tool_result(
                    &call.id,
                    TOOL_NAME,
                    format!(
                        "User gave feedback, which we can incorporate into the email. \
                         Feedback: {args}"
                    ),
                )))
            }
            // This tool declines via `ignore`; a `reject` is inert here.
            ReviewDecision::Reject => Ok(HandlerOutcome::empty()),
        }
    }
}
