//! Review policy for the `schedule_meeting` tool.

use async_trait::async_trait;
use proto::{
    ActionRequest, AgentMessage, ApprovalRequest, Error, ReviewCapabilities, ReviewDecision,
    ToolCall,
};

use super::edit::handle_tool_edit;
use super::policy::{HandlerOutcome, ReviewPolicy, StateExtractor};
use crate::registry::ToolRegistry;
use crate::state::ConversationState;

const TOOL_NAME: &str = "schedule_meeting";

/// Calendar invitations require approval before they go out.
pub struct ScheduleMeetingReview;

#[async_trait]
impl ReviewPolicy for ScheduleMeetingReview {
    fn description(&self) -> &str {
        "Meeting scheduling requires approval"
    }

    fn build_payload(
        &self,
        call: &ToolCall,
        _state: &ConversationState,
        _extractor: Option<&StateExtractor>,
    ) -> ApprovalRequest {
        let title = call
            .arguments
            .get("subject")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("Meeting");
        let attendee_count = call
            .arguments
            .get("attendees")
            .and_then(serde_json::Value::as_array)
            .map_or(0, Vec::len);

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
            description: format!(
                "📅 Scheduling '{title}' with {attendee_count} attendees pending approval"
            ),
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
            ReviewDecision::Reject => Ok(HandlerOutcome::single(AgentMessage::tool_result(
                &call.id,
                TOOL_NAME,
                "User ignored this calendar meeting draft. Ignore this meeting and end \
                 the workflow.",
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
                        "User gave feedback, which we can incorporate into the meeting \
                         request. Feedback: {args}"
                    ),
                )))
            }
            // This tool declines via `reject`; an `ignore` is inert here.
            ReviewDecision::Ignore => Ok(HandlerOutcome::empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proto::EditedAction;
    use serde_json::json;
    use tools::ScheduleMeetingTool;

    fn call() -> ToolCall {
        ToolCall::new(
            "2",
            "schedule_meeting",
            json!({
                "attendees": ["alice@corp.com", "bob@corp.com"],
                "subject": "Roadmap Discussion",
                "duration_minutes": 30,
                "preferred_day": "2025-01-10",
                "start_time": 1400
            }),
        )
    }

    fn registry() -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        registry.register(ScheduleMeetingTool);
        registry
    }

    fn state_with_call(call: &ToolCall) -> ConversationState {
        let mut state = ConversationState::new();
        state.push(AgentMessage::assistant_tool_calls(vec![call.clone()]));
        state
    }

    #[test]
    fn payload_summarizes_title_and_attendee_count() {
        let payload =
            ScheduleMeetingReview.build_payload(&call(), &ConversationState::new(), None);
        assert_eq!(payload.action_request.action, "schedule_meeting");
        assert!(payload.description.contains("'Roadmap Discussion'"));
        assert!(payload.description.contains("2 attendees"));
        assert!(payload.config.allow_edit);
        assert!(payload.config.allow_accept);
    }

    #[tokio::test]
    async fn edit_produces_corrected_message_then_result() {
        let call = call();
        let mut new_args = call.arguments.clone();
        new_args["duration_minutes"] = json!(45);

        let decision = ReviewDecision::Edit {
            args: EditedAction {
                args: new_args.clone(),
            },
        };
        let outcome = ScheduleMeetingReview
            .process(&decision, &call, &state_with_call(&call), &registry())
            .await
            .expect("process");

        assert_eq!(outcome.messages.len(), 2);
        let corrected = &outcome.messages[0];
        let calls = corrected.tool_calls.as_ref().expect("calls");
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].id, "2");
        assert_eq!(calls[0].arguments["duration_minutes"], 45);

        let result = &outcome.messages[1];
        assert_eq!(result.tool_call_id.as_deref(), Some("2"));
        assert!(result.content.contains("45 minutes"));
    }

    #[tokio::test]
    async fn reject_produces_fixed_notice_without_invoking_tool() {
        let call = call();
        let outcome = ScheduleMeetingReview
            .process(
                &ReviewDecision::Reject,
                &call,
                &state_with_call(&call),
                &ToolRegistry::new(),
            )
            .await
            .expect("process");
        assert_eq!(outcome.messages.len(), 1);
        assert!(
            outcome.messages[0]
                .content
                .contains("User ignored this calendar meeting draft")
        );
    }

    #[tokio::test]
    async fn accept_reflects_original_arguments() {
        let call = call();
        let outcome = ScheduleMeetingReview
            .process(
                &ReviewDecision::Accept,
                &call,
                &state_with_call(&call),
                &registry(),
            )
            .await
            .expect("process");
        assert_eq!(outcome.messages.len(), 1);
        assert!(outcome.messages[0].content.contains("30 minutes"));
        assert!(outcome.messages[0].content.contains("2 attendees"));
    }

    #[tokio::test]
    async fn ignore_is_inert_for_this_tool() {
        let call = call();
        let outcome = ScheduleMeetingReview
            .process(
                &ReviewDecision::Ignore,
                &call,
                &state_with_call(&call),
                &ToolRegistry::new(),
            )
            .await
            .expect("process");
        assert!(outcome.messages.is_empty());
    }
}
