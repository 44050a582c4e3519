//! Review policy for the clarification `Question` tool.

use async_trait::async_trait;
use proto::{
    ActionRequest, AgentMessage, ApprovalRequest, Error, ReviewCapabilities, ReviewDecision,
    ToolCall,
};

use super::policy::{HandlerOutcome, ReviewPolicy, StateExtractor};
use crate::registry::ToolRegistry;
use crate::state::ConversationState;

const TOOL_NAME: &str = "Question";

/// A clarification question needs an answer from the user; there is
/// nothing to accept or edit.
pub struct QuestionReview;

#[async_trait]
impl ReviewPolicy for QuestionReview {
    fn description(&self) -> &str {
        "Question requires user answer"
    }

    fn build_payload(
        &self,
        call: &ToolCall,
        _state: &ConversationState,
        _extractor: Option<&StateExtractor>,
    ) -> ApprovalRequest {
        let question_text = call
            .arguments
            .get("content")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("Question");

        ApprovalRequest {
            action_request: ActionRequest {
                action: call.name.clone(),
                args: call.arguments.clone(),
            },
            config: ReviewCapabilities {
                allow_ignore: true,
                allow_respond: true,
                allow_edit: false,
                allow_accept: false,
            },
            description: format!("❓ {question_text}"),
        }
    }

    async fn process(
        &self,
        decision: &ReviewDecision,
        call: &ToolCall,
        _state: &ConversationState,
        _tools: &ToolRegistry,
    ) -> Result<HandlerOutcome, Error> {
        match decision {
            ReviewDecision::Reject => Ok(HandlerOutcome::single(AgentMessage::tool_result(
                &call.id,
                TOOL_NAME,
                "User ignored this question. Ignore this email and end the workflow.",
            ))),
            ReviewDecision::Response { args } => {
                Ok(HandlerOutcome::single(AgentMessage::tool_result(
                    &call.id,
                    TOOL_NAME,
                    format!(
                        "User answered the question, which we can use for any follow-up \
                         actions. Answer: {args}"
                    ),
                )))
            }
            // Accept and edit are never advertised for questions; they and
            // the other-label decline stay inert.
            ReviewDecision::Accept | ReviewDecision::Ignore | ReviewDecision::Edit { .. } => {
                Ok(HandlerOutcome::empty())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proto::EditedAction;
    use serde_json::json;

    fn call() -> ToolCall {
        ToolCall::new("3", "Question", json!({"content": "Which date?"}))
    }

    #[test]
    fn payload_carries_question_text_and_restricted_flags() {
        let payload = QuestionReview.build_payload(&call(), &ConversationState::new(), None);
        assert_eq!(payload.action_request.action, "Question");
        assert!(payload.description.contains("Which date?"));
        assert!(payload.config.allow_ignore);
        assert!(payload.config.allow_respond);
        assert!(!payload.config.allow_edit);
        assert!(!payload.config.allow_accept);
    }

    #[tokio::test]
    async fn response_embeds_verbatim_answer() {
        let outcome = QuestionReview
            .process(
                &ReviewDecision::Response {
                    args: "Next Tuesday".to_string(),
                },
                &call(),
                &ConversationState::new(),
                &ToolRegistry::new(),
            )
            .await
            .expect("process");

        assert_eq!(outcome.messages.len(), 1);
        assert_eq!(outcome.messages[0].tool_call_id.as_deref(), Some("3"));
        assert!(outcome.messages[0].content.contains("Next Tuesday"));
    }

    #[tokio::test]
    async fn reject_ends_the_branch_with_fixed_notice() {
        let outcome = QuestionReview
            .process(
                &ReviewDecision::Reject,
                &call(),
                &ConversationState::new(),
                &ToolRegistry::new(),
            )
            .await
            .expect("process");
        assert_eq!(outcome.messages.len(), 1);
        assert!(outcome.messages[0].content.contains("User ignored this question"));
    }

    #[tokio::test]
    async fn inapplicable_kinds_are_inert() {
        for decision in [
            ReviewDecision::Accept,
            ReviewDecision::Ignore,
            ReviewDecision::Edit {
                args: EditedAction { args: json!({}) },
            },
        ] {
            let outcome = QuestionReview
                .process(&decision, &call(), &ConversationState::new(), &ToolRegistry::new())
                .await
                .expect("process");
            assert!(outcome.messages.is_empty(), "{} should be inert", decision.kind());
        }
    }
}
