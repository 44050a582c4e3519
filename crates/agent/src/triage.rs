//! Triage stage: classify the inbound email and handle the notify
//! interrupt.

use proto::{
    ActionRequest, AgentMessage, ApprovalRequest, EmailInput, Error, LlmError,
    ReviewCapabilities, ReviewDecision, ReviewError, ReviewHandler, Role, parse_decision,
};
use serde::Deserialize;
use tracing::info;

use crate::llm::{ChatMessage, ChatRequest, ChatResponse, LlmProvider};
use crate::prompts;
use crate::state::Classification;

/// Structured output of the triage router.
#[derive(Debug, Deserialize)]
pub struct TriageVerdict {
    /// Step-by-step reasoning behind the classification.
    pub reasoning: String,
    /// How the email should be handled.
    pub classification: Classification,
}

/// Parses the router model's text output into a verdict.
///
/// Tolerates a fenced ```json block around the object; anything that does
/// not parse into a known classification is an invalid response.
pub fn parse_verdict(text: &str) -> Result<TriageVerdict, LlmError> {
    let trimmed = text.trim();
    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .map(|s| s.strip_suffix("```").unwrap_or(s))
        .unwrap_or(trimmed)
        .trim();
    serde_json::from_str(body)
        .map_err(|e| LlmError::InvalidResponse(format!("triage verdict: {e}")))
}

/// Runs the triage router over the inbound email.
pub async fn classify(
    llm: &dyn LlmProvider,
    model: &str,
    email: &EmailInput,
) -> Result<TriageVerdict, Error> {
    let request = ChatRequest {
        messages: vec![
            ChatMessage::system(prompts::TRIAGE_SYSTEM_PROMPT),
            ChatMessage::user(prompts::triage_user_prompt(email)),
        ],
        tools: Vec::new(),
        model: model.to_string(),
    };

    let response = llm.chat(request).await.map_err(Error::Llm)?;
    let text = match response {
        ChatResponse::Text(text, _usage) => text,
        ChatResponse::ToolCalls(..) => {
            return Err(LlmError::InvalidResponse(
                "triage router returned tool calls instead of a verdict".into(),
            )
            .into());
        }
    };

    let verdict = parse_verdict(&text)?;
    info!(
        classification = ?verdict.classification,
        "Triage verdict"
    );
    Ok(verdict)
}

/// Result of the notify interrupt: whether to proceed to the response
/// agent, plus the messages to fold into state either way.
#[derive(Debug)]
pub struct NotifyOutcome {
    /// True when the reviewer asked for a reply.
    pub proceed: bool,
    /// Messages to append to conversation state.
    pub messages: Vec<AgentMessage>,
}

/// Surfaces a `notify`-classified email to the reviewer.
///
/// A `response` decision routes to the response agent with the feedback
/// folded into a user message; an `ignore` decision ends the run. Any
/// other decision kind is an invalid reply here — the notify surface only
/// offers those two.
pub async fn notify_interrupt(
    email: &EmailInput,
    classification: Classification,
    reviewer: &dyn ReviewHandler,
) -> Result<NotifyOutcome, Error> {
    let email_markdown = email.format_markdown();
    let mut messages = vec![AgentMessage::new(
        Role::User,
        format!("Email to notify user about: {email_markdown}"),
    )];

    let request = ApprovalRequest {
        action_request: ActionRequest {
            action: format!("Email Assistant: {}", classification_label(classification)),
            args: serde_json::json!({}),
        },
        config: ReviewCapabilities {
            allow_ignore: true,
            allow_respond: true,
            allow_edit: false,
            allow_accept: false,
        },
        description: email_markdown,
    };

    let raw_reply = reviewer.request_review(vec![request]).await?;
    let decision = parse_decision(raw_reply)?;

    match decision {
        ReviewDecision::Response { args } => {
            messages.push(AgentMessage::new(
                Role::User,
                format!("User wants to reply to the email. Use this feedback to respond: {args}"),
            ));
            Ok(NotifyOutcome {
                proceed: true,
                messages,
            })
        }
        ReviewDecision::Ignore => Ok(NotifyOutcome {
            proceed: false,
            messages,
        }),
        other => Err(ReviewError::InvalidDecision(format!(
            "notify interrupt cannot resolve a '{}' decision",
            other.kind()
        ))
        .into()),
    }
}

fn classification_label(classification: Classification) -> &'static str {
    match classification {
        Classification::Ignore => "ignore",
        Classification::Respond => "respond",
        Classification::Notify => "notify",
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::{Value, json};

    use super::*;

    #[test]
    fn parse_verdict_accepts_bare_json() {
        let verdict = parse_verdict(
            r#"{"reasoning": "newsletter blast", "classification": "ignore"}"#,
        )
        .expect("verdict");
        assert_eq!(verdict.classification, Classification::Ignore);
        assert!(verdict.reasoning.contains("newsletter"));
    }

    #[test]
    fn parse_verdict_accepts_fenced_json() {
        let text = "```json\n{\"reasoning\": \"direct question\", \
                    \"classification\": \"respond\"}\n```";
        let verdict = parse_verdict(text).expect("verdict");
        assert_eq!(verdict.classification, Classification::Respond);
    }

    #[test]
    fn parse_verdict_rejects_unknown_classification() {
        let err = parse_verdict(r#"{"reasoning": "?", "classification": "escalate"}"#)
            .expect_err("unknown classification");
        assert!(matches!(err, LlmError::InvalidResponse(_)));
    }

    struct OneShotReviewer {
        reply: Mutex<Option<Value>>,
    }

    #[async_trait]
    impl ReviewHandler for OneShotReviewer {
        async fn request_review(
            &self,
            _requests: Vec<proto::ApprovalRequest>,
        ) -> Result<Value, ReviewError> {
            self.reply
                .lock()
                .expect("reply lock")
                .take()
                .ok_or_else(|| ReviewError::Unavailable("already replied".into()))
        }
    }

    fn email() -> EmailInput {
        EmailInput {
            author: "alice@corp.com".to_string(),
            to: "assistant@corp.com".to_string(),
            subject: "Budget numbers".to_string(),
            email_thread: "FYI, budget is final.".to_string(),
        }
    }

    #[tokio::test]
    async fn notify_response_routes_to_response_agent_with_feedback() {
        let reviewer = OneShotReviewer {
            reply: Mutex::new(Some(json!([{"type":"response","args":"Thank them briefly"}]))),
        };
        let outcome = notify_interrupt(&email(), Classification::Notify, &reviewer)
            .await
            .expect("notify");

        assert!(outcome.proceed);
        assert_eq!(outcome.messages.len(), 2);
        assert!(outcome.messages[0].content.contains("Email to notify user about"));
        assert!(outcome.messages[1].content.contains("Thank them briefly"));
    }

    #[tokio::test]
    async fn notify_ignore_ends_the_run() {
        let reviewer = OneShotReviewer {
            reply: Mutex::new(Some(json!({"type":"ignore"}))),
        };
        let outcome = notify_interrupt(&email(), Classification::Notify, &reviewer)
            .await
            .expect("notify");

        assert!(!outcome.proceed);
        assert_eq!(outcome.messages.len(), 1);
    }

    #[tokio::test]
    async fn notify_rejects_inapplicable_decision_kinds() {
        let reviewer = OneShotReviewer {
            reply: Mutex::new(Some(json!({"type":"accept"}))),
        };
        let err = notify_interrupt(&email(), Classification::Notify, &reviewer)
            .await
            .expect_err("accept is not valid here");
        assert!(err.to_string().contains("accept"));
    }
}
