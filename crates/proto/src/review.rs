//! Human review (approval) protocol shared by the middleware and the
//! review surfaces.
//!
//! The middleware surfaces a one-element list of [`ApprovalRequest`]s per
//! suspension and expects the reviewer's decision back as a single
//! document, or a one-element list wrapping it — some review surfaces
//! always respond with a list, so [`parse_decision`] accommodates both.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ReviewError;

/// The pending action echoed back to the reviewer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRequest {
    /// Name of the tool whose call is awaiting review.
    pub action: String,
    /// The call's full argument mapping.
    pub args: Value,
}

/// Advisory flags telling the review surface which decision kinds are
/// legal for a given tool.
///
/// The flags are declarative: handlers still defensively handle every
/// decision kind regardless of what was advertised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewCapabilities {
    pub allow_ignore: bool,
    pub allow_respond: bool,
    pub allow_edit: bool,
    pub allow_accept: bool,
}

/// A structured approval request describing one pending tool call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApprovalRequest {
    /// The pending action and its arguments.
    pub action_request: ActionRequest,
    /// Which decision kinds the review surface should offer.
    pub config: ReviewCapabilities,
    /// Human-readable summary of the pending action.
    pub description: String,
}

/// Replacement arguments carried by an `edit` decision.
///
/// The extra nesting level (`args.args` on the wire) matches the external
/// reviewer surface's schema and is intentional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditedAction {
    /// The full replacement argument mapping.
    pub args: Value,
}

/// The reviewer's resolution of a suspended tool call.
///
/// Wire shape: `{"type": "<kind>", "args": ...}`. `edit` nests its
/// replacement arguments one level deeper than `response`'s flat
/// free-text `args`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReviewDecision {
    /// Execute the tool with its original arguments.
    Accept,
    /// Do not execute; terminate this branch of the workflow.
    Reject,
    /// Do not execute; terminate this branch of the workflow.
    /// (`write_email` advertises this label instead of `reject`.)
    Ignore,
    /// Execute the tool with the replacement arguments.
    Edit { args: EditedAction },
    /// Free-text feedback for the agent to incorporate in a later turn.
    Response { args: String },
}

impl ReviewDecision {
    /// Canonical wire label for this decision kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ReviewDecision::Accept => "accept",
            ReviewDecision::Reject => "reject",
            ReviewDecision::Ignore => "ignore",
            ReviewDecision::Edit { .. } => "edit",
            ReviewDecision::Response { .. } => "response",
        }
    }
}

/// Parses a raw reviewer reply into a [`ReviewDecision`].
///
/// Accepts either the decision document itself or a one-element list
/// wrapping it. Unknown decision kinds and malformed payloads fail with
/// [`ReviewError::InvalidDecision`] rather than being silently dropped.
pub fn parse_decision(raw: Value) -> Result<ReviewDecision, ReviewError> {
    let doc = match raw {
        Value::Array(mut items) if items.len() == 1 => items.remove(0),
        Value::Array(items) => {
            return Err(ReviewError::InvalidDecision(format!(
                "expected a single decision, got a list of {}",
                items.len()
            )));
        }
        other => other,
    };
    serde_json::from_value(doc).map_err(|err| ReviewError::InvalidDecision(err.to_string()))
}

/// Handler for review requests.
///
/// The agent suspends on [`request_review`](Self::request_review) until the
/// external reviewer resolves the request; interactive surfaces bridge this
/// to their event loop with channels. The reply is returned raw so the
/// middleware owns decision parsing (and its failure mode).
#[async_trait]
pub trait ReviewHandler: Send + Sync {
    /// Surface the approval requests and wait for the reviewer's reply.
    async fn request_review(&self, requests: Vec<ApprovalRequest>) -> Result<Value, ReviewError>;
}

/// Review handler that accepts every request without asking.
///
/// Used when no interactive reviewer is configured (e.g. `--auto` runs
/// and tests).
pub struct AutoApproveHandler;

#[async_trait]
impl ReviewHandler for AutoApproveHandler {
    async fn request_review(&self, _requests: Vec<ApprovalRequest>) -> Result<Value, ReviewError> {
        Ok(serde_json::json!({"type": "accept"}))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decision_wire_shapes_round_trip() {
        let accept: ReviewDecision = serde_json::from_value(json!({"type":"accept"})).expect("accept");
        assert_eq!(accept, ReviewDecision::Accept);
        assert_eq!(accept.kind(), "accept");

        let respond: ReviewDecision =
            serde_json::from_value(json!({"type":"response","args":"Next Tuesday"}))
                .expect("response");
        assert_eq!(
            respond,
            ReviewDecision::Response {
                args: "Next Tuesday".to_string()
            }
        );
    }

    #[test]
    fn edit_decision_nests_args_one_level_deeper() {
        let decision: ReviewDecision = serde_json::from_value(json!({
            "type": "edit",
            "args": {"args": {"duration_minutes": 45}}
        }))
        .expect("edit");

        let ReviewDecision::Edit { args } = decision else {
            panic!("expected edit decision");
        };
        assert_eq!(args.args["duration_minutes"], 45);

        // And the serialized form keeps the nesting.
        let wire = serde_json::to_value(ReviewDecision::Edit {
            args: EditedAction {
                args: json!({"to": "c@d.com"}),
            },
        })
        .expect("serialize");
        assert_eq!(wire["args"]["args"]["to"], "c@d.com");
    }

    #[test]
    fn parse_decision_unwraps_one_element_list() {
        let decision = parse_decision(json!([{"type":"ignore"}])).expect("list reply");
        assert_eq!(decision, ReviewDecision::Ignore);

        let decision = parse_decision(json!({"type":"reject"})).expect("bare reply");
        assert_eq!(decision, ReviewDecision::Reject);
    }

    #[test]
    fn parse_decision_rejects_unknown_kind() {
        let err = parse_decision(json!({"type":"defer"})).expect_err("unknown kind");
        match err {
            ReviewError::InvalidDecision(msg) => assert!(msg.contains("defer")),
            other => panic!("unexpected error variant: {other}"),
        }
    }

    #[test]
    fn parse_decision_rejects_multi_element_list() {
        let err =
            parse_decision(json!([{"type":"accept"},{"type":"reject"}])).expect_err("two replies");
        assert!(err.to_string().contains("list of 2"));
    }

    #[test]
    fn approval_request_serializes_flags() {
        let request = ApprovalRequest {
            action_request: ActionRequest {
                action: "write_email".to_string(),
                args: json!({"to":"a@b.com"}),
            },
            config: ReviewCapabilities {
                allow_ignore: true,
                allow_respond: true,
                allow_edit: true,
                allow_accept: true,
            },
            description: "Email to a@b.com pending approval".to_string(),
        };
        let wire = serde_json::to_value(&request).expect("serialize");
        assert_eq!(wire["action_request"]["action"], "write_email");
        assert_eq!(wire["config"]["allow_edit"], true);
    }

    #[tokio::test]
    async fn auto_approve_handler_accepts() {
        let raw = AutoApproveHandler
            .request_review(Vec::new())
            .await
            .expect("reply");
        let decision = parse_decision(raw).expect("decision");
        assert_eq!(decision, ReviewDecision::Accept);
    }
}
