//! The interrupt middleware orchestrator.

use std::sync::Arc;

use proto::{AgentMessage, Error, ReviewHandler, parse_decision};
use tracing::{debug, info};

use super::policy::{StateExtractor, ToolReviewConfigs};
use crate::registry::ToolRegistry;
use crate::state::{ConversationState, StateUpdate};

/// One processed reviewer decision, kept for observability.
#[derive(Debug, Clone)]
pub struct DecisionRecord {
    /// Id of the tool call the decision resolved.
    pub call_id: String,
    /// Wire label of the decision kind.
    pub decision: String,
    /// How many messages the handler produced for it.
    pub message_count: usize,
}

/// Result of one `after_model` pass.
///
/// The decision log travels with the update instead of accumulating as
/// hidden middleware state; callers own the running log for the lifetime
/// of a run.
#[derive(Debug, Default)]
pub struct TurnOutcome {
    /// Messages to merge into conversation state, or `None` for a no-op.
    pub update: Option<StateUpdate>,
    /// Decisions processed during this pass, in call order.
    pub decisions: Vec<DecisionRecord>,
}

impl TurnOutcome {
    fn noop() -> Self {
        Self::default()
    }
}

/// Post-processes every model turn before tools execute, converting tool
/// calls that require approval into suspend points.
///
/// Tool calls in the latest assistant message are processed strictly in
/// the order the model emitted them; each interrupt is fully resolved
/// (messages collected) before the next call's interrupt is raised.
pub struct InterruptMiddleware {
    configs: ToolReviewConfigs,
    tools: Arc<ToolRegistry>,
    state_extractor: Option<Box<StateExtractor>>,
}

impl InterruptMiddleware {
    /// Creates a middleware over a fixed review registry and the live
    /// tool registry.
    pub fn new(configs: ToolReviewConfigs, tools: Arc<ToolRegistry>) -> Self {
        Self {
            configs,
            tools,
            state_extractor: None,
        }
    }

    /// Installs the optional state extractor passed to payload builders.
    pub fn with_state_extractor(
        mut self,
        extractor: impl Fn(&ConversationState) -> String + Send + Sync + 'static,
    ) -> Self {
        self.state_extractor = Some(Box::new(extractor));
        self
    }

    /// Whether this middleware claims the given tool name (for review or
    /// direct execution). Unclaimed calls are left to the downstream
    /// execution path.
    pub fn claims(&self, tool_name: &str) -> bool {
        self.configs.contains(tool_name)
    }

    /// Processes the tool calls of the last message in `state`.
    ///
    /// Returns a no-op outcome when the state has no messages or the last
    /// message carries no tool calls. Otherwise, per call in emitted
    /// order: unclaimed names are skipped; a `None` registration executes
    /// the tool immediately; a policy registration builds the approval
    /// payload, suspends on the reviewer, parses the decision (loudly
    /// failing on unrecognized kinds), and dispatches it to the policy.
    pub async fn after_model(
        &self,
        state: &ConversationState,
        reviewer: &dyn ReviewHandler,
    ) -> Result<TurnOutcome, Error> {
        let Some(last_message) = state.last_message() else {
            return Ok(TurnOutcome::noop());
        };
        let calls = match &last_message.tool_calls {
            Some(calls) if !calls.is_empty() => calls.clone(),
            _ => return Ok(TurnOutcome::noop()),
        };

        let mut result_messages: Vec<AgentMessage> = Vec::new();
        let mut decisions: Vec<DecisionRecord> = Vec::new();

        for call in &calls {
            let Some(config) = self.configs.get(&call.name) else {
                // Not ours; the normal tool-execution path downstream owns it.
                continue;
            };

            match config {
                None => {
                    debug!(tool = %call.name, call_id = %call.id, "Direct-executing tool");
                    let observation = self
                        .tools
                        .execute(&call.id, &call.name, call.arguments.clone())
                        .await?;
                    result_messages.push(AgentMessage::tool_result(
                        &call.id,
                        &call.name,
                        observation.output,
                    ));
                }
                Some(policy) => {
                    let payload =
                        policy.build_payload(call, state, self.state_extractor.as_deref());
                    info!(tool = %call.name, call_id = %call.id, "Suspending for review");

                    let raw_reply = reviewer.request_review(vec![payload]).await?;
                    let decision = parse_decision(raw_reply)?;
                    debug!(call_id = %call.id, decision = decision.kind(), "Review resolved");

                    let outcome = policy.process(&decision, call, state, &self.tools).await?;
                    decisions.push(DecisionRecord {
                        call_id: call.id.clone(),
                        decision: decision.kind().to_string(),
                        message_count: outcome.messages.len(),
                    });
                    result_messages.extend(outcome.messages);
                }
            }
        }

        let update = if result_messages.is_empty() {
            None
        } else {
            Some(StateUpdate {
                messages: result_messages,
            })
        };
        Ok(TurnOutcome { update, decisions })
    }
}
