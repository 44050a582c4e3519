//! Per-tool review policies and their registry.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use proto::{AgentMessage, ApprovalRequest, Error, ReviewDecision, ToolCall};

use crate::registry::ToolRegistry;
use crate::state::ConversationState;

/// Optional callback supplying contextual information (e.g. the original
/// email thread) to payload builders.
pub type StateExtractor = dyn Fn(&ConversationState) -> String + Send + Sync;

/// Messages produced by processing one reviewer decision.
#[derive(Debug, Default)]
pub struct HandlerOutcome {
    /// Messages to merge into conversation state, in order.
    pub messages: Vec<AgentMessage>,
}

impl HandlerOutcome {
    /// An outcome carrying no messages (the inert-decision no-op).
    pub fn empty() -> Self {
        Self::default()
    }

    /// An outcome carrying a single message.
    pub fn single(message: AgentMessage) -> Self {
        Self {
            messages: vec![message],
        }
    }
}

/// A tool's interrupt behavior: how to describe its pending call to the
/// reviewer and how to act on the reviewer's decision.
///
/// One implementation per reviewed tool, registered by name in
/// [`ToolReviewConfigs`]. Builders are pure; processors invoke the real
/// tool on `accept` and `edit`.
#[async_trait]
pub trait ReviewPolicy: Send + Sync {
    /// Short human-readable reason this tool requires review.
    fn description(&self) -> &str;

    /// Builds the approval payload for a pending call.
    ///
    /// Must echo the tool name and full argument mapping, set the
    /// capability flags for this tool, and summarize the pending action.
    /// When `extractor` is supplied it may prepend contextual information;
    /// its absence just omits that context.
    fn build_payload(
        &self,
        call: &ToolCall,
        state: &ConversationState,
        extractor: Option<&StateExtractor>,
    ) -> ApprovalRequest;

    /// Maps the reviewer's decision onto resulting conversation messages,
    /// invoking the real tool on acceptance or edit.
    ///
    /// Handlers see every decision kind regardless of the advertised
    /// capability flags; kinds a tool does not act on yield an empty
    /// outcome.
    async fn process(
        &self,
        decision: &ReviewDecision,
        call: &ToolCall,
        state: &ConversationState,
        tools: &ToolRegistry,
    ) -> Result<HandlerOutcome, Error>;
}

/// Per-tool-name review registration, fixed at middleware construction.
///
/// Three states per tool name:
/// - registered with a policy: the interrupt path applies;
/// - registered as direct-execute (`None`): the middleware executes the
///   tool immediately, no suspension;
/// - absent: the middleware does not claim the tool; it is left for the
///   normal downstream execution path.
#[derive(Default)]
pub struct ToolReviewConfigs {
    configs: HashMap<String, Option<Arc<dyn ReviewPolicy>>>,
}

impl ToolReviewConfigs {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a tool that must suspend for review.
    pub fn require_review(
        mut self,
        tool_name: impl Into<String>,
        policy: Arc<dyn ReviewPolicy>,
    ) -> Self {
        self.configs.insert(tool_name.into(), Some(policy));
        self
    }

    /// Registers a tool for direct execution — the explicit opt-out.
    pub fn direct_execute(mut self, tool_name: impl Into<String>) -> Self {
        self.configs.insert(tool_name.into(), None);
        self
    }

    /// Returns the registration for a tool name, if the middleware
    /// claims it.
    pub fn get(&self, tool_name: &str) -> Option<&Option<Arc<dyn ReviewPolicy>>> {
        self.configs.get(tool_name)
    }

    /// Whether the middleware claims this tool name at all.
    pub fn contains(&self, tool_name: &str) -> bool {
        self.configs.contains_key(tool_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interrupt::WriteEmailReview;

    #[test]
    fn registry_distinguishes_review_direct_and_absent() {
        let configs = ToolReviewConfigs::new()
            .require_review("write_email", Arc::new(WriteEmailReview))
            .direct_execute("check_calendar_availability");

        assert!(matches!(configs.get("write_email"), Some(Some(_))));
        assert!(matches!(
            configs.get("check_calendar_availability"),
            Some(None)
        ));
        assert!(configs.get("unrelated_tool").is_none());
        assert!(configs.contains("check_calendar_availability"));
        assert!(!configs.contains("unrelated_tool"));
    }
}
