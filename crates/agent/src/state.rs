//! Conversation state and the identifier-keyed message reducer.

use proto::{AgentMessage, EmailInput};
use serde::{Deserialize, Serialize};

/// Triage classification of the inbound email.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    /// Irrelevant; no action required.
    Ignore,
    /// Needs a reply from the assistant.
    Respond,
    /// Important information the user should see, but no reply needed.
    Notify,
}

/// A batch of messages produced by one middleware pass, to be merged into
/// conversation state by [`ConversationState::apply`].
#[derive(Debug, Clone, Default)]
pub struct StateUpdate {
    /// Messages in the order the originating calls were processed.
    pub messages: Vec<AgentMessage>,
}

impl StateUpdate {
    /// Whether the update carries no messages.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Ordered conversation state for one assistant run.
#[derive(Debug, Clone, Default)]
pub struct ConversationState {
    /// The raw email being handled, when known.
    pub email_input: Option<EmailInput>,
    /// Triage outcome, once the router has run.
    pub classification: Option<Classification>,
    /// Ordered message sequence.
    pub messages: Vec<AgentMessage>,
}

impl ConversationState {
    /// Creates empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates state seeded with the inbound email.
    pub fn with_email(email: EmailInput) -> Self {
        Self {
            email_input: Some(email),
            classification: None,
            messages: Vec::new(),
        }
    }

    /// Returns the most recent message, if any.
    pub fn last_message(&self) -> Option<&AgentMessage> {
        self.messages.last()
    }

    /// Appends a single message.
    pub fn push(&mut self, message: AgentMessage) {
        self.messages.push(message);
    }

    /// Merges an update into the state, keyed by message identity:
    /// a message whose id matches an existing one overwrites it in place;
    /// otherwise it appends.
    ///
    /// The edit-rewrite path depends on the overwrite half — a corrected
    /// assistant message reuses its original id so it replaces the turn
    /// instead of duplicating it.
    pub fn apply(&mut self, update: StateUpdate) {
        for incoming in update.messages {
            match self.messages.iter_mut().find(|m| m.id == incoming.id) {
                Some(existing) => *existing = incoming,
                None => self.messages.push(incoming),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proto::{Role, ToolCall};

    #[test]
    fn classification_serde_uses_lowercase() {
        let parsed: Classification = serde_json::from_str("\"respond\"").expect("parse");
        assert_eq!(parsed, Classification::Respond);
        assert_eq!(
            serde_json::to_string(&Classification::Notify).expect("serialize"),
            "\"notify\""
        );
    }

    #[test]
    fn apply_appends_new_ids() {
        let mut state = ConversationState::new();
        state.push(AgentMessage::new(Role::User, "hello"));

        state.apply(StateUpdate {
            messages: vec![AgentMessage::tool_result("c1", "write_email", "sent")],
        });

        assert_eq!(state.messages.len(), 2);
        assert_eq!(state.messages[1].content, "sent");
    }

    #[test]
    fn apply_overwrites_matching_id_in_place() {
        let original = AgentMessage::assistant_tool_calls(vec![ToolCall::new(
            "c1",
            "write_email",
            serde_json::json!({"to":"a@b.com"}),
        )]);
        let mut state = ConversationState::new();
        state.push(AgentMessage::new(Role::User, "hello"));
        state.push(original.clone());

        let corrected = original.with_tool_calls(vec![ToolCall::new(
            "c1",
            "write_email",
            serde_json::json!({"to":"c@d.com"}),
        )]);
        state.apply(StateUpdate {
            messages: vec![corrected],
        });

        // Replaced in place, not appended; order preserved.
        assert_eq!(state.messages.len(), 2);
        assert_eq!(state.messages[1].id, original.id);
        assert_eq!(
            state.messages[1].tool_calls.as_ref().expect("calls")[0].arguments["to"],
            "c@d.com"
        );
    }

    #[test]
    fn with_email_seeds_input() {
        let email = EmailInput {
            author: "a@b.com".to_string(),
            to: "c@d.com".to_string(),
            subject: "Hi".to_string(),
            email_thread: "Hello".to_string(),
        };
        let state = ConversationState::with_email(email.clone());
        assert_eq!(state.email_input, Some(email));
        assert!(state.classification.is_none());
        assert!(state.last_message().is_none());
    }
}
