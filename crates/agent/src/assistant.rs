//! The email assistant run loop: triage, the notify interrupt, and the
//! tool-calling response agent with the interrupt middleware spliced in.

use std::sync::Arc;

use proto::{AgentMessage, EmailInput, Error, LlmError, ReviewHandler, Role};
use tracing::{debug, info};

use crate::interrupt::{InterruptMiddleware, ToolReviewConfigs};
use crate::llm::{ChatMessage, ChatRequest, ChatResponse, LlmProvider};
use crate::prompts;
use crate::registry::ToolRegistry;
use crate::state::{Classification, ConversationState};
use crate::triage;

/// Orchestrates one email through triage and the response agent.
///
/// One assistant instance per configuration; each [`run`](Self::run) owns
/// its own conversation state, so instances can be reused across
/// sequential emails.
pub struct EmailAssistant {
    llm: Arc<dyn LlmProvider>,
    tools: Arc<ToolRegistry>,
    middleware: InterruptMiddleware,
    reviewer: Arc<dyn ReviewHandler>,
    model: String,
    max_model_calls: usize,
}

impl EmailAssistant {
    /// Wires an assistant from its collaborators.
    ///
    /// The review registry is fixed here; the middleware's state
    /// extractor injects the original email into approval descriptions.
    pub fn new(
        llm: Arc<dyn LlmProvider>,
        tools: Arc<ToolRegistry>,
        review_configs: ToolReviewConfigs,
        reviewer: Arc<dyn ReviewHandler>,
        model: impl Into<String>,
        max_model_calls: usize,
    ) -> Self {
        let middleware = InterruptMiddleware::new(review_configs, Arc::clone(&tools))
            .with_state_extractor(|state: &ConversationState| {
                state
                    .email_input
                    .as_ref()
                    .map(EmailInput::context_block)
                    .unwrap_or_default()
            });
        Self {
            llm,
            tools,
            middleware,
            reviewer,
            model: model.into(),
            max_model_calls,
        }
    }

    /// Handles one inbound email end to end and returns the final
    /// conversation state.
    pub async fn run(&self, email: EmailInput) -> Result<ConversationState, Error> {
        let mut state = ConversationState::with_email(email.clone());

        let verdict = triage::classify(self.llm.as_ref(), &self.model, &email).await?;
        state.classification = Some(verdict.classification);

        match verdict.classification {
            Classification::Ignore => {
                info!("Triage: ignore — ending run");
                return Ok(state);
            }
            Classification::Respond => {
                info!("Triage: respond — starting response agent");
                state.push(AgentMessage::new(
                    Role::User,
                    format!("Respond to the email: {}", email.format_markdown()),
                ));
            }
            Classification::Notify => {
                info!("Triage: notify — surfacing to reviewer");
                let outcome = triage::notify_interrupt(
                    &email,
                    verdict.classification,
                    self.reviewer.as_ref(),
                )
                .await?;
                for message in outcome.messages {
                    state.push(message);
                }
                if !outcome.proceed {
                    return Ok(state);
                }
            }
        }

        self.respond(&mut state).await?;
        Ok(state)
    }

    /// The response loop: model turn, interrupt middleware, then normal
    /// execution for calls the middleware did not claim.
    async fn respond(&self, state: &mut ConversationState) -> Result<(), Error> {
        let tool_defs = self.tools.definitions();
        let mut round = 0;

        loop {
            if round >= self.max_model_calls {
                return Err(LlmError::MaxModelCallsExceeded.into());
            }

            let request = ChatRequest {
                messages: build_chat_messages(prompts::AGENT_SYSTEM_PROMPT, state),
                tools: tool_defs.clone(),
                model: self.model.clone(),
            };
            debug!(round, "Response agent model call");
            let response = self.llm.chat(request).await.map_err(Error::Llm)?;

            match response {
                ChatResponse::Text(text, _usage) => {
                    state.push(AgentMessage::new(Role::Assistant, text));
                    return Ok(());
                }
                ChatResponse::ToolCalls(calls, _usage) => {
                    state.push(AgentMessage::assistant_tool_calls(calls.clone()));

                    let outcome = self
                        .middleware
                        .after_model(state, self.reviewer.as_ref())
                        .await?;
                    for record in &outcome.decisions {
                        debug!(
                            call_id = %record.call_id,
                            decision = %record.decision,
                            messages = record.message_count,
                            "Review decision applied"
                        );
                    }
                    if let Some(update) = outcome.update {
                        state.apply(update);
                    }

                    // Calls the middleware does not claim run through the
                    // normal execution path.
                    for call in &calls {
                        if self.middleware.claims(&call.name) {
                            continue;
                        }
                        let result = self
                            .tools
                            .execute(&call.id, &call.name, call.arguments.clone())
                            .await?;
                        state.push(AgentMessage::tool_result(
                            &call.id,
                            &call.name,
                            result.output,
                        ));
                    }
                }
            }

            round += 1;
        }
    }
}

/// Converts conversation state into model input messages with the system
/// prompt first.
fn build_chat_messages(system_prompt: &str, state: &ConversationState) -> Vec<ChatMessage> {
    let mut messages = vec![ChatMessage::system(system_prompt)];
    for msg in &state.messages {
        match msg.role {
            Role::User => messages.push(ChatMessage::user(&msg.content)),
            Role::Assistant => {
                let mut assistant = ChatMessage::assistant(&msg.content);
                assistant.tool_calls = msg.tool_calls.clone();
                messages.push(assistant);
            }
            Role::Tool => messages.push(ChatMessage::tool_result(
                msg.tool_call_id.as_deref().unwrap_or(""),
                msg.tool_name.as_deref().unwrap_or(""),
                &msg.content,
            )),
            Role::System => {}
        }
    }
    messages
}
