//! Agent runtime: LLM boundary, conversation state, the interrupt
//! middleware core, and the email assistant run loop.

pub mod assistant;
pub mod interrupt;
pub mod llm;
pub mod prompts;
pub mod registry;
pub mod state;
pub mod triage;

/// The assistant run loop.
pub use assistant::EmailAssistant;
/// The interrupt middleware and per-tool review policies.
pub use interrupt::{
    InterruptMiddleware, QuestionReview, ReviewPolicy, ScheduleMeetingReview, ToolReviewConfigs,
    TurnOutcome, WriteEmailReview,
};
/// Chat request/response models and provider interfaces.
pub use llm::{ChatMessage, ChatRequest, ChatResponse, LlmProvider, OpenAiProvider, TokenUsage};
/// Runtime tool registry.
pub use registry::ToolRegistry;
/// Conversation state and the identifier-keyed reducer.
pub use state::{Classification, ConversationState, StateUpdate};
