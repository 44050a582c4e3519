//! Interrupt middleware core.
//!
//! Sits between "model produced a turn" and "tools execute": every tool
//! call in the latest assistant message is either executed directly or
//! routed through the suspend/approve/resume protocol, and all resulting
//! messages are merged back into conversation state as one update.

mod edit;
mod middleware;
mod policy;
mod question;
mod schedule_meeting;
mod write_email;

pub use edit::handle_tool_edit;
pub use middleware::{DecisionRecord, InterruptMiddleware, TurnOutcome};
pub use policy::{HandlerOutcome, ReviewPolicy, StateExtractor, ToolReviewConfigs};
pub use question::QuestionReview;
pub use schedule_meeting::ScheduleMeetingReview;
pub use write_email::WriteEmailReview;
