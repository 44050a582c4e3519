//! Tool trait and the email-assistant tool implementations.
//!
//! The agent runtime uses this crate to expose the assistant's executable
//! actions: sending email, scheduling meetings, checking calendar
//! availability, and asking the user a clarification question.

pub mod calendar;
pub mod email;
pub mod question;

pub use calendar::{CheckCalendarTool, ScheduleMeetingTool};
pub use email::WriteEmailTool;
pub use question::QuestionTool;

use async_trait::async_trait;
use proto::{ToolError, ToolResult};

/// Trait that all tools must implement
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique tool name exposed to the LLM.
    fn name(&self) -> &str;
    /// Human-readable description for tool selection.
    fn description(&self) -> &str;
    /// JSON schema for accepted tool arguments.
    fn parameters_schema(&self) -> serde_json::Value;
    /// Executes the tool with the given call id and JSON args.
    ///
    /// Invalid arguments and execution failures are errors, not in-band
    /// results; they propagate to the enclosing run.
    async fn execute(&self, call_id: &str, args: serde_json::Value)
    -> Result<ToolResult, ToolError>;
}
