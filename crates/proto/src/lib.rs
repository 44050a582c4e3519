//! Shared protocol types for the email assistant workspace.
//!
//! This crate defines the serializable message/tool/review structures and
//! strongly-typed error enums shared by the agent runtime, the tools, and
//! the CLI review surface.

pub mod email;
pub mod error;
pub mod message;
pub mod review;
pub mod tool;

/// Re-export of all protocol error types.
pub use error::*;
/// Re-export of the email input document.
pub use email::EmailInput;
/// Re-export of conversation message types.
pub use message::{AgentMessage, Role};
/// Re-export of the review (approval) protocol types.
pub use review::{
    ActionRequest, ApprovalRequest, AutoApproveHandler, EditedAction, ReviewCapabilities,
    ReviewDecision, ReviewHandler, parse_decision,
};
/// Re-export of tool call definition and result types.
pub use tool::{ToolCall, ToolDefinition, ToolResult};
