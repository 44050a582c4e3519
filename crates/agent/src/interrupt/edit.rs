//! Shared edit-rewrite helper used by the response processors.

use proto::{AgentMessage, Error, ReviewError, ToolCall};

use crate::registry::ToolRegistry;
use crate::state::ConversationState;

/// Applies an approved edit to the most recent assistant message and
/// executes the tool with the corrected arguments.
///
/// Returns exactly two messages, in order:
/// 1. a copy of the assistant message that emitted `call`, carrying the
///    **same message id** but a tool-call list where `call` is replaced by
///    one with the same call id and `edited_args` (all other calls kept,
///    relative order preserved);
/// 2. the tool-result message for the execution, tagged with the original
///    call id.
///
/// The original message is never mutated; the identifier-keyed reducer
/// reconciles the copy against it.
pub async fn handle_tool_edit(
    call: &ToolCall,
    edited_args: &serde_json::Value,
    state: &ConversationState,
    tools: &ToolRegistry,
    tool_name: &str,
) -> Result<Vec<AgentMessage>, Error> {
    let last = state.last_message().ok_or_else(|| {
        ReviewError::InvalidDecision("edit received with no assistant message to rewrite".into())
    })?;

    let mut updated_calls: Vec<ToolCall> = last
        .tool_calls
        .clone()
        .unwrap_or_default()
        .into_iter()
        .filter(|tc| tc.id != call.id)
        .collect();
    updated_calls.push(ToolCall::new(
        call.id.clone(),
        call.name.clone(),
        edited_args.clone(),
    ));

    let corrected = last.with_tool_calls(updated_calls);

    let observation = tools
        .execute(&call.id, tool_name, edited_args.clone())
        .await?;

    Ok(vec![
        corrected,
        AgentMessage::tool_result(&call.id, tool_name, observation.output),
    ])
}
