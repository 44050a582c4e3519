use serde::{Deserialize, Serialize};

/// A tool invocation requested by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Call identifier, unique within the emitting turn.
    pub id: String,
    /// Name of the tool to invoke.
    pub name: String,
    /// JSON argument mapping for the call.
    pub arguments: serde_json::Value,
}

impl ToolCall {
    /// Creates a tool call from id, name, and argument mapping.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        arguments: serde_json::Value,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments,
        }
    }
}

/// Tool schema advertised to the LLM.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique tool name.
    pub name: String,
    /// Human-readable description used for tool selection.
    pub description: String,
    /// JSON schema of accepted arguments.
    pub parameters: serde_json::Value,
}

impl ToolDefinition {
    /// Creates a tool definition.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: serde_json::Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }
}

/// Result of executing a single tool call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// Id of the originating tool call.
    pub tool_call_id: String,
    /// Name of the executed tool.
    pub tool_name: String,
    /// Tool output payload.
    pub output: String,
    /// Whether the output represents an error.
    pub is_error: bool,
}

impl ToolResult {
    /// Creates a successful tool result.
    pub fn success(
        tool_call_id: impl Into<String>,
        tool_name: impl Into<String>,
        output: impl Into<String>,
    ) -> Self {
        Self {
            tool_call_id: tool_call_id.into(),
            tool_name: tool_name.into(),
            output: output.into(),
            is_error: false,
        }
    }

    /// Creates an error tool result.
    pub fn error(
        tool_call_id: impl Into<String>,
        tool_name: impl Into<String>,
        output: impl Into<String>,
    ) -> Self {
        Self {
            tool_call_id: tool_call_id.into(),
            tool_name: tool_name.into(),
            output: output.into(),
            is_error: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_call_new_sets_fields() {
        let call = ToolCall::new("c1", "write_email", serde_json::json!({"to":"a@b.com"}));
        assert_eq!(call.id, "c1");
        assert_eq!(call.name, "write_email");
        assert_eq!(call.arguments["to"], "a@b.com");
    }

    #[test]
    fn tool_result_constructors_set_error_flag() {
        let ok = ToolResult::success("c1", "write_email", "sent");
        assert!(!ok.is_error);
        assert_eq!(ok.tool_call_id, "c1");

        let err = ToolResult::error("c2", "write_email", "boom");
        assert!(err.is_error);
        assert_eq!(err.output, "boom");
    }

    #[test]
    fn tool_call_serializes_round_trip() {
        let call = ToolCall::new("c1", "schedule_meeting", serde_json::json!({"subject":"sync"}));
        let json = serde_json::to_string(&call).expect("serialize");
        let back: ToolCall = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, call);
    }
}
