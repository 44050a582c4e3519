//! Tool registry used by the runtime and the interrupt middleware.

use std::collections::HashMap;
use std::sync::Arc;

use proto::{ToolDefinition, ToolError, ToolResult};
use tools::Tool;
use tracing::debug;

/// Registry of available tools, keyed by tool name.
///
/// A tool name dispatched for execution but absent from the registry is a
/// configuration error: lookup fails with [`ToolError::NotFound`] and the
/// error propagates to the enclosing run instead of being disguised as a
/// tool result.
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Creates an empty tool registry.
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool
    pub fn register(&mut self, tool: impl Tool + 'static) {
        let name = tool.name().to_string();
        debug!("Registering tool: {name}");
        self.tools.insert(name, Arc::new(tool));
    }

    /// Get tool definitions for the LLM
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .values()
            .map(|t| ToolDefinition::new(t.name(), t.description(), t.parameters_schema()))
            .collect()
    }

    /// Looks up a tool by name.
    pub fn get(&self, name: &str) -> Result<&Arc<dyn Tool>, ToolError> {
        self.tools
            .get(name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))
    }

    /// Execute a tool call
    pub async fn execute(
        &self,
        call_id: &str,
        name: &str,
        args: serde_json::Value,
    ) -> Result<ToolResult, ToolError> {
        let tool = self.get(name)?;
        debug!("Executing tool: {name} (call_id: {call_id})");
        tool.execute(call_id, args).await
    }

    /// Returns the list of registered tool names.
    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.keys().map(|s| s.as_str()).collect()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use proto::ToolResult;

    use super::*;

    struct EchoTool;

    #[async_trait]
    impl tools::Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Echoes the input"
        }

        fn parameters_schema(&self) -> serde_json::Value {
            serde_json::json!({
                "type":"object",
                "properties":{"value":{"type":"string"}},
                "required":["value"]
            })
        }

        async fn execute(
            &self,
            call_id: &str,
            args: serde_json::Value,
        ) -> Result<ToolResult, ToolError> {
            let value = args["value"].as_str().unwrap_or_default().to_string();
            Ok(ToolResult::success(call_id, self.name(), value))
        }
    }

    #[tokio::test]
    async fn register_and_execute_known_tool() {
        let mut registry = ToolRegistry::new();
        registry.register(EchoTool);

        let result = registry
            .execute("c1", "echo", serde_json::json!({"value":"hello"}))
            .await
            .expect("execute");
        assert!(!result.is_error);
        assert_eq!(result.output, "hello");
        assert_eq!(result.tool_name, "echo");
    }

    #[tokio::test]
    async fn execute_unknown_tool_is_a_configuration_error() {
        let registry = ToolRegistry::new();
        let err = registry
            .execute("c2", "missing", serde_json::json!({}))
            .await
            .expect_err("unknown tool");
        assert!(matches!(err, ToolError::NotFound(name) if name == "missing"));
    }

    #[test]
    fn definitions_and_names_include_registered_tool() {
        let mut registry = ToolRegistry::new();
        registry.register(EchoTool);

        let names = registry.tool_names();
        assert_eq!(names, vec!["echo"]);

        let defs = registry.definitions();
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].name, "echo");
    }
}
