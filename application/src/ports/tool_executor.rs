//! Tool Executor port
//!
//! Defines the uniform dispatch contract for internal and external tools.

use async_trait::async_trait;
use std::collections::HashMap;
use steward_domain::tool::{
    entities::{ToolCall, ToolSpec},
    value_objects::ToolResult,
};

/// Port for tool execution
///
/// `execute` never fails: unknown tools, handler errors and backend failures
/// all come back as unsuccessful [`ToolResult`]s.
#[async_trait]
pub trait ToolExecutorPort: Send + Sync {
    /// Get the catalogue of all available tools
    fn tool_spec(&self) -> &ToolSpec;

    /// Check if a tool is available
    fn has_tool(&self, name: &str) -> bool {
        self.tool_spec().contains(name)
    }

    /// Execute a tool call
    async fn execute(&self, call: &ToolCall) -> ToolResult;

    /// `execute(name, args) -> text`, with failures rendered as text
    async fn execute_text(&self, name: &str, arguments: HashMap<String, serde_json::Value>) -> String {
        let call = ToolCall::new(name).with_arguments(arguments);
        self.execute(&call).await.into_text()
    }
}
