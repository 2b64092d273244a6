//! Tool domain value objects, the immutable result and error types
//!
//! Every dispatch produces a [`ToolResult`]. Callers that need the uniform
//! text contract (`execute(name, args) -> string`) use
//! [`ToolResult::into_text`], which renders failures in one fixed format per
//! error code:
//!
//! | Code | Rendered text |
//! |------|---------------|
//! | `NOT_FOUND` | `Error: Tool '<name>' not found.` |
//! | `EXECUTION_FAILED` | `Error executing tool <name>: <detail>` |
//! | `TRANSPORT_FAILED` | `Tool Execution Failed: <detail>` |
//! | any other code | `Error: <detail>` |

use serde::{Deserialize, Serialize};

/// Error that occurred during tool dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolError {
    /// Error code (e.g., "NOT_FOUND", "EXECUTION_FAILED")
    pub code: String,
    /// Human-readable error detail
    pub message: String,
}

impl ToolError {
    pub const NOT_FOUND: &'static str = "NOT_FOUND";
    pub const EXECUTION_FAILED: &'static str = "EXECUTION_FAILED";
    pub const TRANSPORT_FAILED: &'static str = "TRANSPORT_FAILED";

    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    /// The named tool is neither internal nor mapped to a backend
    pub fn not_found(tool_name: impl Into<String>) -> Self {
        Self::new(Self::NOT_FOUND, tool_name)
    }

    /// An internal handler returned an error or panicked
    pub fn execution_failed(message: impl Into<String>) -> Self {
        Self::new(Self::EXECUTION_FAILED, message)
    }

    /// The backend round trip failed (spawn, protocol or remote error)
    pub fn transport_failed(message: impl Into<String>) -> Self {
        Self::new(Self::TRANSPORT_FAILED, message)
    }

    pub fn is_not_found(&self) -> bool {
        self.code == Self::NOT_FOUND
    }
}

impl std::fmt::Display for ToolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for ToolError {}

/// Result of a tool dispatch, carrying output or error information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    /// Name of the tool that was executed
    pub tool_name: String,
    /// Whether the execution was successful
    pub success: bool,
    /// Output content (for successful execution)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    /// Error information (for failed execution)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ToolError>,
    /// Metadata about the execution
    #[serde(default)]
    pub metadata: ToolResultMetadata,
}

/// Structured metadata about a dispatch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResultMetadata {
    /// Duration of execution in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    /// Backend that served the call; `None` for internal tools
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend: Option<String>,
}

impl ToolResult {
    /// Create a successful result
    pub fn success(tool_name: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            success: true,
            output: Some(output.into()),
            error: None,
            metadata: ToolResultMetadata::default(),
        }
    }

    /// Create a failed result
    pub fn failure(tool_name: impl Into<String>, error: ToolError) -> Self {
        Self {
            tool_name: tool_name.into(),
            success: false,
            output: None,
            error: Some(error),
            metadata: ToolResultMetadata::default(),
        }
    }

    /// Add duration metadata
    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.metadata.duration_ms = Some(duration_ms);
        self
    }

    /// Add backend metadata
    pub fn with_backend(mut self, backend: impl Into<String>) -> Self {
        self.metadata.backend = Some(backend.into());
        self
    }

    /// Check if execution was successful
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Get the output content
    pub fn output(&self) -> Option<&str> {
        self.output.as_deref()
    }

    /// Get the error
    pub fn error(&self) -> Option<&ToolError> {
        self.error.as_ref()
    }

    /// Render the result as the text a caller would see.
    pub fn text(&self) -> String {
        if self.success {
            return self.output.clone().unwrap_or_default();
        }
        match &self.error {
            Some(err) => match err.code.as_str() {
                ToolError::NOT_FOUND => format!("Error: Tool '{}' not found.", self.tool_name),
                ToolError::EXECUTION_FAILED => {
                    format!("Error executing tool {}: {}", self.tool_name, err.message)
                }
                ToolError::TRANSPORT_FAILED => format!("Tool Execution Failed: {}", err.message),
                _ => format!("Error: {}", err.message),
            },
            None => format!("Error executing tool {}: unknown failure", self.tool_name),
        }
    }

    pub fn into_text(self) -> String {
        self.text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_text_is_output() {
        let result = ToolResult::success("read_note", "note body").with_backend("obsidian");
        assert!(result.is_success());
        assert_eq!(result.text(), "note body");
        assert_eq!(result.metadata.backend.as_deref(), Some("obsidian"));
    }

    #[test]
    fn test_not_found_text() {
        let result = ToolResult::failure("nonexistent_tool", ToolError::not_found("nonexistent_tool"));
        assert_eq!(result.text(), "Error: Tool 'nonexistent_tool' not found.");
        assert!(result.error().unwrap().is_not_found());
    }

    #[test]
    fn test_execution_failed_text() {
        let result = ToolResult::failure(
            "synthesize_content",
            ToolError::execution_failed("gateway offline"),
        );
        assert_eq!(
            result.into_text(),
            "Error executing tool synthesize_content: gateway offline"
        );
    }

    #[test]
    fn test_transport_failed_text() {
        let result = ToolResult::failure("list_containers", ToolError::transport_failed("boom"));
        assert_eq!(result.text(), "Tool Execution Failed: boom");
    }

    #[test]
    fn test_unknown_code_text() {
        let result = ToolResult::failure("x", ToolError::new("CANCELLED", "bad"));
        assert_eq!(result.text(), "Error: bad");
    }
}
