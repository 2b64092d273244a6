//! Error types for the MCP backend transport

use thiserror::Error;

/// Result type alias for MCP operations
pub type Result<T> = std::result::Result<T, McpError>;

/// Errors that can occur during one backend round trip
#[derive(Error, Debug)]
pub enum McpError {
    #[error("Failed to spawn backend process: {0}")]
    SpawnError(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("JSON-RPC error (code {code}): {message}")]
    RpcError { code: i64, message: String },

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// The tool ran but flagged its result as an error
    #[error("{0}")]
    ToolFailed(String),

    #[error("Transport closed")]
    TransportClosed,

    #[error("Request timeout")]
    Timeout,
}
