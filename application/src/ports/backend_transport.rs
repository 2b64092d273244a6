//! Backend transport port
//!
//! One request/response round trip to the out-of-process server that hosts a
//! family of external tools. The registry only knows backend tags; the
//! transport knows how to reach them.

use async_trait::async_trait;
use thiserror::Error;

/// Errors from a backend round trip
///
/// Display text is the bare detail; callers wrap it as
/// `Tool Execution Failed: <detail>`.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("no backend configured for '{0}'")]
    UnknownBackend(String),

    #[error("failed to start backend '{backend}': {reason}")]
    Spawn { backend: String, reason: String },

    #[error("{0}")]
    Protocol(String),

    /// The backend reported failure; carries its stderr or error message
    #[error("{0}")]
    Remote(String),

    #[error("backend '{0}' timed out")]
    Timeout(String),
}

/// Round-trip access to external tool backends
#[async_trait]
pub trait BackendTransport: Send + Sync {
    /// Invoke `tool_name` on `backend` and return the textual payload
    async fn call_tool(
        &self,
        backend: &str,
        tool_name: &str,
        arguments: serde_json::Value,
    ) -> Result<String, TransportError>;
}
