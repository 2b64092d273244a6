//! In-process tool handler abstraction
//!
//! A [`ToolHandler`] is the body of an internal tool. The registry owns one
//! handler per internal tool name and invokes it with the full [`ToolCall`].
//! Handlers report failures through [`HandlerError`]; the registry turns those
//! (and panics) into `EXECUTION_FAILED` results, so a misbehaving handler can
//! never take the dispatcher down.

use async_trait::async_trait;
use thiserror::Error;

use super::entities::ToolCall;

/// Error type for internal tool handlers
#[derive(Debug, Error)]
pub enum HandlerError {
    /// A required argument was missing or malformed
    #[error("{0}")]
    InvalidArgument(String),

    /// The handler ran but could not produce a result
    #[error("{0}")]
    Failed(String),
}

/// Body of an internal tool
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// Run the tool and return its textual output
    async fn call(&self, call: &ToolCall) -> Result<String, HandlerError>;
}
