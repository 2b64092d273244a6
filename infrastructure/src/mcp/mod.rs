//! MCP backend adapter
//!
//! Reaches external tool backends over the Model Context Protocol on stdio.

pub mod error;
pub mod protocol;
pub mod transport;

pub use error::McpError;
pub use transport::{BackendCommand, StdioBackendTransport};
