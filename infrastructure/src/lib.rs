//! Infrastructure layer for steward
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer:
//!
//! - [`ollama`]: `LlmGateway` over the Ollama chat API
//! - [`mcp`]: `BackendTransport` that talks MCP to one backend process per call
//! - [`tools`]: the `ToolRegistry` dispatcher, built-in tools and default catalogue
//! - [`config`]: TOML/env configuration loading

pub mod config;
pub mod mcp;
pub mod ollama;
pub mod tools;

// Re-export commonly used types
pub use config::{ConfigLoader, ConfigValidationError, FileConfig};
pub use mcp::{BackendCommand, McpError, StdioBackendTransport};
pub use ollama::{OllamaError, OllamaGateway};
pub use tools::{BuiltinTools, RegistryStats, ToolRegistry, build_registry, default_external_tools};
