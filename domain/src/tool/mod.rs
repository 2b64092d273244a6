//! Tool domain module
//!
//! Defines how a capability is described ([`ToolDefinition`]), invoked
//! ([`ToolCall`]) and reported ([`ToolResult`]), independent of where it runs.
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
//! │ ToolSpec     │───▶│ ToolCall     │───▶│ ToolResult   │
//! │ (catalogue)  │    │ (invocation) │    │ (output)     │
//! └──────┬───────┘    └──────────────┘    └──────────────┘
//!        │
//!        ├─ internal:  "synthesize_content" → ToolHandler (in-process)
//!        └─ external:  "list_containers"    → backend "docker"
//! ```
//!
//! # Internal vs external tools
//!
//! Internal tools are [`ToolHandler`] implementations that run inside the
//! process. External tools are served by a backend process; their
//! [`ToolDefinition::backend`] tag names that backend explicitly, and
//! [`ToolDefinition::remote_name`] translates the logical name when the backend
//! exposes it under a different one (`duckduckgo_search` → `search`).
//!
//! The dispatcher itself lives in the infrastructure layer; the application
//! layer reaches it through `ToolExecutorPort`.

pub mod entities;
pub mod handler;
pub mod note;
pub mod value_objects;

pub use entities::{ToolCall, ToolDefinition, ToolParameter, ToolSpec};
pub use handler::{HandlerError, ToolHandler};
pub use value_objects::{ToolError, ToolResult, ToolResultMetadata};
