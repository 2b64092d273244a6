//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod backend_transport;
pub mod device_controller;
pub mod llm_gateway;
pub mod progress;
pub mod tool_executor;
