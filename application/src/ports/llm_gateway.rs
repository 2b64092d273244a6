//! LLM Gateway port
//!
//! Defines the interface for communicating with language model servers.

use async_trait::async_trait;
use steward_domain::{Message, Model};
use thiserror::Error;

/// Errors that can occur during LLM gateway operations
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,
}

/// Gateway for LLM communication
///
/// One call is one non-streaming chat completion over role-tagged messages.
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Send the conversation to `model` and return the assistant's reply text
    async fn chat(&self, model: &Model, messages: &[Message]) -> Result<String, GatewayError>;
}
