//! Error types for the Ollama adapter

use steward_application::ports::llm_gateway::GatewayError;
use thiserror::Error;

/// Errors that can occur when talking to an Ollama server
#[derive(Error, Debug)]
pub enum OllamaError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Ollama returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode Ollama response: {0}")]
    Decode(String),
}

impl From<OllamaError> for GatewayError {
    fn from(err: OllamaError) -> Self {
        match err {
            OllamaError::Http(e) if e.is_timeout() => GatewayError::Timeout,
            OllamaError::Http(e) if e.is_connect() => GatewayError::ConnectionError(e.to_string()),
            OllamaError::Http(e) => GatewayError::RequestFailed(e.to_string()),
            OllamaError::Status { status: 404, body } => GatewayError::ModelNotAvailable(body),
            err @ OllamaError::Status { .. } => GatewayError::RequestFailed(err.to_string()),
            OllamaError::Decode(msg) => GatewayError::InvalidResponse(msg),
        }
    }
}
