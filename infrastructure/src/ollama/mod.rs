//! Ollama model gateway adapter

pub mod error;
pub mod gateway;

pub use error::OllamaError;
pub use gateway::{DEFAULT_BASE_URL, OllamaGateway};
