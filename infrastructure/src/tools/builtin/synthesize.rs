//! synthesize_content: merge raw research material into one summary

use async_trait::async_trait;
use std::sync::Arc;
use steward_application::ports::llm_gateway::LlmGateway;
use steward_domain::{
    HandlerError, Message, Model, SynthesisPrompt, ToolCall, ToolDefinition, ToolHandler,
    ToolParameter,
};
use tracing::debug;

pub const SYNTHESIZE_CONTENT: &str = "synthesize_content";

const DEFAULT_TOPIC: &str = "Unknown Topic";

pub fn synthesize_content_definition() -> ToolDefinition {
    ToolDefinition::new(
        SYNTHESIZE_CONTENT,
        "Merge raw search results or notes into one structured Markdown summary",
    )
    .with_parameter(ToolParameter::new("topic", "Subject of the summary", true))
    .with_parameter(ToolParameter::new(
        "content",
        "Raw material as one string; a list of strings is also accepted",
        true,
    ))
}

/// Flatten `content` into one block; list items are separated by blank lines.
fn flatten_content(value: Option<&serde_json::Value>) -> String {
    match value {
        None | Some(serde_json::Value::Null) => String::new(),
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(serde_json::Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join("\n\n"),
        Some(other) => other.to_string(),
    }
}

/// Model-backed summarizer
pub struct SynthesizeContentHandler {
    gateway: Arc<dyn LlmGateway>,
    model: Model,
}

impl SynthesizeContentHandler {
    pub fn new(gateway: Arc<dyn LlmGateway>, model: Model) -> Self {
        Self { gateway, model }
    }
}

#[async_trait]
impl ToolHandler for SynthesizeContentHandler {
    async fn call(&self, call: &ToolCall) -> Result<String, HandlerError> {
        let topic = call
            .get_string("topic")
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(DEFAULT_TOPIC);
        let content = flatten_content(call.arguments.get("content"));
        if content.trim().is_empty() {
            return Err(HandlerError::InvalidArgument(
                "No content provided to synthesize.".to_string(),
            ));
        }

        debug!(topic, bytes = content.len(), model = %self.model, "Synthesizing content");
        let messages = [
            Message::system(SynthesisPrompt::system()),
            Message::user(SynthesisPrompt::user(topic, &content)),
        ];
        self.gateway
            .chat(&self.model, &messages)
            .await
            .map_err(|e| HandlerError::Failed(format!("synthesis failed: {}", e)))
    }
}
