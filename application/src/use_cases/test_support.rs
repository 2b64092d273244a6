//! Scripted port implementations shared by use case tests

use crate::ports::device_controller::{DeviceCommand, DeviceControllerPort, DeviceError};
use crate::ports::llm_gateway::{GatewayError, LlmGateway};
use crate::ports::tool_executor::ToolExecutorPort;
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use steward_domain::{Message, Model, ToolCall, ToolDefinition, ToolError, ToolResult, ToolSpec};

/// A scripted reply for the mock gateway
#[derive(Debug, Clone)]
pub enum ScriptedReply {
    Text(String),
    Error(String),
}

pub fn text(reply: &str) -> ScriptedReply {
    ScriptedReply::Text(reply.to_string())
}

/// Gateway that answers from a per-model queue and records every request
pub struct ScriptedGateway {
    queues: Mutex<HashMap<String, VecDeque<ScriptedReply>>>,
    fallback: Mutex<VecDeque<ScriptedReply>>,
    calls: Mutex<Vec<(String, Vec<Message>)>>,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self {
            queues: Mutex::new(HashMap::new()),
            fallback: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Replies for one specific model
    pub fn with_model(self, model: &str, replies: Vec<ScriptedReply>) -> Self {
        self.queues
            .lock()
            .unwrap()
            .insert(model.to_string(), replies.into());
        self
    }

    /// Replies for any model without its own queue
    pub fn with_replies(self, replies: Vec<ScriptedReply>) -> Self {
        *self.fallback.lock().unwrap() = replies.into();
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn called_models(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(m, _)| m.clone()).collect()
    }

    /// Concatenated message contents of the n-th request
    pub fn request_text(&self, index: usize) -> String {
        self.calls.lock().unwrap()[index]
            .1
            .iter()
            .map(|m| m.content.clone())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[async_trait]
impl LlmGateway for ScriptedGateway {
    async fn chat(&self, model: &Model, messages: &[Message]) -> Result<String, GatewayError> {
        self.calls
            .lock()
            .unwrap()
            .push((model.to_string(), messages.to_vec()));

        let next = {
            let mut queues = self.queues.lock().unwrap();
            match queues.get_mut(model.as_str()) {
                Some(queue) => queue.pop_front(),
                None => self.fallback.lock().unwrap().pop_front(),
            }
        };
        match next.unwrap_or(ScriptedReply::Error("(no more responses)".to_string())) {
            ScriptedReply::Text(t) => Ok(t),
            ScriptedReply::Error(e) => Err(GatewayError::RequestFailed(e)),
        }
    }
}

/// Tool executor with fixed per-tool replies that records each call
pub struct MockToolExecutor {
    spec: ToolSpec,
    replies: HashMap<String, ToolResult>,
    calls: Mutex<Vec<ToolCall>>,
}

impl MockToolExecutor {
    pub fn new(tool_names: &[&str]) -> Self {
        let spec = tool_names
            .iter()
            .map(|n| ToolDefinition::new(*n, format!("{} tool", n)))
            .fold(ToolSpec::new(), ToolSpec::register);
        Self {
            spec,
            replies: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_output(mut self, tool: &str, output: &str) -> Self {
        self.replies
            .insert(tool.to_string(), ToolResult::success(tool, output));
        self
    }

    pub fn with_failure(mut self, tool: &str, message: &str) -> Self {
        self.replies.insert(
            tool.to_string(),
            ToolResult::failure(tool, ToolError::transport_failed(message)),
        );
        self
    }

    pub fn calls(&self) -> Vec<ToolCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn called_tools(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.tool_name).collect()
    }
}

#[async_trait]
impl ToolExecutorPort for MockToolExecutor {
    fn tool_spec(&self) -> &ToolSpec {
        &self.spec
    }

    async fn execute(&self, call: &ToolCall) -> ToolResult {
        self.calls.lock().unwrap().push(call.clone());
        if !self.spec.contains(&call.tool_name) {
            return ToolResult::failure(&call.tool_name, ToolError::not_found(&call.tool_name));
        }
        self.replies
            .get(&call.tool_name)
            .cloned()
            .unwrap_or_else(|| ToolResult::success(&call.tool_name, format!("{} ok", call.tool_name)))
    }
}

/// Device controller that records commands and always succeeds
pub struct RecordingDevices {
    pub commands: Mutex<Vec<DeviceCommand>>,
}

impl RecordingDevices {
    pub fn new() -> Self {
        Self {
            commands: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl DeviceControllerPort for RecordingDevices {
    async fn apply(&self, command: &DeviceCommand) -> Result<String, DeviceError> {
        self.commands.lock().unwrap().push(command.clone());
        Ok(format!("{} {}", command.action, command.target))
    }
}
