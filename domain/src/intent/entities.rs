//! Intent entities produced by the resolver

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::tool::entities::ToolCall;

/// Confidence assumed when a model omits it
pub const DEFAULT_CONFIDENCE: f64 = 0.9;

/// Kind of action an [`Intent`] asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentType {
    /// Operate a device from the entity registry
    Control,
    /// Ask about state; dropped unless it names a tool, action or device
    Query,
    /// Invoke a registered tool
    #[serde(alias = "mcp_tool", alias = "tool")]
    ToolCall,
}

impl IntentType {
    pub fn as_str(&self) -> &str {
        match self {
            IntentType::Control => "control",
            IntentType::Query => "query",
            IntentType::ToolCall => "tool_call",
        }
    }

    /// Parse a model-provided label, accepting the legacy spellings
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "control" => Some(IntentType::Control),
            "query" => Some(IntentType::Query),
            "tool_call" | "mcp_tool" | "tool" => Some(IntentType::ToolCall),
            _ => None,
        }
    }
}

impl std::fmt::Display for IntentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A structured interpretation of one user command (transient)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    pub intent_type: IntentType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_device: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,
    #[serde(default)]
    pub arguments: HashMap<String, serde_json::Value>,
    pub confidence: f64,
}

impl Intent {
    /// Tool invocation with confidence 1.0
    pub fn tool_call(tool_name: impl Into<String>) -> Self {
        Self {
            intent_type: IntentType::ToolCall,
            target_device: None,
            action: None,
            tool_name: Some(tool_name.into()),
            arguments: HashMap::new(),
            confidence: 1.0,
        }
    }

    /// Device control with confidence 1.0
    pub fn control(target_device: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            intent_type: IntentType::Control,
            target_device: Some(target_device.into()),
            action: Some(action.into()),
            tool_name: None,
            arguments: HashMap::new(),
            confidence: 1.0,
        }
    }

    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.arguments.insert(key.into(), value.into());
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence.clamp(0.0, 1.0);
        self
    }

    /// Whether this intent clears the caller's confidence gate
    pub fn meets_threshold(&self, threshold: f64) -> bool {
        self.confidence >= threshold
    }

    /// The tool invocation this intent describes, if it names a tool
    pub fn to_tool_call(&self) -> Option<ToolCall> {
        self.tool_name
            .as_deref()
            .map(|name| ToolCall::new(name).with_arguments(self.arguments.clone()))
    }
}

/// Friendly device name → canonical entity id, snapshotted per resolution
///
/// Ordered so the device list shown to the model is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityRegistry {
    entities: BTreeMap<String, String>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entity(mut self, name: impl Into<String>, id: impl Into<String>) -> Self {
        self.entities.insert(name.into(), id.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entities.get(name).map(String::as_str)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entities.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EntityRegistry {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entities: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
