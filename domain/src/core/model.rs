//! Model value object identifying a language model by name

use serde::{Deserialize, Serialize};

/// Name of a language model served by the gateway (Value Object)
///
/// Steward works with two tiers of model: a cheap `fast` model that is tried
/// first and a more capable `smart` model used for escalation, planning and
/// synthesis. Both are plain names such as `llama3.1:latest`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Model(String);

impl Model {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Default fast model used for first-pass intent generation
    pub fn default_fast() -> Self {
        Self::new("llama3.1:latest")
    }

    /// Default smart model used for escalation, planning and synthesis
    pub fn default_smart() -> Self {
        Self::new("llama3.1")
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::default_smart()
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Model {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err("model name must not be empty".to_string());
        }
        Ok(Self::new(trimmed))
    }
}

impl From<&str> for Model {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
