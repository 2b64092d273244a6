//! Model selection from TOML (`[models]` section)

use serde::{Deserialize, Serialize};
use steward_domain::Model;

/// Model names per role
///
/// # Example
///
/// ```toml
/// [models]
/// fast = "llama3.1:latest"    # First pass of intent generation
/// smart = "llama3.1"          # Escalation
/// planner = "qwen2.5:14b"     # Autonomous planner (defaults to smart)
/// synthesis = "llama3.1"      # synthesize_content (defaults to smart)
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileModelsConfig {
    pub fast: String,
    pub smart: String,
    pub planner: Option<String>,
    pub synthesis: Option<String>,
}

impl Default for FileModelsConfig {
    fn default() -> Self {
        Self {
            fast: Model::default_fast().as_str().to_string(),
            smart: Model::default_smart().as_str().to_string(),
            planner: None,
            synthesis: None,
        }
    }
}

impl FileModelsConfig {
    pub fn fast_model(&self) -> Model {
        Model::new(self.fast.trim())
    }

    pub fn smart_model(&self) -> Model {
        Model::new(self.smart.trim())
    }

    pub fn planner_model(&self) -> Model {
        self.planner
            .as_deref()
            .map(|m| Model::new(m.trim()))
            .unwrap_or_else(|| self.smart_model())
    }

    pub fn synthesis_model(&self) -> Model {
        self.synthesis
            .as_deref()
            .map(|m| Model::new(m.trim()))
            .unwrap_or_else(|| self.smart_model())
    }

    /// Role of the first blank model name, if any
    pub(super) fn first_empty(&self) -> Option<&'static str> {
        [
            ("fast", Some(&self.fast)),
            ("smart", Some(&self.smart)),
            ("planner", self.planner.as_ref()),
            ("synthesis", self.synthesis.as_ref()),
        ]
        .into_iter()
        .find(|(_, name)| name.is_some_and(|n| n.trim().is_empty()))
        .map(|(role, _)| role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_planner_and_synthesis_fall_back_to_smart() {
        let config = FileModelsConfig {
            smart: "qwen2.5".to_string(),
            ..Default::default()
        };
        assert_eq!(config.planner_model().as_str(), "qwen2.5");
        assert_eq!(config.synthesis_model().as_str(), "qwen2.5");
    }

    #[test]
    fn test_first_empty() {
        let config = FileModelsConfig {
            planner: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(config.first_empty(), Some("planner"));
        assert_eq!(FileModelsConfig::default().first_empty(), None);
    }
}
