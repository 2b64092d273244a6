//! Autonomous planner settings from TOML (`[planner]` section)

use serde::{Deserialize, Serialize};
use steward_application::config::PlannerConfig;
use steward_domain::{PlannerStage, StagePipeline};

use super::models::FileModelsConfig;

/// Raw planner configuration from TOML
///
/// # Example
///
/// ```toml
/// [planner]
/// max_steps = 7
/// history_entry_cap = 3000
/// finish_threshold = 4
/// terminal_marker = "DONE"
/// finalize_tool = "create_note"
/// finalize_success_marker = "Successfully created note"
///
/// # Replaces the built-in research pipeline
/// [[planner.stages]]
/// name = "search"
/// tool = "brave_web_search"
/// directive = "Search the web first."
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePlannerConfig {
    pub max_steps: usize,
    pub history_entry_cap: usize,
    pub finish_threshold: usize,
    pub terminal_marker: String,
    /// Empty string disables heuristic early termination
    pub finalize_tool: String,
    pub finalize_success_marker: Option<String>,
    /// `None` keeps the built-in research pipeline; an empty list disables stages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stages: Option<Vec<PlannerStage>>,
}

impl Default for FilePlannerConfig {
    fn default() -> Self {
        let defaults = PlannerConfig::default();
        Self {
            max_steps: defaults.max_steps,
            history_entry_cap: defaults.history_entry_cap,
            finish_threshold: defaults.finish_threshold,
            terminal_marker: defaults.terminal_marker,
            finalize_tool: defaults.finalize_tool.unwrap_or_default(),
            finalize_success_marker: defaults.finalize_success_marker,
            stages: None,
        }
    }
}

impl FilePlannerConfig {
    pub fn to_planner_config(&self, models: &FileModelsConfig) -> PlannerConfig {
        let finalize_tool = Some(self.finalize_tool.trim())
            .filter(|t| !t.is_empty())
            .map(str::to_string);
        let stages = self
            .stages
            .clone()
            .map(StagePipeline::new)
            .unwrap_or_else(StagePipeline::research);

        PlannerConfig {
            finalize_success_marker: self.finalize_success_marker.clone(),
            ..PlannerConfig::default()
                .with_model(models.planner_model())
                .with_max_steps(self.max_steps)
                .with_history_entry_cap(self.history_entry_cap)
                .with_finish_threshold(self.finish_threshold)
                .with_terminal_marker(self.terminal_marker.clone())
                .with_finalize_tool(finalize_tool)
                .with_stages(stages)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_application_defaults() {
        let config = FilePlannerConfig::default().to_planner_config(&FileModelsConfig::default());
        assert_eq!(config, PlannerConfig::default());
    }

    #[test]
    fn test_custom_stages_and_no_finalize() {
        let toml_str = r#"
finalize_tool = ""

[[stages]]
name = "search"
tool = "brave_web_search"
directive = "Search the web first."
"#;
        let file: FilePlannerConfig = toml::from_str(toml_str).unwrap();
        let config = file.to_planner_config(&FileModelsConfig::default());

        assert!(config.finalize_tool.is_none());
        assert_eq!(config.stages.stages().len(), 1);
        assert_eq!(config.stages.stages()[0].tool, "brave_web_search");
        assert_eq!(config.max_steps, 7);
    }
}
