//! Planner parameters: budget, history and termination.

use serde::{Deserialize, Serialize};
use steward_domain::{Model, StagePipeline};

/// Configuration for [`RunPlannerUseCase`](crate::use_cases::run_planner::RunPlannerUseCase).
///
/// | Field | Default |
/// |-------|---------|
/// | `max_steps` | 7 |
/// | `history_entry_cap` | 3000 bytes |
/// | `finish_threshold` | 4 entries |
/// | `terminal_marker` | `DONE` |
/// | `finalize_tool` | `create_note` |
/// | `finalize_success_marker` | `Successfully created note` |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Model that chooses each next step
    pub model: Model,
    /// Hard upper bound on loop iterations
    pub max_steps: usize,
    /// Maximum bytes kept per history entry
    pub history_entry_cap: usize,
    /// History length above which the prompt demands finishing
    pub finish_threshold: usize,
    /// Marker a reply uses to declare the goal met
    pub terminal_marker: String,
    /// Tool whose success ends the run early
    pub finalize_tool: Option<String>,
    /// Text the finalize tool's output must contain to count as success
    pub finalize_success_marker: Option<String>,
    /// Tools never offered to the planner (it must not call itself)
    pub excluded_tools: Vec<String>,
    /// Stage pipeline driving masking and directives
    pub stages: StagePipeline,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            model: Model::default_smart(),
            max_steps: 7,
            history_entry_cap: 3000,
            finish_threshold: 4,
            terminal_marker: "DONE".to_string(),
            finalize_tool: Some("create_note".to_string()),
            finalize_success_marker: Some("Successfully created note".to_string()),
            excluded_tools: vec!["run_automation".to_string()],
            stages: StagePipeline::research(),
        }
    }
}

impl PlannerConfig {
    pub fn with_model(mut self, model: Model) -> Self {
        self.model = model;
        self
    }

    pub fn with_max_steps(mut self, max: usize) -> Self {
        self.max_steps = max;
        self
    }

    pub fn with_history_entry_cap(mut self, cap: usize) -> Self {
        self.history_entry_cap = cap;
        self
    }

    pub fn with_finish_threshold(mut self, threshold: usize) -> Self {
        self.finish_threshold = threshold;
        self
    }

    pub fn with_terminal_marker(mut self, marker: impl Into<String>) -> Self {
        self.terminal_marker = marker.into();
        self
    }

    pub fn with_finalize_tool(mut self, tool: Option<String>) -> Self {
        self.finalize_tool = tool;
        self
    }

    pub fn with_stages(mut self, stages: StagePipeline) -> Self {
        self.stages = stages;
        self
    }

    /// Whether `output` of `tool_name` ends the run early
    pub fn is_finalizing(&self, tool_name: &str, output: &str) -> bool {
        self.finalize_tool.as_deref() == Some(tool_name)
            && self
                .finalize_success_marker
                .as_deref()
                .is_none_or(|marker| output.contains(marker))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let config = PlannerConfig::default();
        assert_eq!(config.max_steps, 7);
        assert_eq!(config.history_entry_cap, 3000);
        assert_eq!(config.finish_threshold, 4);
        assert_eq!(config.terminal_marker, "DONE");
        assert_eq!(config.stages.stages().len(), 5);
        assert!(config.excluded_tools.contains(&"run_automation".to_string()));
    }

    #[test]
    fn test_is_finalizing() {
        let config = PlannerConfig::default();
        assert!(config.is_finalizing("create_note", "Successfully created note: Rust"));
        assert!(!config.is_finalizing("create_note", "Error: vault locked"));
        assert!(!config.is_finalizing("read_note", "Successfully created note"));

        let no_marker = PlannerConfig {
            finalize_success_marker: None,
            ..PlannerConfig::default()
        };
        assert!(no_marker.is_finalizing("create_note", "ok"));
    }

    #[test]
    fn test_builder() {
        let config = PlannerConfig::default()
            .with_max_steps(3)
            .with_terminal_marker("FINISHED")
            .with_finalize_tool(None);
        assert_eq!(config.max_steps, 3);
        assert_eq!(config.terminal_marker, "FINISHED");
        assert!(!config.is_finalizing("create_note", "Successfully created note"));
    }
}
