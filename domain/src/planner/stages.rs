//! Stage pipeline driving tool masking and per-turn directives
//!
//! Each stage names the tool that completes it. The first stage whose tool
//! has not yet succeeded is the current one; its directive is injected into
//! the planning prompt. Tools of finished stages are hidden from the model
//! unless the stage is marked repeatable, which keeps the loop moving forward.

use serde::{Deserialize, Serialize};

use super::entities::ExecutionHistory;

/// One step of a research workflow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannerStage {
    /// Short label used in directives and logs (e.g. "fact_check")
    pub name: String,
    /// Tool whose success completes this stage
    pub tool: String,
    /// Instruction shown to the model while this stage is current
    pub directive: String,
    /// Keep the tool visible after the stage succeeded
    #[serde(default)]
    pub repeatable: bool,
}

impl PlannerStage {
    pub fn new(name: impl Into<String>, tool: impl Into<String>, directive: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tool: tool.into(),
            directive: directive.into(),
            repeatable: false,
        }
    }

    pub fn repeatable(mut self) -> Self {
        self.repeatable = true;
        self
    }
}

/// Ordered list of stages
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StagePipeline {
    stages: Vec<PlannerStage>,
}

impl StagePipeline {
    pub fn new(stages: Vec<PlannerStage>) -> Self {
        Self { stages }
    }

    /// broad search → specific search → fact check → synthesize → save
    pub fn research() -> Self {
        Self::new(vec![
            PlannerStage::new(
                "broad_search",
                "duckduckgo_search",
                "You MUST start by using 'duckduckgo_search' to find initial information.",
            ),
            PlannerStage::new(
                "specific_search",
                "brave_web_search",
                "You MUST now use 'brave_web_search' to find additional perspectives.",
            ),
            PlannerStage::new(
                "fact_check",
                "wikipedia_search",
                "You MUST now use 'wikipedia_search' to verify facts.",
            ),
            PlannerStage::new(
                "synthesize",
                "synthesize_content",
                "You have enough info. You MUST now use 'synthesize_content' to summarize.",
            ),
            PlannerStage::new(
                "save",
                "create_note",
                "You MUST now use 'create_note' to save the synthesized content. Do NOT search again.",
            )
            .repeatable(),
        ])
    }

    pub fn stages(&self) -> &[PlannerStage] {
        &self.stages
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// First stage whose tool has not succeeded yet, with its 1-based position
    pub fn current(&self, history: &ExecutionHistory) -> Option<(usize, &PlannerStage)> {
        let done = history.succeeded_tools();
        self.stages
            .iter()
            .enumerate()
            .find(|(_, stage)| !done.contains(stage.tool.as_str()))
            .map(|(i, stage)| (i + 1, stage))
    }

    /// Tools to hide from the catalogue on the next planning turn
    pub fn masked_tools(&self, history: &ExecutionHistory) -> Vec<&str> {
        let done = history.succeeded_tools();
        self.stages
            .iter()
            .filter(|stage| !stage.repeatable && done.contains(stage.tool.as_str()))
            .map(|stage| stage.tool.as_str())
            .collect()
    }

    /// Directive line for the current stage, or the last stage once all are done
    pub fn directive(&self, history: &ExecutionHistory) -> Option<String> {
        let (position, stage) = self
            .current(history)
            .or_else(|| self.stages.last().map(|s| (self.stages.len(), s)))?;
        Some(format!(
            "STATE: STEP {} ({}). {}",
            position,
            stage.name.to_uppercase(),
            stage.directive
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::entities::ToolCall;

    fn history_with(successes: &[&str]) -> ExecutionHistory {
        let mut history = ExecutionHistory::new(100);
        for (i, tool) in successes.iter().enumerate() {
            history.record_success(i + 1, &ToolCall::new(*tool), "ok");
        }
        history
    }

    #[test]
    fn test_first_stage_is_current_on_empty_history() {
        let pipeline = StagePipeline::research();
        let history = ExecutionHistory::new(100);
        let (pos, stage) = pipeline.current(&history).unwrap();
        assert_eq!(pos, 1);
        assert_eq!(stage.tool, "duckduckgo_search");
        assert!(pipeline.masked_tools(&history).is_empty());
        assert!(pipeline.directive(&history).unwrap().starts_with("STATE: STEP 1 (BROAD_SEARCH)."));
    }

    #[test]
    fn test_completed_stages_are_masked() {
        let pipeline = StagePipeline::research();
        let history = history_with(&["duckduckgo_search", "brave_web_search"]);
        assert_eq!(
            pipeline.masked_tools(&history),
            vec!["duckduckgo_search", "brave_web_search"]
        );
        assert_eq!(pipeline.current(&history).unwrap().1.name, "fact_check");
    }

    #[test]
    fn test_failed_calls_do_not_advance_the_pipeline() {
        let pipeline = StagePipeline::research();
        let mut history = ExecutionHistory::new(100);
        history.record_error(1, &ToolCall::new("duckduckgo_search"), "timeout");
        assert_eq!(pipeline.current(&history).unwrap().0, 1);
        assert!(pipeline.masked_tools(&history).is_empty());
    }

    #[test]
    fn test_save_stage_stays_visible() {
        let pipeline = StagePipeline::research();
        let history = history_with(&[
            "duckduckgo_search",
            "brave_web_search",
            "wikipedia_search",
            "synthesize_content",
            "create_note",
        ]);
        assert!(pipeline.current(&history).is_none());
        assert!(!pipeline.masked_tools(&history).contains(&"create_note"));
        assert!(pipeline.directive(&history).unwrap().contains("STEP 5 (SAVE)"));
    }

    #[test]
    fn test_empty_pipeline_has_no_directive() {
        let pipeline = StagePipeline::default();
        assert!(pipeline.directive(&ExecutionHistory::new(10)).is_none());
    }
}
