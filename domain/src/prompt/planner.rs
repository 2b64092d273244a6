//! Prompt for one planning turn

use crate::planner::entities::ExecutionHistory;
use crate::tool::entities::ToolSpec;

/// Inputs of one planning turn
#[derive(Debug)]
pub struct PlannerPromptInput<'a> {
    pub goal: &'a str,
    /// Catalogue after masking
    pub tools: &'a ToolSpec,
    pub history: &'a ExecutionHistory,
    pub stage_directive: Option<String>,
    pub finish_now: bool,
    pub terminal_marker: &'a str,
}

/// Templates for the planner
pub struct PlannerPrompt;

impl PlannerPrompt {
    pub fn build(input: &PlannerPromptInput<'_>) -> String {
        let tools = serde_json::to_string_pretty(&input.tools.to_json_schemas())
            .unwrap_or_else(|_| "[]".to_string());
        let history = if input.history.is_empty() {
            "(no steps yet)".to_string()
        } else {
            input.history.render()
        };

        let mut state = input.stage_directive.clone().unwrap_or_default();
        if input.finish_now {
            if !state.is_empty() {
                state.push(' ');
            }
            state.push_str("WARNING: You are taking too many steps. FINISH NOW.");
        }

        format!(
            r#"You are the Automation Agent, a research planner that works one tool call at a time.

GOAL: "{goal}"

TOOLS AVAILABLE:
{tools}

HISTORY:
{history}

{state}

FORMAT:
{{
    "tool_name": "name",
    "arguments": {{ "arg": "value" }}
}}

Output JSON ONLY. When the goal is met, reply with {marker} followed by the final answer."#,
            goal = input.goal,
            marker = input.terminal_marker,
        )
    }
}
