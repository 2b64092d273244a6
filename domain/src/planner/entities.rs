//! Planner state: phases, history and final outcome

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::tool::entities::ToolCall;
use crate::util::truncate_with_ellipsis;

/// Lifecycle of one planner run
///
/// `Idle → Planning → Executing → Recording → (Planning …) → Done | BudgetExhausted`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlannerPhase {
    Idle,
    /// Asking the model for the next tool call
    Planning,
    /// Running the chosen tool through the dispatcher
    Executing,
    /// Appending the step outcome to the history
    Recording,
    Done,
    BudgetExhausted,
}

impl PlannerPhase {
    pub fn as_str(&self) -> &str {
        match self {
            PlannerPhase::Idle => "idle",
            PlannerPhase::Planning => "planning",
            PlannerPhase::Executing => "executing",
            PlannerPhase::Recording => "recording",
            PlannerPhase::Done => "done",
            PlannerPhase::BudgetExhausted => "budget_exhausted",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PlannerPhase::Done | PlannerPhase::BudgetExhausted)
    }
}

impl std::fmt::Display for PlannerPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What happened in one step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum StepOutcome {
    Success(String),
    Error(String),
    /// The model reply held no usable tool call
    ParseFailure(String),
}

/// One immutable line of planner history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub step_index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,
    #[serde(default)]
    pub arguments: HashMap<String, serde_json::Value>,
    pub outcome: StepOutcome,
}

impl HistoryEntry {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, StepOutcome::Success(_))
    }

    /// The line shown to the model on the next planning turn
    pub fn render(&self) -> String {
        let tool = self.tool_name.as_deref().unwrap_or("unknown");
        match &self.outcome {
            StepOutcome::Success(text) => {
                format!("Step {}: Called {} -> Result: {}", self.step_index, tool, text)
            }
            StepOutcome::Error(text) => {
                format!("Step {}: Called {} -> Error: {}", self.step_index, tool, text)
            }
            StepOutcome::ParseFailure(raw) => format!(
                "Step {}: Failed to parse tool call. Response: {}",
                self.step_index, raw
            ),
        }
    }
}

/// Append-only step history for one planner run
///
/// Every recorded text is truncated to `entry_cap` bytes (plus `...`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionHistory {
    entries: Vec<HistoryEntry>,
    entry_cap: usize,
}

impl ExecutionHistory {
    pub fn new(entry_cap: usize) -> Self {
        Self {
            entries: Vec::new(),
            entry_cap,
        }
    }

    pub fn record_success(&mut self, step_index: usize, call: &ToolCall, output: &str) {
        self.push_call(step_index, call, StepOutcome::Success(self.cap(output)));
    }

    pub fn record_error(&mut self, step_index: usize, call: &ToolCall, error: &str) {
        self.push_call(step_index, call, StepOutcome::Error(self.cap(error)));
    }

    pub fn record_parse_failure(&mut self, step_index: usize, raw_response: &str) {
        self.entries.push(HistoryEntry {
            step_index,
            tool_name: None,
            arguments: HashMap::new(),
            outcome: StepOutcome::ParseFailure(self.cap(raw_response)),
        });
    }

    fn push_call(&mut self, step_index: usize, call: &ToolCall, outcome: StepOutcome) {
        self.entries.push(HistoryEntry {
            step_index,
            tool_name: Some(call.tool_name.clone()),
            arguments: call.arguments.clone(),
            outcome,
        });
    }

    fn cap(&self, text: &str) -> String {
        truncate_with_ellipsis(text, self.entry_cap)
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    /// Names of tools that completed successfully at least once
    pub fn succeeded_tools(&self) -> HashSet<&str> {
        self.entries
            .iter()
            .filter(|e| e.is_success())
            .filter_map(|e| e.tool_name.as_deref())
            .collect()
    }

    /// Whole history as prompt text, one line per entry
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(HistoryEntry::render)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Why a planner run stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// The model emitted the terminal marker
    Completed,
    /// The finalize tool reported success
    Finalized,
    /// The step budget ran out
    BudgetExhausted,
}

/// Final result of a planner run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannerOutcome {
    pub termination: Termination,
    /// Text returned to the caller of `run_automation`
    pub summary: String,
    pub iterations: usize,
    pub history: ExecutionHistory,
}

impl PlannerOutcome {
    pub fn completed(summary: impl Into<String>, iterations: usize, history: ExecutionHistory) -> Self {
        Self {
            termination: Termination::Completed,
            summary: summary.into(),
            iterations,
            history,
        }
    }

    pub fn finalized(tool_output: &str, iterations: usize, history: ExecutionHistory) -> Self {
        Self {
            termination: Termination::Finalized,
            summary: format!("Task Completed. {}", tool_output),
            iterations,
            history,
        }
    }

    pub fn budget_exhausted(iterations: usize, history: ExecutionHistory) -> Self {
        let last = history
            .last()
            .map(HistoryEntry::render)
            .unwrap_or_else(|| "No steps executed.".to_string());
        Self {
            termination: Termination::BudgetExhausted,
            summary: format!("Automation Task Completed (Max Steps Reached). Last Action: {}", last),
            iterations,
            history,
        }
    }

    pub fn phase(&self) -> PlannerPhase {
        match self.termination {
            Termination::BudgetExhausted => PlannerPhase::BudgetExhausted,
            _ => PlannerPhase::Done,
        }
    }
}
