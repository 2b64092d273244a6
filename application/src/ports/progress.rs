//! Progress notification port
//!
//! Defines the interface for reporting planner progress.

use steward_domain::{HistoryEntry, PlannerOutcome, PlannerPhase, ToolCall};

/// Callback for progress updates during a planner run
///
/// Implementations live in the presentation layer. All methods default to
/// no-ops so implementors only override what they display.
pub trait PlannerProgressNotifier: Send + Sync {
    /// Called once before the first planning turn
    fn on_run_start(&self, _goal: &str, _max_steps: usize) {}

    /// Called whenever the loop enters a new phase
    fn on_phase(&self, _step: usize, _phase: PlannerPhase) {}

    /// Called right before a tool is executed
    fn on_tool_call(&self, _step: usize, _call: &ToolCall) {}

    /// Called after a step has been appended to the history
    fn on_step_recorded(&self, _entry: &HistoryEntry) {}

    /// Called once with the final outcome
    fn on_run_complete(&self, _outcome: &PlannerOutcome) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoPlannerProgress;

impl PlannerProgressNotifier for NoPlannerProgress {}
