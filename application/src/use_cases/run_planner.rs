//! Run Planner use case.
//!
//! Drives the bounded plan → execute → record loop for one goal:
//!
//! ```text
//! for step in 1..=max_steps
//!   ├─ Planning:  mask catalogue, build prompt, ask the planner model
//!   ├─ Finish     (terminal marker)          → Completed
//!   ├─ Unparsed   (no tool call, no marker)  → record parse failure
//!   └─ Call       → Executing → Recording
//!                     └─ finalize tool succeeded → Finalized
//! budget spent → BudgetExhausted
//! ```
//!
//! The loop never returns an error. Gateway failures and tool failures are
//! recorded in the history and the next step proceeds.

use crate::config::PlannerConfig;
use crate::ports::llm_gateway::LlmGateway;
use crate::ports::progress::{NoPlannerProgress, PlannerProgressNotifier};
use crate::ports::tool_executor::ToolExecutorPort;
use std::sync::Arc;
use steward_domain::util::truncate_str;
use steward_domain::{
    ExecutionHistory, Message, PlannerDecision, PlannerOutcome, PlannerPhase, PlannerPrompt,
    PlannerPromptInput, ToolCall, TolerantParser,
};
use tracing::{debug, info, warn};

/// Use case for running the autonomous planner
pub struct RunPlannerUseCase {
    gateway: Arc<dyn LlmGateway>,
    tools: Arc<dyn ToolExecutorPort>,
    config: PlannerConfig,
    progress: Arc<dyn PlannerProgressNotifier>,
}

impl Clone for RunPlannerUseCase {
    fn clone(&self) -> Self {
        Self {
            gateway: self.gateway.clone(),
            tools: self.tools.clone(),
            config: self.config.clone(),
            progress: self.progress.clone(),
        }
    }
}

impl RunPlannerUseCase {
    pub fn new(
        gateway: Arc<dyn LlmGateway>,
        tools: Arc<dyn ToolExecutorPort>,
        config: PlannerConfig,
    ) -> Self {
        Self {
            gateway,
            tools,
            config,
            progress: Arc::new(NoPlannerProgress),
        }
    }

    /// Create with a progress notifier.
    pub fn with_progress(mut self, progress: Arc<dyn PlannerProgressNotifier>) -> Self {
        self.progress = progress;
        self
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Run the loop for `goal` until a terminal condition.
    pub async fn execute(&self, goal: &str) -> PlannerOutcome {
        let parser = TolerantParser::new().with_control_escape();
        let mut history = ExecutionHistory::new(self.config.history_entry_cap);
        let max_steps = self.config.max_steps;

        info!(goal = truncate_str(goal, 100), max_steps, "Planner started");
        self.progress.on_run_start(goal, max_steps);

        for step in 1..=max_steps {
            self.progress.on_phase(step, PlannerPhase::Planning);
            let prompt = self.build_prompt(goal, &history);

            let reply = match self
                .gateway
                .chat(&self.config.model, &[Message::user(prompt)])
                .await
            {
                Ok(reply) => reply,
                Err(e) => {
                    warn!(step, error = %e, "Planner model request failed");
                    history.record_parse_failure(step, &format!("model request failed: {}", e));
                    self.notify_recorded(&history);
                    continue;
                }
            };

            match PlannerDecision::from_reply(&reply, &parser, &self.config.terminal_marker) {
                PlannerDecision::Finish(result) => {
                    info!(step, "Planner reported goal met");
                    return self.complete(PlannerOutcome::completed(result, step, history));
                }
                PlannerDecision::Unparsed(raw) => {
                    warn!(
                        step,
                        reply = truncate_str(&raw, 200),
                        "Could not parse planner reply"
                    );
                    history.record_parse_failure(step, &raw);
                    self.notify_recorded(&history);
                }
                PlannerDecision::Call(call) => {
                    if let Some(output) = self.run_step(step, &call, &mut history).await {
                        info!(step, tool = %call.tool_name, "Finalize tool succeeded");
                        return self.complete(PlannerOutcome::finalized(&output, step, history));
                    }
                }
            }
        }

        info!(max_steps, "Planner step budget exhausted");
        self.complete(PlannerOutcome::budget_exhausted(max_steps, history))
    }

    /// Execute and record one tool call. Returns the output when it finalizes the run.
    async fn run_step(
        &self,
        step: usize,
        call: &ToolCall,
        history: &mut ExecutionHistory,
    ) -> Option<String> {
        self.progress.on_phase(step, PlannerPhase::Executing);
        self.progress.on_tool_call(step, call);

        let result = if self.is_excluded(&call.tool_name) {
            None
        } else {
            Some(self.tools.execute(call).await)
        };

        self.progress.on_phase(step, PlannerPhase::Recording);
        let finalized = match result {
            Some(result) if result.is_success() => {
                let output = result.into_text();
                debug!(step, tool = %call.tool_name, "Tool call succeeded");
                history.record_success(step, call, &output);
                self.config
                    .is_finalizing(&call.tool_name, &output)
                    .then_some(output)
            }
            Some(result) => {
                let text = result.into_text();
                warn!(step, tool = %call.tool_name, error = %text, "Tool call failed");
                history.record_error(step, call, &text);
                None
            }
            None => {
                warn!(step, tool = %call.tool_name, "Planner asked for an excluded tool");
                history.record_error(
                    step,
                    call,
                    &format!("Tool '{}' is not available to the planner.", call.tool_name),
                );
                None
            }
        };
        self.notify_recorded(history);
        finalized
    }

    fn build_prompt(&self, goal: &str, history: &ExecutionHistory) -> String {
        let stages = &self.config.stages;
        let masked = self
            .config
            .excluded_tools
            .iter()
            .map(String::as_str)
            .chain(stages.masked_tools(history));
        let catalogue = self.tools.tool_spec().without(masked);

        PlannerPrompt::build(&PlannerPromptInput {
            goal,
            tools: &catalogue,
            history,
            stage_directive: stages.directive(history),
            finish_now: history.len() > self.config.finish_threshold,
            terminal_marker: &self.config.terminal_marker,
        })
    }

    fn is_excluded(&self, tool_name: &str) -> bool {
        self.config.excluded_tools.iter().any(|t| t == tool_name)
    }

    fn notify_recorded(&self, history: &ExecutionHistory) {
        if let Some(entry) = history.last() {
            self.progress.on_step_recorded(entry);
        }
    }

    fn complete(&self, outcome: PlannerOutcome) -> PlannerOutcome {
        self.progress.on_phase(outcome.iterations, outcome.phase());
        self.progress.on_run_complete(&outcome);
        outcome
    }
}
