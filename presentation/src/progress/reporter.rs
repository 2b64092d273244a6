//! Progress reporting for planner runs

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;
use steward_application::PlannerProgressNotifier;
use steward_domain::util::truncate_str;
use steward_domain::{HistoryEntry, PlannerOutcome, PlannerPhase, StepOutcome, ToolCall};

/// Reports planner progress with a spinner
pub struct ProgressReporter {
    bar: Mutex<Option<ProgressBar>>,
    max_steps: Mutex<usize>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
            max_steps: Mutex::new(0),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn phase_name(phase: PlannerPhase) -> &'static str {
        match phase {
            PlannerPhase::Idle => "Idle",
            PlannerPhase::Planning => "Planning",
            PlannerPhase::Executing => "Executing",
            PlannerPhase::Recording => "Recording",
            PlannerPhase::Done => "Done",
            PlannerPhase::BudgetExhausted => "Out of steps",
        }
    }

    fn prefix(&self, step: usize) -> String {
        let max = *self.max_steps.lock().unwrap_or_else(|e| e.into_inner());
        format!("Step {}/{}", step, max)
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Some(pb) = self.bar.lock().unwrap_or_else(|e| e.into_inner()).as_ref() {
            f(pb);
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl PlannerProgressNotifier for ProgressReporter {
    fn on_run_start(&self, goal: &str, max_steps: usize) {
        *self.max_steps.lock().unwrap_or_else(|e| e.into_inner()) = max_steps;

        let pb = ProgressBar::new_spinner();
        pb.set_style(Self::spinner_style());
        pb.set_prefix("Starting");
        pb.set_message(truncate_str(goal, 60).to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        *self.bar.lock().unwrap_or_else(|e| e.into_inner()) = Some(pb);
    }

    fn on_phase(&self, step: usize, phase: PlannerPhase) {
        let prefix = self.prefix(step);
        self.with_bar(|pb| {
            pb.set_prefix(prefix);
            pb.set_message(format!("{}...", Self::phase_name(phase)));
        });
    }

    fn on_tool_call(&self, step: usize, call: &ToolCall) {
        let prefix = self.prefix(step);
        self.with_bar(|pb| {
            pb.set_prefix(prefix);
            pb.set_message(format!("{} {}", "calling".dimmed(), call.tool_name.bold()));
        });
    }

    fn on_step_recorded(&self, entry: &HistoryEntry) {
        let tool = entry.tool_name.as_deref().unwrap_or("planner");
        let line = match &entry.outcome {
            StepOutcome::Success(_) => format!("  {} {}", "v".green(), tool),
            StepOutcome::Error(text) => {
                format!("  {} {} {}", "x".red(), tool, truncate_str(text, 80).dimmed())
            }
            StepOutcome::ParseFailure(_) => format!("  {} {}", "?".yellow(), "unparseable reply".dimmed()),
        };
        self.with_bar(|pb| pb.println(line));
    }

    fn on_run_complete(&self, outcome: &PlannerOutcome) {
        if let Some(pb) = self.bar.lock().unwrap_or_else(|e| e.into_inner()).take() {
            let name = Self::phase_name(outcome.phase());
            pb.finish_and_clear();
            println!("{} {}", "->".cyan(), name.green().bold());
        }
    }
}

/// Plain line-per-event progress (no spinner)
pub struct SimpleProgress;

impl PlannerProgressNotifier for SimpleProgress {
    fn on_run_start(&self, goal: &str, max_steps: usize) {
        println!("{} {} ({} steps max)", "->".cyan(), goal.bold(), max_steps);
    }

    fn on_tool_call(&self, step: usize, call: &ToolCall) {
        println!("  [{}] {}", step, call.tool_name);
    }

    fn on_run_complete(&self, outcome: &PlannerOutcome) {
        println!("{} {}", "->".cyan(), ProgressReporter::phase_name(outcome.phase()));
    }
}
