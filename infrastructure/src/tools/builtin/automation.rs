//! run_automation: hand a multi-step goal to the planner
//!
//! The handler lives inside the registry it dispatches through, so it keeps
//! only a [`Weak`] reference and upgrades it per call.

use async_trait::async_trait;
use std::sync::{Arc, Weak};
use steward_application::config::PlannerConfig;
use steward_application::ports::llm_gateway::LlmGateway;
use steward_application::ports::progress::{NoPlannerProgress, PlannerProgressNotifier};
use steward_application::ports::tool_executor::ToolExecutorPort;
use steward_application::use_cases::run_planner::RunPlannerUseCase;
use steward_domain::{HandlerError, ToolCall, ToolDefinition, ToolHandler, ToolParameter};
use tracing::info;

use crate::tools::registry::ToolRegistry;

pub const RUN_AUTOMATION: &str = "run_automation";

pub fn run_automation_definition() -> ToolDefinition {
    ToolDefinition::new(
        RUN_AUTOMATION,
        "Run a multi-step task autonomously: research a topic, combine several tools, save the result",
    )
    .with_parameter(ToolParameter::new("goal", "What the task should achieve", true))
}

/// Runs [`RunPlannerUseCase`] against the owning registry
pub struct AutomationHandler {
    registry: Weak<ToolRegistry>,
    gateway: Arc<dyn LlmGateway>,
    config: PlannerConfig,
    progress: Arc<dyn PlannerProgressNotifier>,
}

impl AutomationHandler {
    pub fn new(registry: Weak<ToolRegistry>, gateway: Arc<dyn LlmGateway>, config: PlannerConfig) -> Self {
        Self {
            registry,
            gateway,
            config,
            progress: Arc::new(NoPlannerProgress),
        }
    }

    pub fn with_progress(mut self, progress: Arc<dyn PlannerProgressNotifier>) -> Self {
        self.progress = progress;
        self
    }
}

#[async_trait]
impl ToolHandler for AutomationHandler {
    async fn call(&self, call: &ToolCall) -> Result<String, HandlerError> {
        let goal = call
            .get_string("goal")
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .ok_or_else(|| HandlerError::InvalidArgument("Missing required argument: goal".to_string()))?;

        let registry = self
            .registry
            .upgrade()
            .ok_or_else(|| HandlerError::Failed("tool registry is no longer available".to_string()))?;
        let tools: Arc<dyn ToolExecutorPort> = registry;

        let outcome = RunPlannerUseCase::new(self.gateway.clone(), tools, self.config.clone())
            .with_progress(self.progress.clone())
            .execute(goal)
            .await;

        info!(
            termination = outcome.phase().as_str(),
            iterations = outcome.iterations,
            "Automation finished"
        );
        Ok(outcome.summary)
    }
}
