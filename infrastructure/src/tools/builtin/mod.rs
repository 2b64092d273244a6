//! In-process tools
//!
//! - [`synthesize_content`](synthesize): summary of raw material by the synthesis model
//! - [`run_automation`](automation): the autonomous planner, dispatching through the
//!   registry that hosts it

mod automation;
mod synthesize;

pub use automation::{AutomationHandler, RUN_AUTOMATION, run_automation_definition};
pub use synthesize::{SYNTHESIZE_CONTENT, SynthesizeContentHandler, synthesize_content_definition};

use std::sync::{Arc, Weak};
use steward_application::config::PlannerConfig;
use steward_application::ports::llm_gateway::LlmGateway;
use steward_application::ports::progress::{NoPlannerProgress, PlannerProgressNotifier};
use steward_domain::Model;

use crate::tools::registry::ToolRegistry;

/// Everything the built-in handlers need
pub struct BuiltinTools {
    pub gateway: Arc<dyn LlmGateway>,
    pub synthesis_model: Model,
    pub planner: PlannerConfig,
    pub progress: Arc<dyn PlannerProgressNotifier>,
}

impl BuiltinTools {
    pub fn new(gateway: Arc<dyn LlmGateway>, synthesis_model: Model, planner: PlannerConfig) -> Self {
        Self {
            gateway,
            synthesis_model,
            planner,
            progress: Arc::new(NoPlannerProgress),
        }
    }

    pub fn with_progress(mut self, progress: Arc<dyn PlannerProgressNotifier>) -> Self {
        self.progress = progress;
        self
    }

    /// Register both handlers on `registry`; `weak` must point at that same registry.
    pub fn register(self, registry: &mut ToolRegistry, weak: &Weak<ToolRegistry>) {
        registry.register_internal(
            synthesize_content_definition(),
            Arc::new(SynthesizeContentHandler::new(
                self.gateway.clone(),
                self.synthesis_model,
            )),
        );
        registry.register_internal(
            run_automation_definition(),
            Arc::new(
                AutomationHandler::new(weak.clone(), self.gateway, self.planner)
                    .with_progress(self.progress),
            ),
        );
    }
}
