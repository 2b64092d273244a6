//! Autonomous planner domain module
//!
//! State and rules of the bounded plan → execute → record loop. The loop
//! itself, which talks to the model and the dispatcher, is the application
//! layer's `RunPlannerUseCase`.

pub mod decision;
pub mod entities;
pub mod stages;

pub use decision::PlannerDecision;
pub use entities::{
    ExecutionHistory, HistoryEntry, PlannerOutcome, PlannerPhase, StepOutcome, Termination,
};
pub use stages::{PlannerStage, StagePipeline};
