//! Domain layer for steward
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Intent
//!
//! A structured interpretation of one free-text command. Intents come from
//! three tiers of increasing cost: deterministic [`intent::rules`], fuzzy
//! device matching ([`intent::fuzzy`]), and model generation decoded by
//! [`intent::payload`].
//!
//! ## Tool
//!
//! Every capability, in-process or served by a backend process, is a
//! [`ToolDefinition`] in one catalogue and answers with a [`ToolResult`].
//!
//! ## Planner
//!
//! A bounded loop that asks a model for the next tool call, records each
//! step in an [`ExecutionHistory`], and stops on a terminal marker, a
//! successful finalize tool, or budget exhaustion.

pub mod core;
pub mod intent;
pub mod parsing;
pub mod planner;
pub mod prompt;
pub mod session;
pub mod tool;
pub mod util;

// Re-export commonly used types
pub use core::model::Model;
pub use intent::{DEFAULT_CONFIDENCE, EntityRegistry, Intent, IntentType};
pub use parsing::{ParseTier, TolerantParser};
pub use planner::{
    ExecutionHistory, HistoryEntry, PlannerDecision, PlannerOutcome, PlannerPhase, PlannerStage,
    StagePipeline, StepOutcome, Termination,
};
pub use prompt::{PlannerPrompt, PlannerPromptInput, ResolverPrompt, SynthesisPrompt};
pub use session::{Message, Role};
pub use tool::{
    HandlerError, ToolCall, ToolDefinition, ToolError, ToolHandler, ToolParameter, ToolResult,
    ToolSpec,
};
