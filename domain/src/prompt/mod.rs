//! Prompt templates
//!
//! Plain string builders with no I/O, kept apart from the code that sends
//! them so wording can change without touching control flow.

pub mod planner;
pub mod resolver;
pub mod synthesis;

pub use planner::{PlannerPrompt, PlannerPromptInput};
pub use resolver::ResolverPrompt;
pub use synthesis::SynthesisPrompt;
