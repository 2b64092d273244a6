//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod command_session;
pub mod resolve_intent;
pub mod run_planner;

#[cfg(test)]
pub(crate) mod test_support;
