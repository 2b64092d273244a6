//! Application-level configuration.
//!
//! Explicit configuration objects passed to use cases at construction:
//!
//! - [`ResolverConfig`]: model tiers, device cap, fuzzy cutoff
//! - [`PlannerConfig`]: step budget, history cap, termination rules, stages
//! - [`SessionConfig`]: confidence gate and transcript piping

pub mod planner_config;
pub mod resolver_config;
pub mod session_config;

pub use planner_config::PlannerConfig;
pub use resolver_config::ResolverConfig;
pub use session_config::SessionConfig;
