//! Resolver parameters: tiers, models and limits.

use serde::{Deserialize, Serialize};
use steward_domain::Model;

/// Configuration for [`ResolveIntentUseCase`](crate::use_cases::resolve_intent::ResolveIntentUseCase).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Model asked first in the generation tier
    pub fast_model: Model,
    /// Model asked once when the fast model yields no parseable payload
    pub smart_model: Model,
    /// Maximum number of device names shown to the model
    pub device_cap: usize,
    /// Minimum similarity for a fuzzy device match
    pub fuzzy_cutoff: f64,
    /// Maximum bytes of prior tool output passed as context
    pub context_cap: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            fast_model: Model::default_fast(),
            smart_model: Model::default_smart(),
            device_cap: 50,
            fuzzy_cutoff: 0.6,
            context_cap: 4000,
        }
    }
}

impl ResolverConfig {
    pub fn with_fast_model(mut self, model: Model) -> Self {
        self.fast_model = model;
        self
    }

    pub fn with_smart_model(mut self, model: Model) -> Self {
        self.smart_model = model;
        self
    }

    pub fn with_device_cap(mut self, cap: usize) -> Self {
        self.device_cap = cap;
        self
    }

    pub fn with_fuzzy_cutoff(mut self, cutoff: f64) -> Self {
        self.fuzzy_cutoff = cutoff;
        self
    }

    pub fn with_context_cap(mut self, cap: usize) -> Self {
        self.context_cap = cap;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let config = ResolverConfig::default();
        assert_eq!(config.fast_model.as_str(), "llama3.1:latest");
        assert_eq!(config.smart_model.as_str(), "llama3.1");
        assert_eq!(config.device_cap, 50);
        assert_eq!(config.fuzzy_cutoff, 0.6);
    }

    #[test]
    fn test_builder() {
        let config = ResolverConfig::default()
            .with_fast_model(Model::new("phi3"))
            .with_device_cap(5);
        assert_eq!(config.fast_model.as_str(), "phi3");
        assert_eq!(config.device_cap, 5);
    }
}
