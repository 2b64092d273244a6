//! Intent resolution and command session settings (`[resolver]` section)

use serde::{Deserialize, Serialize};
use steward_application::config::{ResolverConfig, SessionConfig};

use super::models::FileModelsConfig;

/// Raw resolver configuration from TOML
///
/// # Example
///
/// ```toml
/// [resolver]
/// device_cap = 50
/// confidence_threshold = 0.6
/// context_cap = 4000
/// fuzzy_cutoff = 0.6
/// transcript_piping = true
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileResolverConfig {
    pub device_cap: usize,
    pub confidence_threshold: f64,
    pub context_cap: usize,
    pub fuzzy_cutoff: f64,
    pub transcript_piping: bool,
}

impl Default for FileResolverConfig {
    fn default() -> Self {
        let resolver = ResolverConfig::default();
        let session = SessionConfig::default();
        Self {
            device_cap: resolver.device_cap,
            confidence_threshold: session.confidence_threshold,
            context_cap: resolver.context_cap,
            fuzzy_cutoff: resolver.fuzzy_cutoff,
            transcript_piping: session.transcript_piping,
        }
    }
}

impl FileResolverConfig {
    pub fn to_resolver_config(&self, models: &FileModelsConfig) -> ResolverConfig {
        ResolverConfig::default()
            .with_fast_model(models.fast_model())
            .with_smart_model(models.smart_model())
            .with_device_cap(self.device_cap)
            .with_fuzzy_cutoff(self.fuzzy_cutoff)
            .with_context_cap(self.context_cap)
    }

    pub fn to_session_config(&self) -> SessionConfig {
        SessionConfig::default()
            .with_confidence_threshold(self.confidence_threshold)
            .with_transcript_piping(self.transcript_piping)
    }
}
