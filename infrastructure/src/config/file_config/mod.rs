//! Raw TOML configuration data types
//!
//! These structs mirror the config file one section per module. They are
//! deserialized directly and converted into the application's config objects
//! by the `to_*` methods.

mod models;
mod ollama;
mod output;
mod planner;
mod repl;
mod resolver;
mod tools;

pub use models::FileModelsConfig;
pub use ollama::FileOllamaConfig;
pub use output::FileOutputConfig;
pub use planner::FilePlannerConfig;
pub use repl::FileReplConfig;
pub use resolver::FileResolverConfig;
pub use tools::{FileExternalToolConfig, FileToolParameter, FileToolsConfig};

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use steward_application::config::{PlannerConfig, ResolverConfig, SessionConfig};
use steward_domain::{EntityRegistry, ToolDefinition};
use thiserror::Error;

use crate::mcp::BackendCommand;

/// Errors found while validating a merged configuration
#[derive(Error, Debug, PartialEq)]
pub enum ConfigValidationError {
    #[error("planner.max_steps cannot be 0")]
    ZeroMaxSteps,

    #[error("ollama.timeout_seconds cannot be 0")]
    InvalidTimeout,

    #[error("models.{0}: model name cannot be empty")]
    EmptyModelName(&'static str),

    #[error("resolver.confidence_threshold must be within 0..=1, got {0}")]
    InvalidThreshold(f64),

    #[error("backends.{0}: command cannot be empty")]
    BackendWithoutCommand(String),

    #[error("tools.external.{0}: backend cannot be empty")]
    ToolWithoutBackend(String),
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub models: FileModelsConfig,
    pub ollama: FileOllamaConfig,
    pub resolver: FileResolverConfig,
    pub planner: FilePlannerConfig,
    /// Backend tag -> launcher
    pub backends: HashMap<String, BackendCommand>,
    pub tools: FileToolsConfig,
    /// Friendly device name -> entity id
    pub entities: BTreeMap<String, String>,
    pub output: FileOutputConfig,
    pub repl: FileReplConfig,
}

impl FileConfig {
    /// Validate the configuration, returning the first problem found
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.planner.max_steps == 0 {
            return Err(ConfigValidationError::ZeroMaxSteps);
        }

        if let Some(0) = self.ollama.timeout_seconds {
            return Err(ConfigValidationError::InvalidTimeout);
        }

        if let Some(role) = self.models.first_empty() {
            return Err(ConfigValidationError::EmptyModelName(role));
        }

        let threshold = self.resolver.confidence_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ConfigValidationError::InvalidThreshold(threshold));
        }

        let mut backends: Vec<_> = self.backends.iter().collect();
        backends.sort_by_key(|(name, _)| name.as_str());
        if let Some((name, _)) = backends.iter().find(|(_, b)| b.command.trim().is_empty()) {
            return Err(ConfigValidationError::BackendWithoutCommand(name.to_string()));
        }

        if let Some((name, _)) = self
            .tools
            .external
            .iter()
            .find(|(_, tool)| tool.backend.trim().is_empty())
        {
            return Err(ConfigValidationError::ToolWithoutBackend(name.clone()));
        }

        Ok(())
    }

    pub fn to_resolver_config(&self) -> ResolverConfig {
        self.resolver.to_resolver_config(&self.models)
    }

    pub fn to_session_config(&self) -> SessionConfig {
        self.resolver.to_session_config()
    }

    pub fn to_planner_config(&self) -> PlannerConfig {
        self.planner.to_planner_config(&self.models)
    }

    pub fn entity_registry(&self) -> EntityRegistry {
        self.entities
            .iter()
            .map(|(name, id)| (name.as_str(), id.as_str()))
            .collect()
    }

    pub fn external_tools(&self) -> Vec<ToolDefinition> {
        self.tools.external_tools()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[models]
fast = "phi3"
smart = "llama3.1:70b"

[ollama]
base_url = "http://gpu-box:11434"
timeout_seconds = 30

[resolver]
confidence_threshold = 0.75

[planner]
max_steps = 5

[backends.docker]
command = "docker"
args = ["run", "-i", "--rm", "mcp/docker"]

[backends.brave]
command = "npx"
env = { BRAVE_API_KEY = "secret" }

[entities]
"kitchen lights" = "light.kitchen"
tv = "media_player.living_room"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert!(config.validate().is_ok());

        let resolver = config.to_resolver_config();
        assert_eq!(resolver.fast_model.as_str(), "phi3");
        assert_eq!(resolver.smart_model.as_str(), "llama3.1:70b");
        assert_eq!(config.to_session_config().confidence_threshold, 0.75);
        assert_eq!(config.to_planner_config().max_steps, 5);
        assert_eq!(config.to_planner_config().model.as_str(), "llama3.1:70b");
        assert_eq!(config.ollama.timeout(), Some(std::time::Duration::from_secs(30)));

        assert_eq!(config.backends["docker"].args.len(), 4);
        assert_eq!(config.backends["brave"].env["BRAVE_API_KEY"], "secret");

        let entities = config.entity_registry();
        assert_eq!(entities.get("tv"), Some("media_player.living_room"));
        assert_eq!(entities.len(), 2);
    }

    #[test]
    fn test_default_config() {
        let config = FileConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.to_resolver_config(), ResolverConfig::default());
        assert_eq!(config.to_session_config(), SessionConfig::default());
        assert!(config.backends.is_empty());
        assert!(config.entity_registry().is_empty());
        assert!(config.output.color);
    }

    #[test]
    fn test_validate_zero_max_steps() {
        let config: FileConfig = toml::from_str("[planner]\nmax_steps = 0").unwrap();
        assert_eq!(config.validate(), Err(ConfigValidationError::ZeroMaxSteps));
    }

    #[test]
    fn test_validate_empty_model_name() {
        let config: FileConfig = toml::from_str("[models]\nsmart = \"\"").unwrap();
        assert_eq!(
            config.validate(),
            Err(ConfigValidationError::EmptyModelName("smart"))
        );
    }

    #[test]
    fn test_validate_backend_without_command() {
        let config: FileConfig = toml::from_str("[backends.youtube]\nargs = [\"x\"]").unwrap();
        assert_eq!(
            config.validate(),
            Err(ConfigValidationError::BackendWithoutCommand("youtube".to_string()))
        );
    }

    #[test]
    fn test_validate_threshold_range() {
        let config: FileConfig = toml::from_str("[resolver]\nconfidence_threshold = 1.5").unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::InvalidThreshold(_))
        ));
    }

    #[test]
    fn test_default_round_trips_through_toml() {
        let text = toml::to_string(&FileConfig::default()).unwrap();
        let parsed: FileConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, FileConfig::default());
    }
}
