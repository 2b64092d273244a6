//! External tools and their backends (`[backends]`, `[tools]` sections)
//!
//! ```toml
//! [backends.docker]
//! command = "docker"
//! args = ["run", "-i", "--rm", "-v", "/var/run/docker.sock:/var/run/docker.sock", "mcp/docker"]
//!
//! [backends.brave]
//! command = "npx"
//! args = ["-y", "@modelcontextprotocol/server-brave-search"]
//! env = { BRAVE_API_KEY = "..." }
//!
//! [tools]
//! include_defaults = true
//!
//! [tools.external.get_weather]
//! description = "Current weather for a city"
//! backend = "weather"
//! parameters = { city = { type = "string", description = "City name" } }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use steward_domain::{ToolDefinition, ToolParameter};

use crate::tools::default_external_tools;

/// One parameter of a configured external tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileToolParameter {
    /// "string", "number", "integer", "boolean", "array" or "object"
    #[serde(rename = "type", default = "default_string_type")]
    pub param_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_true")]
    pub required: bool,
}

fn default_string_type() -> String {
    "string".to_string()
}

fn default_true() -> bool {
    true
}

/// An external tool declared in config
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileExternalToolConfig {
    #[serde(default)]
    pub description: String,
    /// Key into `[backends]`
    pub backend: String,
    /// Name the backend exposes, when it differs from the table key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_name: Option<String>,
    #[serde(default)]
    pub parameters: BTreeMap<String, FileToolParameter>,
}

impl FileExternalToolConfig {
    pub fn to_definition(&self, name: &str) -> ToolDefinition {
        let mut definition = ToolDefinition::new(name, &self.description).with_backend(self.backend.trim());
        if let Some(remote) = self.remote_name.as_deref().filter(|r| !r.trim().is_empty()) {
            definition = definition.with_remote_name(remote.trim());
        }
        self.parameters.iter().fold(definition, |def, (param_name, param)| {
            def.with_parameter(
                ToolParameter::new(param_name, &param.description, param.required)
                    .with_type(&param.param_type),
            )
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileToolsConfig {
    /// Start from the built-in external catalogue
    pub include_defaults: bool,
    /// Extra tools; a name matching a default replaces it
    pub external: BTreeMap<String, FileExternalToolConfig>,
}

impl Default for FileToolsConfig {
    fn default() -> Self {
        Self {
            include_defaults: true,
            external: BTreeMap::new(),
        }
    }
}

impl FileToolsConfig {
    /// External definitions in registration order: defaults, then configured ones
    pub fn external_tools(&self) -> Vec<ToolDefinition> {
        let defaults = if self.include_defaults {
            default_external_tools()
        } else {
            Vec::new()
        };
        defaults
            .into_iter()
            .chain(self.external.iter().map(|(name, tool)| tool.to_definition(name)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_tool_definition() {
        let toml_str = r#"
[external.get_weather]
description = "Current weather"
backend = "weather"
remote_name = "weather_now"
parameters = { city = { type = "string", description = "City name" }, days = { type = "integer", required = false } }
"#;
        let config: FileToolsConfig = toml::from_str(toml_str).unwrap();
        let tools = config.external_tools();
        let weather = tools.last().unwrap();

        assert_eq!(weather.name, "get_weather");
        assert_eq!(weather.backend.as_deref(), Some("weather"));
        assert_eq!(weather.wire_name(), "weather_now");
        assert_eq!(weather.parameters.len(), 2);
        assert_eq!(weather.parameters[0].name, "city");
        assert!(weather.parameters[0].required);
        assert_eq!(weather.parameters[1].param_type, "integer");
        assert!(!weather.parameters[1].required);
    }

    #[test]
    fn test_defaults_can_be_disabled() {
        let config = FileToolsConfig {
            include_defaults: false,
            ..Default::default()
        };
        assert!(config.external_tools().is_empty());
        assert_eq!(
            FileToolsConfig::default().external_tools().len(),
            default_external_tools().len()
        );
    }
}
