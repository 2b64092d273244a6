//! Configuration file loading for steward
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `STEWARD_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./steward.toml` or `./.steward.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/steward/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileConfig, FileExternalToolConfig, FileModelsConfig,
    FileOllamaConfig, FileOutputConfig, FilePlannerConfig, FileReplConfig, FileResolverConfig,
    FileToolParameter, FileToolsConfig,
};
pub use loader::ConfigLoader;
