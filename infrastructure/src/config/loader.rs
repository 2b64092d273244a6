//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

/// File names looked up in the working directory, first match wins
const PROJECT_FILES: &[&str] = &["steward.toml", ".steward.toml"];

/// Prefix of environment overrides; `__` separates nesting levels
const ENV_PREFIX: &str = "STEWARD_";

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `STEWARD_*` environment variables (`STEWARD_MODELS__FAST=phi3`)
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./steward.toml` or `./.steward.toml`
    /// 4. Global: `$XDG_CONFIG_HOME/steward/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        Self::figment(
            Self::global_config_path().as_deref(),
            Self::project_config_path().as_deref(),
            config_path.map(PathBuf::as_path),
        )
        .extract()
        .map_err(Box::new)
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    fn figment(global: Option<&Path>, project: Option<&Path>, explicit: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        for path in [global, project].into_iter().flatten() {
            if path.exists() {
                figment = figment.merge(Toml::file(path));
            }
        }

        // An explicit path that does not exist is an error, not a silent skip.
        if let Some(path) = explicit {
            figment = figment.merge(Toml::file(path).required(true));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Get the global config file path
    ///
    /// `$XDG_CONFIG_HOME/steward/config.toml`, or the platform equivalent
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("steward").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Print the config file locations being used (for debugging)
    pub fn print_config_sources(config_path: Option<&PathBuf>) {
        println!("Configuration sources (in priority order):");

        println!("  [ENV  ] Environment: {}*", ENV_PREFIX);

        if let Some(path) = config_path {
            let mark = if path.exists() { "FOUND" } else { "MISSING" };
            println!("  [{:<5}] Explicit: {}", mark, path.display());
        }

        if let Some(path) = Self::project_config_path() {
            println!("  [FOUND] Project: {}", path.display());
        } else {
            println!("  [     ] Project: ./steward.toml or ./.steward.toml");
        }

        if let Some(path) = Self::global_config_path() {
            let mark = if path.exists() { "FOUND" } else { "" };
            println!("  [{:<5}] Global:  {}", mark, path.display());
        }

        println!("  [     ] Default: built-in defaults");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_toml(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn extract(global: Option<&Path>, project: Option<&Path>, explicit: Option<&Path>) -> FileConfig {
        ConfigLoader::figment(global, project, explicit)
            .extract()
            .unwrap()
    }

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config.planner.max_steps, 7);
        assert!(config.backends.is_empty());
    }

    #[test]
    fn test_later_sources_override_earlier() {
        let global = write_toml("[models]\nfast = \"phi3\"\nsmart = \"llama3.1:70b\"\n");
        let project = write_toml("[models]\nfast = \"gemma2\"\n");
        let explicit = write_toml("[planner]\nmax_steps = 3\n");

        let config = extract(Some(global.path()), Some(project.path()), Some(explicit.path()));

        assert_eq!(config.models.fast, "gemma2");
        assert_eq!(config.models.smart, "llama3.1:70b");
        assert_eq!(config.planner.max_steps, 3);
        assert_eq!(config.planner.history_entry_cap, 3000);
    }

    #[test]
    fn test_missing_optional_files_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let absent = dir.path().join("config.toml");
        let config = extract(Some(&absent), None, None);
        assert_eq!(config, FileConfig::default());
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let absent = dir.path().join("steward.toml");
        let result: Result<FileConfig, _> = ConfigLoader::figment(None, None, Some(&absent)).extract();
        assert!(result.is_err());
    }

    #[test]
    fn test_backends_from_file() {
        let file = write_toml(
            r#"
[backends.youtube]
command = "/opt/mcp/youtube.sh"

[entities]
tv = "media_player.tv"
"#,
        );
        let config = extract(None, None, Some(file.path()));
        assert_eq!(config.backends["youtube"].command, "/opt/mcp/youtube.sh");
        assert_eq!(config.entity_registry().get("tv"), Some("media_player.tv"));
    }

    #[test]
    fn test_global_config_path_returns_some() {
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        assert!(path.unwrap().to_string_lossy().contains("steward"));
    }
}
