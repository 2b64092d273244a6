//! Model server connection from TOML (`[ollama]` section)

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::ollama::DEFAULT_BASE_URL;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOllamaConfig {
    pub base_url: String,
    /// Per-request timeout; absent means no limit
    pub timeout_seconds: Option<u64>,
}

impl Default for FileOllamaConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_seconds: Some(120),
        }
    }
}

impl FileOllamaConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }
}
