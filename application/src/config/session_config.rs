//! Command session parameters.

use serde::{Deserialize, Serialize};

/// Configuration for [`CommandSessionUseCase`](crate::use_cases::command_session::CommandSessionUseCase).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Intents below this confidence are skipped (inclusive bound)
    pub confidence_threshold: f64,
    /// Pipe a fetched transcript into an immediately following note
    pub transcript_piping: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.6,
            transcript_piping: true,
        }
    }
}

impl SessionConfig {
    pub fn with_confidence_threshold(mut self, threshold: f64) -> Self {
        self.confidence_threshold = threshold;
        self
    }

    pub fn with_transcript_piping(mut self, enabled: bool) -> Self {
        self.transcript_piping = enabled;
        self
    }
}
