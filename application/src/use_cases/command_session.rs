//! Command Session use case.
//!
//! One interactive session: each command is resolved into intents, and every
//! intent is gated on confidence and then carried out, either as a tool call
//! through the dispatcher or as a device action through the
//! [`DeviceControllerPort`].
//!
//! The session remembers the last tool output. It is passed to the resolver
//! as context for the next command, and a fetched video transcript is piped
//! into a note created right after it.

use crate::config::SessionConfig;
use crate::ports::device_controller::{DeviceCommand, DeviceControllerPort};
use crate::ports::tool_executor::ToolExecutorPort;
use crate::use_cases::resolve_intent::{ResolutionOutcome, ResolveIntentUseCase};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use steward_domain::tool::note::is_note_creation_tool;
use steward_domain::{EntityRegistry, Intent, ToolCall, ToolResult};
use tracing::{debug, info, warn};

/// Tool whose output can be piped into a following note
const TRANSCRIPT_TOOL: &str = "get_transcript";
const VIDEO_TITLE_SUFFIX: &str = " - YouTube";

/// What happened to one intent
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IntentOutcome {
    /// Not acted on
    Skipped { reason: String },
    /// Dispatched to a tool
    Tool { result: ToolResult },
    /// Sent to the device controller
    Device {
        target: String,
        action: String,
        result: Result<String, String>,
    },
    /// The intent named a tool the catalogue does not have
    UnknownTool { tool_name: String },
    /// A note was not created because the transcript before it failed
    Aborted { tool_name: String, reason: String },
}

/// Everything that happened for one command
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandReport {
    pub command: String,
    pub resolution: ResolutionOutcome,
    pub intents: Vec<Intent>,
    /// One entry per intent, same order
    pub outcomes: Vec<IntentOutcome>,
}

impl CommandReport {
    /// Text of the last successful tool call, if any
    pub fn last_output(&self) -> Option<&str> {
        self.outcomes.iter().rev().find_map(|o| match o {
            IntentOutcome::Tool { result } if result.is_success() => result.output(),
            _ => None,
        })
    }
}

#[derive(Debug, Clone)]
struct LastToolOutput {
    tool_name: String,
    success: bool,
    text: String,
}

#[derive(Deserialize)]
/// A transcript payload is only used when it carries both fields
struct TranscriptPayload {
    title: String,
    transcript: String,
}

/// Use case for a stateful command session
pub struct CommandSessionUseCase {
    resolver: ResolveIntentUseCase,
    tools: Arc<dyn ToolExecutorPort>,
    devices: Arc<dyn DeviceControllerPort>,
    config: SessionConfig,
    last_tool: Option<LastToolOutput>,
}

impl CommandSessionUseCase {
    pub fn new(
        resolver: ResolveIntentUseCase,
        tools: Arc<dyn ToolExecutorPort>,
        devices: Arc<dyn DeviceControllerPort>,
        config: SessionConfig,
    ) -> Self {
        Self {
            resolver,
            tools,
            devices,
            config,
            last_tool: None,
        }
    }

    /// Output of the most recent tool call in this session
    pub fn last_output(&self) -> Option<&str> {
        self.last_tool.as_ref().map(|t| t.text.as_str())
    }

    /// Resolve and carry out one command.
    pub async fn handle(&mut self, command: &str, entities: &EntityRegistry) -> CommandReport {
        let context = self.last_tool.as_ref().map(|t| t.text.clone());
        let resolution = self
            .resolver
            .resolve(command, entities, context.as_deref())
            .await;

        let mut outcomes = Vec::with_capacity(resolution.intents.len());
        for intent in &resolution.intents {
            let outcome = self.apply(intent, entities).await;
            debug!(outcome = ?outcome, "Intent handled");
            outcomes.push(outcome);
        }

        CommandReport {
            command: command.trim().to_string(),
            resolution: resolution.outcome,
            intents: resolution.intents,
            outcomes,
        }
    }

    async fn apply(&mut self, intent: &Intent, entities: &EntityRegistry) -> IntentOutcome {
        if !intent.meets_threshold(self.config.confidence_threshold) {
            info!(
                confidence = intent.confidence,
                threshold = self.config.confidence_threshold,
                "Skipping low-confidence intent"
            );
            return IntentOutcome::Skipped {
                reason: format!(
                    "confidence {:.2} is below {:.2}",
                    intent.confidence, self.config.confidence_threshold
                ),
            };
        }

        if let Some(call) = intent.to_tool_call() {
            return self.dispatch(call).await;
        }

        match (&intent.target_device, &intent.action) {
            (Some(target), Some(action)) => self.control(intent, target, action, entities).await,
            _ => IntentOutcome::Skipped {
                reason: "nothing to act on".to_string(),
            },
        }
    }

    async fn dispatch(&mut self, mut call: ToolCall) -> IntentOutcome {
        if !self.tools.has_tool(&call.tool_name) {
            warn!(tool = %call.tool_name, "Intent names an unknown tool");
            return IntentOutcome::UnknownTool {
                tool_name: call.tool_name,
            };
        }

        if self.config.transcript_piping
            && let Err(reason) = self.pipe_transcript(&mut call)
        {
            warn!(tool = %call.tool_name, %reason, "Note creation aborted");
            return IntentOutcome::Aborted {
                tool_name: call.tool_name,
                reason,
            };
        }

        let result = self.tools.execute(&call).await;
        self.last_tool = Some(LastToolOutput {
            tool_name: call.tool_name.clone(),
            success: result.is_success(),
            text: result.text(),
        });
        IntentOutcome::Tool { result }
    }

    /// Fill a note from the transcript fetched right before it.
    fn pipe_transcript(&self, call: &mut ToolCall) -> Result<(), String> {
        let Some(last) = &self.last_tool else {
            return Ok(());
        };
        if last.tool_name != TRANSCRIPT_TOOL || !is_note_creation_tool(&call.tool_name) {
            return Ok(());
        }

        let lowered = last.text.to_lowercase();
        if !last.success || lowered.contains("error") || lowered.contains("could not retrieve") {
            return Err("the transcript could not be fetched, so no note was created".to_string());
        }

        match serde_json::from_str::<TranscriptPayload>(&last.text) {
            Ok(payload) => {
                call.arguments
                    .insert("content".to_string(), payload.transcript.into());
                let title = payload.title.trim_end_matches(VIDEO_TITLE_SUFFIX).trim();
                if !title.is_empty() {
                    call.arguments.insert("title".to_string(), title.into());
                }
            }
            Err(_) => {
                let has_content = call
                    .get_string("content")
                    .is_some_and(|c| !c.trim().is_empty());
                if !has_content {
                    call.arguments
                        .insert("content".to_string(), last.text.clone().into());
                }
            }
        }
        debug!("Piped transcript into note");
        Ok(())
    }

    async fn control(
        &self,
        intent: &Intent,
        target: &str,
        action: &str,
        entities: &EntityRegistry,
    ) -> IntentOutcome {
        let entity_id = intent
            .arguments
            .get("entity_id")
            .and_then(|v| v.as_str())
            .or_else(|| entities.get(target))
            .map(str::to_string);

        let command = DeviceCommand {
            target: target.to_string(),
            entity_id,
            action: action.to_string(),
            arguments: intent.arguments.clone(),
        };
        let result = self
            .devices
            .apply(&command)
            .await
            .map_err(|e| e.to_string());
        if let Err(e) = &result {
            warn!(device = target, action, error = %e, "Device action failed");
        }

        IntentOutcome::Device {
            target: command.target,
            action: command.action,
            result,
        }
    }
}
