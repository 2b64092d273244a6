//! Resolve Intent use case.
//!
//! Turns one free-text command into a list of [`Intent`]s by trying three
//! tiers in order of cost and stopping at the first that produces intents:
//!
//! 1. deterministic pattern rules (no model call)
//! 2. fuzzy device match against the [`EntityRegistry`] (no model call)
//! 3. model generation: the fast model first, the smart model once if the
//!    fast model yields nothing parseable
//!
//! Resolution never fails. Unparseable model output and gateway errors are
//! logged and surface as [`ResolutionOutcome::Unresolved`].

use crate::config::ResolverConfig;
use crate::ports::llm_gateway::LlmGateway;
use crate::ports::tool_executor::ToolExecutorPort;
use serde::Serialize;
use std::sync::Arc;
use steward_domain::intent::{decode_intents, fuzzy, restore_url_case, rules};
use steward_domain::tool::note::{ensure_note_fields, is_note_creation_tool};
use steward_domain::util::truncate_str;
use steward_domain::{EntityRegistry, Intent, Message, Model, ResolverPrompt, TolerantParser};
use tracing::{debug, info, warn};

/// Which tier produced the intents
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "tier", rename_all = "snake_case")]
pub enum ResolutionTier {
    /// A deterministic rule matched
    Pattern { rule: &'static str },
    /// A registry device matched with this similarity
    Fuzzy { score: f64 },
    /// A model produced the payload
    Model { model: Model },
}

/// How resolution ended
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ResolutionOutcome {
    Matched(ResolutionTier),
    /// A model answered with a valid but empty payload (the user was chatting)
    NoIntent,
    /// No tier produced a usable payload
    Unresolved,
}

/// Result of resolving one command
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolution {
    pub intents: Vec<Intent>,
    pub outcome: ResolutionOutcome,
    /// Number of model requests spent
    pub model_calls: usize,
}

impl Resolution {
    fn matched(tier: ResolutionTier, intents: Vec<Intent>, model_calls: usize) -> Self {
        Self {
            intents,
            outcome: ResolutionOutcome::Matched(tier),
            model_calls,
        }
    }

    fn empty(outcome: ResolutionOutcome, model_calls: usize) -> Self {
        Self {
            intents: Vec::new(),
            outcome,
            model_calls,
        }
    }

    pub fn is_matched(&self) -> bool {
        matches!(self.outcome, ResolutionOutcome::Matched(_))
    }
}

/// Use case for resolving commands into intents
pub struct ResolveIntentUseCase {
    gateway: Arc<dyn LlmGateway>,
    tools: Arc<dyn ToolExecutorPort>,
    config: ResolverConfig,
    parser: TolerantParser,
}

impl Clone for ResolveIntentUseCase {
    fn clone(&self) -> Self {
        Self {
            gateway: self.gateway.clone(),
            tools: self.tools.clone(),
            config: self.config.clone(),
            parser: self.parser.clone(),
        }
    }
}

impl ResolveIntentUseCase {
    pub fn new(
        gateway: Arc<dyn LlmGateway>,
        tools: Arc<dyn ToolExecutorPort>,
        config: ResolverConfig,
    ) -> Self {
        Self {
            gateway,
            tools,
            config,
            parser: TolerantParser::new(),
        }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve `command`. `context` is prior tool output the model may refer to.
    pub async fn resolve(
        &self,
        command: &str,
        entities: &EntityRegistry,
        context: Option<&str>,
    ) -> Resolution {
        let command = command.trim();
        if command.is_empty() {
            return Resolution::empty(ResolutionOutcome::NoIntent, 0);
        }

        if let Some((rule, intent)) = rules::match_rules(command) {
            debug!(rule, "Resolved by pattern rule");
            return Resolution::matched(ResolutionTier::Pattern { rule }, vec![intent], 0);
        }

        if let Some(intent) = fuzzy::match_entity(command, entities, self.config.fuzzy_cutoff) {
            let score = intent.confidence;
            debug!(
                device = intent.target_device.as_deref().unwrap_or_default(),
                score, "Resolved by fuzzy device match"
            );
            return Resolution::matched(ResolutionTier::Fuzzy { score }, vec![intent], 0);
        }

        self.generate(command, entities, context).await
    }

    async fn generate(
        &self,
        command: &str,
        entities: &EntityRegistry,
        context: Option<&str>,
    ) -> Resolution {
        let devices: Vec<&str> = entities.names().take(self.config.device_cap).collect();
        let context = context.map(|c| truncate_str(c, self.config.context_cap));
        let system = ResolverPrompt::system(self.tools.tool_spec(), &devices, context);
        let messages = [Message::system(system), Message::user(command)];

        let mut calls = 0;
        for model in [&self.config.fast_model, &self.config.smart_model] {
            calls += 1;
            let reply = match self.gateway.chat(model, &messages).await {
                Ok(reply) => reply,
                Err(e) => {
                    warn!(model = %model, error = %e, "Intent generation request failed");
                    continue;
                }
            };

            match self.parser.parse(&reply) {
                Some(parsed) => {
                    debug!(model = %model, tier = ?parsed.tier, "Parsed intent payload");
                    return self.finish(command, parsed.value, model, calls);
                }
                None => warn!(
                    model = %model,
                    reply = truncate_str(&reply, 200),
                    "No parseable intent payload in reply"
                ),
            }
        }

        info!(command, "Command could not be resolved");
        Resolution::empty(ResolutionOutcome::Unresolved, calls)
    }

    fn finish(
        &self,
        command: &str,
        payload: serde_json::Value,
        model: &Model,
        calls: usize,
    ) -> Resolution {
        let decoded = decode_intents(payload);
        if decoded.malformed > 0 {
            warn!(dropped = decoded.malformed, "Dropped malformed intent elements");
        }

        let mut intents = decoded.intents;
        let now = chrono::Utc::now().timestamp();
        for intent in intents.iter_mut() {
            if intent
                .tool_name
                .as_deref()
                .is_some_and(is_note_creation_tool)
            {
                ensure_note_fields(&mut intent.arguments, now);
            }
        }

        let restored = restore_url_case(command, &mut intents);
        if restored > 0 {
            debug!(restored, "Restored URL case");
        }

        if intents.is_empty() {
            Resolution::empty(ResolutionOutcome::NoIntent, calls)
        } else {
            Resolution::matched(
                ResolutionTier::Model {
                    model: model.clone(),
                },
                intents,
                calls,
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::{MockToolExecutor, ScriptedGateway, ScriptedReply, text};
    use steward_domain::IntentType;

    const FAST: &str = "llama3.1:latest";
    const SMART: &str = "llama3.1";

    fn use_case(gateway: Arc<ScriptedGateway>) -> ResolveIntentUseCase {
        let tools = Arc::new(MockToolExecutor::new(&[
            "list_containers",
            "create_note",
            "get_transcript",
        ]));
        ResolveIntentUseCase::new(gateway, tools, ResolverConfig::default())
    }

    fn registry() -> EntityRegistry {
        EntityRegistry::new()
            .with_entity("kitchen lights", "light.kitchen")
            .with_entity("bedroom fan", "fan.bedroom")
    }

    #[tokio::test]
    async fn test_pattern_rule_makes_no_model_call() {
        let gateway = Arc::new(ScriptedGateway::new());
        let resolution = use_case(gateway.clone())
            .resolve("list docker containers", &registry(), None)
            .await;

        assert_eq!(
            resolution.outcome,
            ResolutionOutcome::Matched(ResolutionTier::Pattern {
                rule: "list_containers"
            })
        );
        assert_eq!(
            resolution.intents[0].tool_name.as_deref(),
            Some("list_containers")
        );
        assert_eq!(resolution.intents[0].arguments["all"], false);
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn test_fuzzy_device_match() {
        let gateway = Arc::new(ScriptedGateway::new());
        let resolution = use_case(gateway.clone())
            .resolve("turn on kitchen lights", &registry(), None)
            .await;

        let intent = &resolution.intents[0];
        assert_eq!(intent.intent_type, IntentType::Control);
        assert_eq!(intent.target_device.as_deref(), Some("kitchen lights"));
        assert_eq!(intent.action.as_deref(), Some("turn_on"));
        assert!(matches!(
            resolution.outcome,
            ResolutionOutcome::Matched(ResolutionTier::Fuzzy { .. })
        ));
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn test_unknown_device_falls_through_to_model() {
        let gateway = Arc::new(ScriptedGateway::new().with_model(
            FAST,
            vec![text(
                r#"[{"intent_type":"control","target_device":"garage door","action":"turn_on"}]"#,
            )],
        ));
        let resolution = use_case(gateway.clone())
            .resolve("turn on garage door opener", &registry(), None)
            .await;

        assert_eq!(gateway.called_models(), vec![FAST]);
        assert_eq!(resolution.model_calls, 1);
        assert_eq!(
            resolution.intents[0].target_device.as_deref(),
            Some("garage door")
        );
    }

    #[tokio::test]
    async fn test_garbage_from_fast_model_escalates_once() {
        let gateway = Arc::new(
            ScriptedGateway::new()
                .with_model(FAST, vec![text("Sure! I'd love to help with that.")])
                .with_model(
                    SMART,
                    vec![text(
                        "```json\n{\"intent_type\":\"tool_call\",\"tool_name\":\"list_containers\"}\n```",
                    )],
                ),
        );
        let resolution = use_case(gateway.clone())
            .resolve("what's running on the box", &registry(), None)
            .await;

        assert_eq!(gateway.called_models(), vec![FAST, SMART]);
        assert_eq!(
            resolution.outcome,
            ResolutionOutcome::Matched(ResolutionTier::Model {
                model: Model::new(SMART)
            })
        );
        assert_eq!(
            resolution.intents[0].tool_name.as_deref(),
            Some("list_containers")
        );
    }

    #[tokio::test]
    async fn test_gateway_error_escalates() {
        let gateway = Arc::new(
            ScriptedGateway::new()
                .with_model(FAST, vec![ScriptedReply::Error("connection refused".into())])
                .with_model(SMART, vec![text("[]")]),
        );
        let resolution = use_case(gateway.clone())
            .resolve("how are you", &registry(), None)
            .await;

        assert_eq!(resolution.model_calls, 2);
        assert_eq!(resolution.outcome, ResolutionOutcome::NoIntent);
    }

    #[tokio::test]
    async fn test_empty_array_is_no_intent_without_escalation() {
        let gateway = Arc::new(ScriptedGateway::new().with_model(FAST, vec![text("[]")]));
        let resolution = use_case(gateway.clone())
            .resolve("thanks, that's all", &registry(), None)
            .await;

        assert_eq!(resolution.outcome, ResolutionOutcome::NoIntent);
        assert!(resolution.intents.is_empty());
        assert_eq!(gateway.call_count(), 1);
    }

    #[tokio::test]
    async fn test_both_models_unparseable_is_unresolved() {
        let gateway = Arc::new(
            ScriptedGateway::new()
                .with_model(FAST, vec![text("no idea")])
                .with_model(SMART, vec![text("still no idea")]),
        );
        let resolution = use_case(gateway.clone())
            .resolve("frobnicate the widget", &registry(), None)
            .await;

        assert_eq!(resolution.outcome, ResolutionOutcome::Unresolved);
        assert!(resolution.intents.is_empty());
        assert_eq!(resolution.model_calls, 2);
    }

    #[tokio::test]
    async fn test_url_case_restored() {
        let gateway = Arc::new(ScriptedGateway::new().with_model(
            FAST,
            vec![text(
                r#"[{"intent_type":"tool_call","tool_name":"get_transcript","arguments":{"url":"https://youtu.be/abcdef123"}}]"#,
            )],
        ));
        let resolution = use_case(gateway)
            .resolve(
                "summarise https://youtu.be/AbCdEf123 for me",
                &registry(),
                None,
            )
            .await;

        assert_eq!(
            resolution.intents[0].arguments["url"],
            "https://youtu.be/AbCdEf123"
        );
    }

    #[tokio::test]
    async fn test_note_title_synthesized() {
        let gateway = Arc::new(ScriptedGateway::new().with_model(
            FAST,
            vec![text(
                r#"{"intent_type":"tool_call","tool_name":"create_note","arguments":{"title":null,"content":"Buy oat milk and coffee beans today"}}"#,
            )],
        ));
        let resolution = use_case(gateway)
            .resolve("jot this down: buy oat milk and coffee beans today", &registry(), None)
            .await;

        assert_eq!(
            resolution.intents[0].arguments["title"],
            "Buy oat milk and coffee"
        );
    }

    #[tokio::test]
    async fn test_device_list_capped_and_context_passed() {
        let gateway = Arc::new(ScriptedGateway::new().with_model(FAST, vec![text("[]")]));
        let tools = Arc::new(MockToolExecutor::new(&["create_note"]));
        let use_case = ResolveIntentUseCase::new(
            gateway.clone(),
            tools,
            ResolverConfig::default().with_device_cap(1),
        );

        use_case
            .resolve(
                "save that as a note",
                &registry(),
                Some("CONTAINER ID   IMAGE   web-1"),
            )
            .await;

        let prompt = gateway.request_text(0);
        assert!(prompt.contains("bedroom fan"));
        assert!(!prompt.contains("kitchen lights"));
        assert!(prompt.contains("web-1"));
        assert!(prompt.contains("save that as a note"));
    }

    #[tokio::test]
    async fn test_blank_command_is_no_intent() {
        let gateway = Arc::new(ScriptedGateway::new());
        let resolution = use_case(gateway.clone())
            .resolve("   ", &registry(), None)
            .await;
        assert_eq!(resolution.outcome, ResolutionOutcome::NoIntent);
        assert_eq!(gateway.call_count(), 0);
    }
}
