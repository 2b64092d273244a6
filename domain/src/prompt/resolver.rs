//! Prompt for model-backed intent generation

use crate::tool::entities::ToolSpec;

/// Templates for the resolver's model tier
pub struct ResolverPrompt;

impl ResolverPrompt {
    /// System prompt: catalogue, devices, prior output and output contract.
    ///
    /// `devices` is expected to be capped by the caller already.
    pub fn system(catalogue: &ToolSpec, devices: &[&str], context: Option<&str>) -> String {
        let tools = serde_json::to_string_pretty(&catalogue.to_json_schemas())
            .unwrap_or_else(|_| "[]".to_string());
        let devices = serde_json::to_string(devices).unwrap_or_else(|_| "[]".to_string());
        let context = context.filter(|c| !c.trim().is_empty()).unwrap_or("None");

        format!(
            r#"You are an action engine. Convert the user's command into a JSON list of intents.
Output JSON ONLY. No markdown, no explanations.

## CONTEXT
- Previous Output: {context}
- Connected Devices: {devices}

## TOOLS
{tools}

## OUTPUT FORMAT
A JSON array. Each element:
{{"intent_type": "control" | "query" | "tool_call", "target_device": string or null, "action": string or null, "tool_name": string or null, "arguments": {{}}, "confidence": number between 0 and 1}}

Rules:
- Use "tool_call" with a tool_name from TOOLS for anything a tool can do.
- Use "control" with target_device from Connected Devices and an action such as turn_on, turn_off, toggle, set_value, mute, unmute, volume_up, volume_down.
- Use "query" with action "get_status" to ask about a device.
- Several steps become several intents, in order.
- Copy URLs exactly as the user wrote them.
- If the user is just chatting, return [].

## EXAMPLES
User: turn off the bedroom lamp
[{{"intent_type": "control", "target_device": "bedroom lamp", "action": "turn_off", "tool_name": null, "arguments": {{}}, "confidence": 0.95}}]

User: what containers are running
[{{"intent_type": "tool_call", "target_device": null, "action": null, "tool_name": "list_containers", "arguments": {{"all": false}}, "confidence": 0.9}}]

User: write a note about today's standup saying we shipped the parser
[{{"intent_type": "tool_call", "target_device": null, "action": null, "tool_name": "create_note", "arguments": {{"title": "Standup", "content": "We shipped the parser."}}, "confidence": 0.9}}]

User: thanks, that's all
[]"#
        )
    }
}
