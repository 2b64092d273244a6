//! Interpreting one planner reply

use serde_json::Value;
use std::collections::HashMap;

use crate::parsing::TolerantParser;
use crate::tool::entities::ToolCall;

/// What the model asked for on this turn
#[derive(Debug, Clone, PartialEq)]
pub enum PlannerDecision {
    /// Run this tool next
    Call(ToolCall),
    /// The terminal marker was present; carries the text after its last occurrence
    Finish(String),
    /// Neither a tool call nor the marker; carries the raw reply
    Unparsed(String),
}

impl PlannerDecision {
    /// Parse a reply. A well-formed tool call wins over the terminal marker.
    pub fn from_reply(reply: &str, parser: &TolerantParser, terminal_marker: &str) -> Self {
        if let Some(call) = parser.parse_value(reply).and_then(tool_call_from_value) {
            return PlannerDecision::Call(call);
        }
        if !terminal_marker.is_empty()
            && let Some(at) = reply.rfind(terminal_marker)
        {
            let result = reply[at + terminal_marker.len()..]
                .trim_start_matches([':', '.', '-', '!'])
                .trim();
            return PlannerDecision::Finish(result.to_string());
        }
        PlannerDecision::Unparsed(reply.to_string())
    }
}

fn tool_call_from_value(value: Value) -> Option<ToolCall> {
    let object = match value {
        Value::Object(map) => map,
        Value::Array(items) => match items.into_iter().next()? {
            Value::Object(map) => map,
            _ => return None,
        },
        _ => return None,
    };

    let name = object
        .get("tool_name")
        .or_else(|| object.get("tool"))
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|n| !n.is_empty())?;

    let arguments: HashMap<String, Value> = match object.get("arguments") {
        Some(Value::Object(args)) => args.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
        _ => HashMap::new(),
    };

    Some(ToolCall::new(name).with_arguments(arguments))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> TolerantParser {
        TolerantParser::new().with_control_escape()
    }

    #[test]
    fn test_tool_call_in_fence() {
        let reply = "```json\n{\"tool_name\": \"duckduckgo_search\", \"arguments\": {\"query\": \"rust\"}}\n```";
        match PlannerDecision::from_reply(reply, &parser(), "DONE") {
            PlannerDecision::Call(call) => {
                assert_eq!(call.tool_name, "duckduckgo_search");
                assert_eq!(call.get_string("query"), Some("rust"));
            }
            other => panic!("unexpected decision: {:?}", other),
        }
    }

    #[test]
    fn test_multiline_note_content() {
        let reply = "{\"tool_name\": \"create_note\", \"arguments\": {\"title\": \"Rust\", \"content\": \"# Rust\nSafe and fast\"}}";
        let PlannerDecision::Call(call) = PlannerDecision::from_reply(reply, &parser(), "DONE") else {
            panic!("expected a tool call");
        };
        assert_eq!(call.get_string("content"), Some("# Rust\nSafe and fast"));
    }

    #[test]
    fn test_done_marker_uses_last_occurrence() {
        let reply = "Not DONE yet... actually DONE: saved the note.";
        assert_eq!(
            PlannerDecision::from_reply(reply, &parser(), "DONE"),
            PlannerDecision::Finish("saved the note.".to_string())
        );
    }

    #[test]
    fn test_unparsed() {
        let reply = "Let me think about which tool to use";
        assert_eq!(
            PlannerDecision::from_reply(reply, &parser(), "DONE"),
            PlannerDecision::Unparsed(reply.to_string())
        );
    }

    #[test]
    fn test_json_without_tool_name_is_not_a_call() {
        let reply = "{\"thought\": \"hmm\"}";
        assert!(matches!(
            PlannerDecision::from_reply(reply, &parser(), "DONE"),
            PlannerDecision::Unparsed(_)
        ));
    }

    #[test]
    fn test_array_reply_takes_first_call() {
        let reply = "[{\"tool_name\": \"wikipedia_search\", \"arguments\": {\"query\": \"Rust\"}}]";
        assert!(matches!(
            PlannerDecision::from_reply(reply, &parser(), "DONE"),
            PlannerDecision::Call(call) if call.tool_name == "wikipedia_search"
        ));
    }
}
