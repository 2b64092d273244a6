//! Tolerant extraction of a JSON payload from free-form model output.

use serde_json::Value;

/// Extraction strategy that produced a payload, in the order they are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseTier {
    /// The whole (trimmed) text is JSON
    Strict,
    /// Contents of the first ```` ```json ```` or ```` ``` ```` fence
    Fenced,
    /// Span from the first `{`/`[` to the last matching closer
    BraceScan,
    /// Brace-scan span with raw control characters inside strings re-escaped
    ControlEscape,
}

/// A decoded payload and the tier that recovered it
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed {
    pub value: Value,
    pub tier: ParseTier,
}

/// Multi-tier JSON extractor shared by the resolver and the planner.
///
/// Each tier is exposed as its own function so it can be tested in isolation;
/// [`TolerantParser::parse`] runs them in fixed order and stops at the first
/// success. The control-character tier is opt-in because only the planner's
/// free-form tool arguments (long note bodies) need it.
#[derive(Debug, Clone, Copy, Default)]
pub struct TolerantParser {
    escape_control_chars: bool,
}

impl TolerantParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable the final control-character re-escape tier
    pub fn with_control_escape(mut self) -> Self {
        self.escape_control_chars = true;
        self
    }

    /// Try every enabled tier in order; `None` when nothing decodes.
    pub fn parse(&self, text: &str) -> Option<Parsed> {
        if let Some(value) = parse_strict(text) {
            return Some(Parsed { value, tier: ParseTier::Strict });
        }
        if let Some(value) = parse_fenced(text) {
            return Some(Parsed { value, tier: ParseTier::Fenced });
        }
        if let Some(value) = parse_brace_scan(text) {
            return Some(Parsed { value, tier: ParseTier::BraceScan });
        }
        if self.escape_control_chars
            && let Some(value) = parse_control_escaped(text)
        {
            return Some(Parsed { value, tier: ParseTier::ControlEscape });
        }
        None
    }

    /// Convenience wrapper returning only the value
    pub fn parse_value(&self, text: &str) -> Option<Value> {
        self.parse(text).map(|p| p.value)
    }
}

/// Tier 1: the entire text is a JSON object or array.
pub fn parse_strict(text: &str) -> Option<Value> {
    let trimmed = text.trim();
    if !(trimmed.starts_with('{') || trimmed.starts_with('[')) {
        return None;
    }
    serde_json::from_str(trimmed).ok()
}

/// Tier 2: the first ```` ```json ```` block, else the first generic fence.
pub fn parse_fenced(text: &str) -> Option<Value> {
    fenced_block(text, "```json")
        .or_else(|| fenced_block(text, "```"))
        .and_then(|body| parse_strict(body).or_else(|| parse_brace_scan(body)))
}

/// Tier 3: slice from the first opener to the last matching closer.
pub fn parse_brace_scan(text: &str) -> Option<Value> {
    brace_candidates(text)
        .into_iter()
        .find_map(|candidate| serde_json::from_str(candidate).ok())
}

/// Tier 4: the brace-scan candidate with literal newlines, carriage returns
/// and tabs inside string literals replaced by their escape sequences.
pub fn parse_control_escaped(text: &str) -> Option<Value> {
    brace_candidates(text)
        .into_iter()
        .find_map(|candidate| serde_json::from_str(&escape_controls_in_strings(candidate)).ok())
}

fn fenced_block<'a>(text: &'a str, opener: &str) -> Option<&'a str> {
    let start = text.find(opener)?;
    let after_opener = &text[start + opener.len()..];
    // Skip the rest of the fence line (language tag for generic fences).
    let body_start = after_opener.find('\n').map(|i| i + 1).unwrap_or(0);
    let body = &after_opener[body_start..];
    let end = body.find("```").unwrap_or(body.len());
    Some(body[..end].trim())
}

fn brace_candidates(text: &str) -> Vec<&str> {
    let mut openers: Vec<(usize, char)> = ['{', '[']
        .iter()
        .filter_map(|&open| text.find(open).map(|i| (i, open)))
        .collect();
    openers.sort_by_key(|(i, _)| *i);

    openers
        .into_iter()
        .filter_map(|(start, open)| {
            let close = if open == '{' { '}' } else { ']' };
            let end = text.rfind(close)?;
            (end > start).then(|| &text[start..=end])
        })
        .collect()
}

fn escape_controls_in_strings(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 16);
    let mut in_string = false;
    let mut escaped = false;

    for c in text.chars() {
        if in_string {
            if escaped {
                escaped = false;
                out.push(c);
                continue;
            }
            match c {
                '\\' => {
                    escaped = true;
                    out.push(c);
                }
                '"' => {
                    in_string = false;
                    out.push(c);
                }
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\t' => out.push_str("\\t"),
                _ => out.push(c),
            }
        } else {
            if c == '"' {
                in_string = true;
            }
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strict_tier() {
        let parsed = TolerantParser::new().parse("  [{\"a\": 1}] ").unwrap();
        assert_eq!(parsed.tier, ParseTier::Strict);
        assert_eq!(parsed.value, json!([{"a": 1}]));
    }

    #[test]
    fn test_strict_rejects_scalars() {
        assert!(parse_strict("42").is_none());
        assert!(parse_strict("\"hello\"").is_none());
    }

    #[test]
    fn test_json_fence_preferred_over_generic_fence() {
        let text = "Sure!\n```\n{\"wrong\": true}\n```\n```json\n{\"right\": true}\n```";
        assert_eq!(parse_fenced(text), Some(json!({"right": true})));
    }

    #[test]
    fn test_generic_fence_with_language_tag() {
        let text = "```javascript\n[1, 2]\n```";
        let parsed = TolerantParser::new().parse(text).unwrap();
        assert_eq!(parsed.tier, ParseTier::Fenced);
        assert_eq!(parsed.value, json!([1, 2]));
    }

    #[test]
    fn test_brace_scan_with_surrounding_prose() {
        let text = "Here you go: {\"tool_name\": \"x\", \"arguments\": {}} hope that helps";
        let parsed = TolerantParser::new().parse(text).unwrap();
        assert_eq!(parsed.tier, ParseTier::BraceScan);
        assert_eq!(parsed.value["tool_name"], "x");
    }

    #[test]
    fn test_brace_scan_prefers_earliest_opener() {
        let text = "result: [{\"a\": 1}, {\"b\": 2}] done";
        assert_eq!(parse_brace_scan(text), Some(json!([{"a": 1}, {"b": 2}])));
    }

    #[test]
    fn test_control_escape_tier_is_opt_in() {
        let text = "{\"tool_name\": \"create_note\", \"arguments\": {\"content\": \"line one\nline two\"}}";
        assert!(TolerantParser::new().parse(text).is_none());

        let parsed = TolerantParser::new().with_control_escape().parse(text).unwrap();
        assert_eq!(parsed.tier, ParseTier::ControlEscape);
        assert_eq!(parsed.value["arguments"]["content"], "line one\nline two");
    }

    #[test]
    fn test_escape_leaves_structure_whitespace_alone() {
        let raw = "{\n  \"a\": \"x\ty\"\n}";
        let escaped = escape_controls_in_strings(raw);
        assert_eq!(escaped, "{\n  \"a\": \"x\\ty\"\n}");
    }

    #[test]
    fn test_no_payload() {
        assert!(TolerantParser::new().with_control_escape().parse("Just chatting, no JSON").is_none());
    }
}
