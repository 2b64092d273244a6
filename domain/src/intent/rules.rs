//! Tier 1: deterministic pattern rules
//!
//! A fixed, priority-ordered table of `(pattern, builder)` pairs. Patterns are
//! case-insensitive and anchored on word boundaries so `cat` never matches
//! inside `implication`. Captured text keeps the user's original casing, so
//! note titles and URLs survive untouched.

use regex::{Captures, Regex};
use std::sync::LazyLock;

use super::entities::Intent;

type Builder = fn(&Captures<'_>, &str) -> Intent;

/// One deterministic rule
pub struct PatternRule {
    /// Stable identifier, used in logs
    pub name: &'static str,
    pattern: Regex,
    /// Extra predicate on the lowercased command; the rule is skipped when it fails
    guard: Option<fn(&str) -> bool>,
    build: Builder,
}

impl PatternRule {
    fn new(name: &'static str, pattern: &str, build: Builder) -> Self {
        Self {
            name,
            pattern: Regex::new(pattern).expect("intent rule pattern must compile"),
            guard: None,
            build,
        }
    }

    fn with_guard(mut self, guard: fn(&str) -> bool) -> Self {
        self.guard = Some(guard);
        self
    }

    fn apply(&self, command: &str, lowered: &str) -> Option<Intent> {
        if let Some(guard) = self.guard
            && !guard(lowered)
        {
            return None;
        }
        self.pattern
            .captures(command)
            .map(|caps| (self.build)(&caps, command))
    }
}

static RULES: LazyLock<Vec<PatternRule>> = LazyLock::new(|| {
    vec![
        PatternRule::new(
            "list_containers",
            r"(?i)^(?:list|show|check)\b.*\b(?:docker|containers?)\b",
            |_, _| Intent::tool_call("list_containers").with_arg("all", false),
        ),
        // Compound search-and-save requests need several tools, so they go to
        // the planner before the plain search rules can claim them.
        PatternRule::new(
            "compound_search_automation",
            r"(?i)^(?:search|find)\b.+\b(?:and|then)\b.+\b(?:save|add|create)\b.+\b(?:notes?|vault)\b",
            automation,
        ),
        PatternRule::new(
            "search_notes",
            r"(?i)^(?:search|find)\b.*\bnotes?\b.*?\b(?:for|about)\s+(.+)$",
            |caps, _| Intent::tool_call("search_notes").with_arg("query", capture(caps, 1)),
        ),
        PatternRule::new(
            "web_search",
            r"(?i)^(?:search|google)\b.*?\bfor\s+(.+)$",
            |caps, _| Intent::tool_call("brave_web_search").with_arg("query", capture(caps, 1)),
        ),
        PatternRule::new(
            "delete_note",
            r"(?i)^(?:delete|remove)\b.*?\bnote\b\s*(?:(?:called|named|titled)\s+)?(.+)$",
            |caps, _| {
                let title = strip_suffix_word(&capture(caps, 1), "please");
                Intent::tool_call("delete_note").with_arg("title", title)
            },
        ),
        PatternRule::new(
            "create_note",
            r"(?i)^(?:create|make|write)\b.*?\bnote\s+(?:that\s+)?(?:is\s+)?(?:called|titled)\s+(.+)$",
            |caps, _| {
                let title = strip_phrase(&capture(caps, 1), "in the vault");
                Intent::tool_call("create_note")
                    .with_arg("title", title)
                    .with_arg("content", "")
            },
        ),
        PatternRule::new(
            "read_note",
            r"(?i)^(?:read|show|open)\b.*?\bnote\b\s*(?:(?:called|about|titled)\s+)?(.+)$",
            |caps, _| Intent::tool_call("read_note").with_arg("title", capture(caps, 1)),
        ),
        PatternRule::new(
            "research_automation",
            r"(?i)^(?:research|esearch|investigate|deep dive)\b\s*.+",
            automation,
        ),
        PatternRule::new(
            "navigation_automation",
            r"(?i)^(?:go to|navigate to|visit)\s+.+\s+(?:and|then)\s+.+",
            automation,
        ),
        PatternRule::new(
            "coding_task",
            r"(?i)^(?:write|create|build|refactor|develop|code)\s+(?:(?:a|an|the)\s+)?(?:code|script|app|application|program|tool|module|class|function|game|website)\b",
            |_, command| Intent::tool_call("run_coding_task").with_arg("goal", command.trim()),
        ),
        PatternRule::new(
            "system_repair",
            r"(?i)^(?:fix|repair|diagnose|check|troubleshoot)\s+(?:(?:my|the)\s+)?(?:system|linux|ubuntu|network|wifi|internet|disk|space|package|apt|dpkg)\b",
            |_, command| Intent::tool_call("run_system_repair").with_arg("issue", command.trim()),
        ),
        // Compound transcript requests ("transcribe X and save it") need the model.
        PatternRule::new(
            "get_transcript",
            r"(?i)^(?:transcript|transcribe)\b.*?(https?://\S+)",
            |caps, _| {
                let url = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
                Intent::tool_call("get_transcript").with_arg("url", url)
            },
        )
        .with_guard(|lowered| !lowered.contains(" and ")),
        PatternRule::new(
            "lights_switch",
            r"(?i)\b(?:lights?|lamps?)\s+(on|off)\b",
            |caps, _| Intent::control("lights", switch_action(caps)),
        ),
        PatternRule::new(
            "tv_switch",
            r"(?i)\b(?:tv|television)\s+(on|off)\b",
            |caps, _| Intent::control("tv", switch_action(caps)),
        ),
        PatternRule::new("tv_volume", r"(?i)\bvolume\s+(up|down)\b", |caps, _| {
            let action = if capture(caps, 1).eq_ignore_ascii_case("up") {
                "volume_up"
            } else {
                "volume_down"
            };
            Intent::control("tv", action)
        }),
    ]
});

/// The rule table, highest priority first
pub fn rules() -> &'static [PatternRule] {
    &RULES
}

/// First matching rule wins. Returns the rule name alongside the intent.
pub fn match_rules(command: &str) -> Option<(&'static str, Intent)> {
    let command = command.trim();
    let lowered = command.to_lowercase();
    RULES
        .iter()
        .find_map(|rule| rule.apply(command, &lowered).map(|intent| (rule.name, intent)))
}

fn automation(_: &Captures<'_>, command: &str) -> Intent {
    Intent::tool_call("run_automation").with_arg("goal", command.trim())
}

fn switch_action(caps: &Captures<'_>) -> &'static str {
    if capture(caps, 1).eq_ignore_ascii_case("on") {
        "turn_on"
    } else {
        "turn_off"
    }
}

/// Capture group text, trimmed of whitespace and trailing sentence punctuation
fn capture(caps: &Captures<'_>, group: usize) -> String {
    caps.get(group)
        .map(|m| m.as_str().trim().trim_end_matches(['.', '?', '!']).trim())
        .unwrap_or_default()
        .to_string()
}

/// Byte offset of an ASCII `needle` in `haystack`, ignoring ASCII case.
///
/// Offsets always index the original text, so they land on char boundaries
/// whatever non-ASCII characters surround the match.
fn find_ascii_ignore_case(haystack: &str, needle: &str) -> Option<usize> {
    if needle.is_empty() || !needle.is_ascii() {
        return None;
    }
    haystack
        .as_bytes()
        .windows(needle.len())
        .position(|window| window.eq_ignore_ascii_case(needle.as_bytes()))
}

fn strip_suffix_word(text: &str, word: &str) -> String {
    let trimmed = text.trim();
    if trimmed.eq_ignore_ascii_case(word) {
        return String::new();
    }
    let Some(split) = trimmed.len().checked_sub(word.len()) else {
        return trimmed.to_string();
    };
    if !trimmed.is_char_boundary(split) || !trimmed[split..].eq_ignore_ascii_case(word) {
        return trimmed.to_string();
    }
    let rest = &trimmed[..split];
    if rest.ends_with(' ') || rest.ends_with(',') {
        rest.trim_end_matches([' ', ',']).to_string()
    } else {
        trimmed.to_string()
    }
}

fn strip_phrase(text: &str, phrase: &str) -> String {
    match find_ascii_ignore_case(text, phrase) {
        Some(start) => {
            let mut out = String::with_capacity(text.len());
            out.push_str(&text[..start]);
            out.push_str(&text[start + phrase.len()..]);
            out.split_whitespace().collect::<Vec<_>>().join(" ")
        }
        None => text.trim().to_string(),
    }
}
