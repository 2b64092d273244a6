//! Note-creation safety net
//!
//! Models and rules regularly produce `create_note` calls without a title.
//! Both the resolver and the dispatcher run [`ensure_note_fields`] before such a
//! call leaves the process, so a backend never sees a blank title.

use std::collections::HashMap;

/// Tools that create notes and therefore need a title
pub const NOTE_CREATION_TOOLS: &[&str] = &["create_note"];

/// Number of content words used for a synthesized title
const TITLE_WORDS: usize = 5;

pub fn is_note_creation_tool(tool_name: &str) -> bool {
    NOTE_CREATION_TOOLS.contains(&tool_name)
}

/// Title derived from the first five words of `content`, keeping only
/// alphanumerics and spaces; `Untitled Note <unix_ts>` when nothing is left.
pub fn synthesize_title(content: &str, unix_ts: i64) -> String {
    let head = content
        .split_whitespace()
        .take(TITLE_WORDS)
        .collect::<Vec<_>>()
        .join(" ");
    let cleaned: String = head
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == ' ')
        .collect();
    let cleaned = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");

    if cleaned.is_empty() {
        format!("Untitled Note {}", unix_ts)
    } else {
        cleaned
    }
}

/// Fill a missing or blank `title` and a missing `content` in place.
///
/// Returns `true` when the arguments were changed.
pub fn ensure_note_fields(arguments: &mut HashMap<String, serde_json::Value>, unix_ts: i64) -> bool {
    let mut changed = false;

    let content = match arguments.get("content") {
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(serde_json::Value::Null) | None => {
            arguments.insert("content".to_string(), serde_json::Value::String(String::new()));
            changed = true;
            String::new()
        }
        Some(other) => other.to_string(),
    };

    let has_title = arguments
        .get("title")
        .and_then(|v| v.as_str())
        .is_some_and(|t| !t.trim().is_empty());

    if !has_title {
        arguments.insert(
            "title".to_string(),
            serde_json::Value::String(synthesize_title(&content, unix_ts)),
        );
        changed = true;
    }

    changed
}
