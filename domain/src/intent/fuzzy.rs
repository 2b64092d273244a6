//! Tier 2: fuzzy entity match for device verbs
//!
//! "turn on kichen lights" → strip the verb, then pick the registry key most
//! similar to the remainder. Navigation commands ("go to", "open") are never
//! treated as device control.

use super::entities::{EntityRegistry, Intent};
use super::similarity::best_match;

/// Default similarity cutoff for a fuzzy device match
pub const DEFAULT_CUTOFF: f64 = 0.6;

/// Verb prefix → action, checked in order
pub const ACTION_VERBS: &[(&str, &str)] = &[
    ("turn on ", "turn_on"),
    ("switch on ", "turn_on"),
    ("enable ", "turn_on"),
    ("turn off ", "turn_off"),
    ("switch off ", "turn_off"),
    ("disable ", "turn_off"),
    ("toggle ", "toggle"),
];

const NAVIGATION_PREFIXES: &[&str] = &["go to ", "open "];

/// Control intent for the best-matching device, or `None` to fall through.
///
/// The intent's confidence is the similarity score, and `arguments.entity_id`
/// carries the canonical id.
pub fn match_entity(command: &str, registry: &EntityRegistry, cutoff: f64) -> Option<Intent> {
    let lowered = command.trim().to_lowercase();
    if NAVIGATION_PREFIXES.iter().any(|p| lowered.starts_with(p)) {
        return None;
    }

    let (remainder, action) = ACTION_VERBS
        .iter()
        .find_map(|(verb, action)| lowered.strip_prefix(verb).map(|rest| (rest, *action)))?;

    let remainder = remainder.trim().trim_end_matches(['.', '!', '?']);
    let remainder = remainder.strip_prefix("the ").unwrap_or(remainder).trim();
    if remainder.is_empty() {
        return None;
    }

    let keys: Vec<(String, &str)> = registry.names().map(|n| (n.to_lowercase(), n)).collect();
    let (lowered_key, score) = best_match(remainder, keys.iter().map(|(k, _)| k.as_str()), cutoff)?;
    let name = keys
        .iter()
        .find(|(k, _)| k == lowered_key)
        .map(|(_, original)| *original)?;

    let mut intent = Intent::control(name, action).with_confidence(score);
    if let Some(id) = registry.get(name) {
        intent = intent.with_arg("entity_id", id);
    }
    Some(intent)
}
