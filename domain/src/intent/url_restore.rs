//! URL-case restoration
//!
//! Models often re-case URLs they copy ("https://youtu.be/AbC" comes back as
//! "https://youtu.be/abc"), which breaks case-sensitive identifiers. Every URL
//! argument whose identifier matches a URL from the user's command is swapped
//! back to the exact original string.

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;
use url::Url;

use super::entities::Intent;

static URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)https?://\S+").expect("url pattern must compile"));

const SHORT_LINK_HOSTS: &[&str] = &["youtu.be", "www.youtu.be"];
const WATCH_HOSTS: &[&str] = &["youtube.com", "www.youtube.com", "m.youtube.com"];

/// All `http(s)://` URLs in a text, in order of appearance
pub fn find_urls(text: &str) -> Vec<&str> {
    URL_PATTERN.find_iter(text).map(|m| m.as_str()).collect()
}

/// Case-insensitive identity of a URL.
///
/// Video links reduce to their video id; any other URL reduces to its
/// lowercased host, path and query without scheme or trailing slash.
pub fn url_identifier(raw: &str) -> Option<String> {
    let parsed = Url::parse(raw).ok()?;
    let host = parsed.host_str()?.to_lowercase();

    if SHORT_LINK_HOSTS.contains(&host.as_str()) {
        let id = parsed.path().trim_start_matches('/').split('/').next()?;
        return (!id.is_empty()).then(|| id.to_lowercase());
    }
    if WATCH_HOSTS.contains(&host.as_str())
        && let Some((_, id)) = parsed.query_pairs().find(|(k, _)| k == "v")
    {
        return Some(id.to_lowercase());
    }

    let mut ident = format!("{}{}", host, parsed.path());
    if let Some(query) = parsed.query() {
        ident.push('?');
        ident.push_str(query);
    }
    Some(ident.trim_end_matches('/').to_lowercase())
}

/// Replace re-cased URL arguments with the user's original URL.
///
/// Returns the number of arguments rewritten.
pub fn restore_url_case(original_command: &str, intents: &mut [Intent]) -> usize {
    let originals: HashMap<String, &str> = find_urls(original_command)
        .into_iter()
        .filter_map(|u| url_identifier(u).map(|id| (id, u)))
        .collect();
    if originals.is_empty() {
        return 0;
    }

    let mut restored = 0;
    for intent in intents.iter_mut() {
        for value in intent.arguments.values_mut() {
            let Some(current) = value.as_str() else {
                continue;
            };
            if !current.to_ascii_lowercase().starts_with("http") {
                continue;
            }
            if let Some(original) = url_identifier(current).and_then(|id| originals.get(&id))
                && current != *original
            {
                *value = serde_json::Value::String((*original).to_string());
                restored += 1;
            }
        }
    }
    restored
}
