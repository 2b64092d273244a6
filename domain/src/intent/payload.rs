//! Decoding model-generated intent payloads
//!
//! The model is asked for a JSON array of intents but may return a single
//! object, omit fields, use legacy labels or emit junk elements. Decoding is
//! element-wise and lenient: bad elements are dropped, good ones survive.

use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

use super::entities::{DEFAULT_CONFIDENCE, Intent, IntentType};

/// Wire shape of one model-generated intent
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawIntent {
    intent_type: Option<String>,
    target_device: Option<String>,
    action: Option<String>,
    tool_name: Option<String>,
    arguments: Option<HashMap<String, Value>>,
    confidence: Option<f64>,
}

impl RawIntent {
    /// Non-actionable: nothing to call, nothing to operate, and no explicit
    /// non-query type.
    fn is_empty(&self) -> bool {
        let untyped_or_query = match self.intent_type.as_deref() {
            None => true,
            Some(label) => IntentType::from_label(label) == Some(IntentType::Query),
        };
        self.tool_name.is_none()
            && self.action.is_none()
            && self.target_device.is_none()
            && untyped_or_query
    }

    fn into_intent(self) -> Intent {
        let intent_type = self
            .intent_type
            .as_deref()
            .and_then(IntentType::from_label)
            .unwrap_or(if self.tool_name.is_some() {
                IntentType::ToolCall
            } else if self.action.is_some() || self.target_device.is_some() {
                IntentType::Control
            } else {
                IntentType::Query
            });

        Intent {
            intent_type,
            target_device: self.target_device,
            action: self.action,
            tool_name: self.tool_name,
            arguments: self.arguments.unwrap_or_default(),
            confidence: self.confidence.unwrap_or(DEFAULT_CONFIDENCE).clamp(0.0, 1.0),
        }
    }

    fn normalize(mut self) -> Self {
        fn clean(field: Option<String>) -> Option<String> {
            field
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case("null"))
        }
        self.intent_type = clean(self.intent_type);
        self.target_device = clean(self.target_device);
        self.action = clean(self.action);
        self.tool_name = clean(self.tool_name);
        self
    }
}

/// Result of decoding: the kept intents plus how many elements were dropped
#[derive(Debug, Default)]
pub struct DecodedIntents {
    pub intents: Vec<Intent>,
    /// Elements that were not valid intent objects
    pub malformed: usize,
    /// Valid elements removed as non-actionable
    pub filtered: usize,
}

/// Decode a payload (object or array) into actionable intents.
pub fn decode_intents(payload: Value) -> DecodedIntents {
    let elements = match payload {
        Value::Array(items) => items,
        Value::Object(_) => vec![payload],
        _ => return DecodedIntents { malformed: 1, ..Default::default() },
    };

    let mut decoded = DecodedIntents::default();
    for element in elements {
        match serde_json::from_value::<RawIntent>(element) {
            Ok(raw) => {
                let raw = raw.normalize();
                if raw.is_empty() {
                    decoded.filtered += 1;
                } else {
                    decoded.intents.push(raw.into_intent());
                }
            }
            Err(_) => decoded.malformed += 1,
        }
    }
    decoded
}
