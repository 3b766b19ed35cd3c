//! Isolates the JSON object embedded in free-form model output.

use serde_json::{Map, Value};

const FENCE: &str = "```";

/// Extract the JSON object from the raw model output, if there is one.
///
/// Handles code fences (with or without a language tag) and prose around the
/// object. Anything that is not a JSON object yields `None`.
pub fn extract_json_object(raw_text: &str) -> Option<Map<String, Value>> {
    let mut candidate = raw_text.trim();

    if candidate.len() >= FENCE.len() * 2 && candidate.starts_with(FENCE) && candidate.ends_with(FENCE) {
        candidate = strip_fence(candidate);
    }

    if let (Some(start), Some(end)) = (candidate.find('{'), candidate.rfind('}')) {
        // A `}` before the first `{` cannot enclose an object.
        candidate = candidate.get(start..=end)?;
    }

    match serde_json::from_str(candidate).ok()? {
        Value::Object(object) => Some(object),
        _ => None,
    }
}

/// Strip the fence characters and the language tag line.
fn strip_fence(text: &str) -> &str {
    let inner = text.trim_matches(|c: char| c == '`' || c.is_whitespace());

    match inner.split_once('\n') {
        // The first line is a tag like `json`; a line with a brace is content.
        Some((first, rest)) if !first.contains('{') => rest,
        _ => inner,
    }
}
