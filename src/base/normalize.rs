//! Turns a parsed model reply into a [`ClassificationRecord`].
//!
//! Every field is read by its own attempt-or-default helper, so a malformed
//! value in one field never blanks out the others.

use serde_json::{Map, Value};

use super::types::ClassificationRecord;

/// Build the canonical record from the parsed object (if any) and the raw model text.
pub fn normalize(parsed: Option<&Map<String, Value>>, raw_text: &str) -> ClassificationRecord {
    let Some(object) = parsed else {
        return ClassificationRecord::unparsed(raw_text);
    };

    ClassificationRecord {
        label: text_field(object, "label"),
        reason: text_field(object, "reason"),
        action: text_field(object, "action"),
        title: text_field(object, "title"),
        related: list_field(object, "related"),
        confidence: number_field(object, "confidence"),
        raw: raw_text.to_string(),
    }
}

/// A trimmed string; absent or `null` values become empty.
fn text_field(object: &Map<String, Value>, key: &str) -> String {
    object.get(key).map(coerce_text).unwrap_or_default()
}

/// A list of non-empty trimmed strings, from an array or a comma-separated string.
fn list_field(object: &Map<String, Value>, key: &str) -> Vec<String> {
    match object.get(key) {
        Some(Value::Array(items)) => items.iter().map(coerce_text).filter(|item| !item.is_empty()).collect(),
        Some(Value::String(joined)) => joined.split(',').map(str::trim).filter(|item| !item.is_empty()).map(str::to_string).collect(),
        _ => Vec::new(),
    }
}

/// A finite float, from a number or a numeric string.
fn number_field(object: &Map<String, Value>, key: &str) -> Option<f64> {
    let value = match object.get(key)? {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => text.trim().parse::<f64>().ok()?,
        _ => return None,
    };

    value.is_finite().then_some(value)
}

fn coerce_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.trim().to_string(),
        other => other.to_string().trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::base::types::PARSE_FAILED_REASON;

    fn normalize_value(value: Value) -> ClassificationRecord {
        let Value::Object(object) = value else { panic!("not an object") };

        normalize(Some(&object), "raw")
    }

    #[test]
    fn test_missing_object_degrades() {
        let record = normalize(None, "some raw text");

        assert_eq!(record.label, "some raw text");
        assert_eq!(record.raw, "some raw text");
        assert_eq!(record.reason, PARSE_FAILED_REASON);
        assert_eq!(record.action, "");
        assert_eq!(record.title, "");
        assert!(record.related.is_empty());
        assert_eq!(record.confidence, None);
    }

    #[test]
    fn test_full_object() {
        let record = normalize_value(json!({
            "label": "  billing ",
            "reason": "invoice could not be paid",
            "confidence": 0.9,
            "action": "check the payment provider",
            "title": "Billing",
            "related": ["invoice", " payment ", "", null]
        }));

        assert_eq!(record.label, "billing");
        assert_eq!(record.reason, "invoice could not be paid");
        assert_eq!(record.action, "check the payment provider");
        assert_eq!(record.title, "Billing");
        assert_eq!(record.related, vec!["invoice", "payment"]);
        assert_eq!(record.confidence, Some(0.9));
        assert_eq!(record.raw, "raw");
    }

    #[test]
    fn test_absent_keys_default() {
        let record = normalize_value(json!({}));

        assert_eq!(record.label, "");
        assert_eq!(record.reason, "");
        assert!(record.related.is_empty());
        assert_eq!(record.confidence, None);
    }

    #[test]
    fn test_related_from_comma_string() {
        let record = normalize_value(json!({"related": "a, b, ,c"}));

        assert_eq!(record.related, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_related_of_other_type() {
        assert!(normalize_value(json!({"related": 42})).related.is_empty());
        assert!(normalize_value(json!({"related": {"a": 1}})).related.is_empty());
        assert!(normalize_value(json!({"related": null})).related.is_empty());
    }

    #[test]
    fn test_related_mixed_elements() {
        let record = normalize_value(json!({"related": [1, true, "x", "  "]}));

        assert_eq!(record.related, vec!["1", "true", "x"]);
    }

    #[test]
    fn test_confidence_coercion() {
        assert_eq!(normalize_value(json!({"confidence": "0.7"})).confidence, Some(0.7));
        assert_eq!(normalize_value(json!({"confidence": " 1 "})).confidence, Some(1.0));
        assert_eq!(normalize_value(json!({"confidence": 1})).confidence, Some(1.0));
        assert_eq!(normalize_value(json!({"confidence": "not-a-number"})).confidence, None);
        assert_eq!(normalize_value(json!({"confidence": "NaN"})).confidence, None);
        assert_eq!(normalize_value(json!({"confidence": "inf"})).confidence, None);
        assert_eq!(normalize_value(json!({"confidence": null})).confidence, None);
        assert_eq!(normalize_value(json!({"confidence": [0.5]})).confidence, None);
    }

    #[test]
    fn test_confidence_is_not_clamped() {
        assert_eq!(normalize_value(json!({"confidence": 1.5})).confidence, Some(1.5));
    }

    #[test]
    fn test_malformed_field_does_not_blank_others() {
        let record = normalize_value(json!({
            "label": "incident",
            "confidence": {"value": 0.3},
            "related": 7,
            "title": ["not", "a", "string"]
        }));

        assert_eq!(record.label, "incident");
        assert_eq!(record.confidence, None);
        assert!(record.related.is_empty());
        assert_eq!(record.title, r#"["not","a","string"]"#);
    }

    #[test]
    fn test_non_string_scalars_become_text() {
        let record = normalize_value(json!({"label": 3, "reason": false, "action": null}));

        assert_eq!(record.label, "3");
        assert_eq!(record.reason, "false");
        assert_eq!(record.action, "");
    }
}
