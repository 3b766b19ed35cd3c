//! Best-effort metadata collection from a Gemini `generateContent` envelope.

use serde_json::Value;

use super::types::{CandidateMetadata, PromptFeedback, ResponseMetadata, SafetyRating, UsageMetadata};

/// Collect usage, prompt feedback and candidate metadata.
///
/// Each group is read independently; anything missing or of an unexpected
/// shape is left as `None`.
pub fn collect_metadata(envelope: &Value) -> ResponseMetadata {
    ResponseMetadata {
        usage: collect_usage(envelope),
        prompt_feedback: collect_prompt_feedback(envelope),
        candidates: collect_candidates(envelope),
    }
}

fn collect_usage(envelope: &Value) -> Option<UsageMetadata> {
    let usage = envelope.get("usageMetadata").filter(|v| v.is_object())?;

    Some(UsageMetadata {
        prompt_token_count: usage.get("promptTokenCount").and_then(Value::as_u64),
        candidates_token_count: usage.get("candidatesTokenCount").and_then(Value::as_u64),
        total_token_count: usage.get("totalTokenCount").and_then(Value::as_u64),
    })
}

fn collect_prompt_feedback(envelope: &Value) -> Option<PromptFeedback> {
    let feedback = envelope.get("promptFeedback").filter(|v| v.is_object())?;

    Some(PromptFeedback {
        block_reason: text(feedback.get("blockReason")),
        safety_ratings: collect_safety_ratings(feedback.get("safetyRatings")),
    })
}

fn collect_candidates(envelope: &Value) -> Option<Vec<CandidateMetadata>> {
    let candidates = envelope.get("candidates")?.as_array()?;

    Some(
        candidates
            .iter()
            .map(|candidate| CandidateMetadata {
                finish_reason: text(candidate.get("finishReason")),
                safety_ratings: collect_safety_ratings(candidate.get("safetyRatings")),
                content: text(candidate.pointer("/content/parts/0/text")),
            })
            .collect(),
    )
}

fn collect_safety_ratings(ratings: Option<&Value>) -> Vec<SafetyRating> {
    ratings
        .and_then(Value::as_array)
        .map(|ratings| {
            ratings
                .iter()
                .map(|rating| SafetyRating {
                    category: text(rating.get("category")),
                    probability: text(rating.get("probability")),
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Strings are kept as-is; other scalars (e.g., enum ordinals) are stringified.
fn text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null | Value::Array(_) | Value::Object(_) => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
