use serde::{Deserialize, Serialize};
use serde_json::Value;

pub type Err = anyhow::Error;
pub type Res<T> = Result<T, Err>;
pub type Void = Res<()>;

/// Reason recorded when the model output holds no usable JSON object.
pub const PARSE_FAILED_REASON: &str = "JSON解析に失敗しました";

/// The canonical structured result of classifying one ticket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ClassificationRecord {
    pub label: String,
    pub reason: String,
    pub action: String,
    pub title: String,
    pub related: Vec<String>,
    pub confidence: Option<f64>,
    /// The model output exactly as received (or the error text on failure).
    pub raw: String,
}

impl ClassificationRecord {
    /// Degraded record for model output that held no JSON object.
    pub fn unparsed(raw_text: &str) -> Self {
        Self {
            label: raw_text.to_string(),
            reason: PARSE_FAILED_REASON.to_string(),
            raw: raw_text.to_string(),
            ..Default::default()
        }
    }

    /// Best-effort record describing a failed generation call.
    pub fn upstream_failure(error: &str) -> Self {
        let label = format!("エラー: {error}");

        Self {
            reason: format!("エラーが発生しました: {error}"),
            raw: label.clone(),
            label,
            ..Default::default()
        }
    }
}

/// Raw output of one generation call.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GenerationResponse {
    /// The concatenated text of the first candidate.
    pub text: String,
    /// The full response envelope, kept for metadata collection.
    pub envelope: Value,
}

/// Options sent along with every generation request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationOptions {
    pub temperature: f32,
    pub max_output_tokens: u32,
}

/// Token usage reported by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct UsageMetadata {
    pub prompt_token_count: Option<u64>,
    pub candidates_token_count: Option<u64>,
    pub total_token_count: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SafetyRating {
    pub category: Option<String>,
    pub probability: Option<String>,
}

/// Prompt-level feedback (e.g., why a prompt was blocked).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
    pub safety_ratings: Vec<SafetyRating>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CandidateMetadata {
    pub finish_reason: Option<String>,
    pub safety_ratings: Vec<SafetyRating>,
    /// Text of the candidate's first content part.
    pub content: Option<String>,
}

/// Optional metadata taken from the model response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ResponseMetadata {
    pub usage: Option<UsageMetadata>,
    pub prompt_feedback: Option<PromptFeedback>,
    pub candidates: Option<Vec<CandidateMetadata>>,
}

/// One row of the `tickets` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketRow {
    pub input_text: String,
    pub label: String,
    pub reason: String,
    pub confidence: Option<f64>,
    pub recommended_action: String,
}

impl TicketRow {
    pub fn new(ticket: &str, record: &ClassificationRecord) -> Self {
        Self {
            input_text: ticket.to_string(),
            label: record.label.clone(),
            reason: record.reason.clone(),
            confidence: record.confidence,
            recommended_action: record.action.clone(),
        }
    }
}
