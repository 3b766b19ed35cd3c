//! Classification of a single ticket: prompt, generate, extract, normalize.

use tracing::{info, instrument, warn};

use crate::{
    base::{
        extract::extract_json_object,
        metadata::collect_metadata,
        normalize::normalize,
        prompts::build_prompt,
        types::{ClassificationRecord, GenerationOptions, Res, ResponseMetadata},
    },
    service::llm::LlmClient,
};

/// The outcome of a successful generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub record: ClassificationRecord,
    pub meta: ResponseMetadata,
}

/// Classify one (trimmed, non-empty) ticket.
///
/// Only the generation call can fail; a reply that holds no JSON object still
/// produces a (degraded) record.
#[instrument(skip_all)]
pub async fn classify_ticket(ticket: &str, options: GenerationOptions, llm: &LlmClient) -> Res<Classification> {
    let prompt = build_prompt(ticket);

    let response = llm.generate(&prompt, options).await?;
    let raw_text = response.text.trim();

    let parsed = extract_json_object(raw_text);
    if parsed.is_none() {
        warn!("Model reply held no JSON object; returning the raw text.");
    }

    let record = normalize(parsed.as_ref(), raw_text);
    let meta = collect_metadata(&response.envelope);

    info!("{}", describe_outcome(&record, parsed.is_some()));

    Ok(Classification { record, meta })
}

/// Log line for a finished classification; an unparsed reply is only measured, never echoed.
fn describe_outcome(record: &ClassificationRecord, parsed: bool) -> String {
    if parsed {
        format!("Ticket classified as `{}`.", record.label)
    } else {
        format!("Ticket left unclassified ({} bytes of model output).", record.raw.len())
    }
}
