//! HTTP handlers for the classification and health endpoints.

use axum::{
    Json,
    body::Bytes,
    extract::{State, rejection::BytesRejection},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{Instrument, error, info, instrument};

use crate::{
    base::types::{ClassificationRecord, ResponseMetadata, TicketRow},
    runtime::Runtime,
};

use super::{classify::classify_ticket, error::ApiError, ticket_storage::handle_ticket_storage};

/// Body of `POST /predict`.
#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    /// The ticket text.
    pub ticket: Option<String>,
    /// Field name used by older clients; read only when `ticket` is empty.
    pub text: Option<String>,
}

/// Body returned by `POST /predict`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictResponse {
    /// Present only on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Same as `label`.
    pub result: String,
    pub raw: String,
    pub label: String,
    pub reason: String,
    pub action: String,
    pub title: String,
    pub related: Vec<String>,
    pub confidence: Option<f64>,
    pub meta: ResponseMetadata,
}

impl PredictResponse {
    pub fn new(record: ClassificationRecord, meta: ResponseMetadata) -> Self {
        Self {
            error: None,
            result: record.label.clone(),
            raw: record.raw,
            label: record.label,
            reason: record.reason,
            action: record.action,
            title: record.title,
            related: record.related,
            confidence: record.confidence,
            meta,
        }
    }

    pub fn with_error(mut self, message: String) -> Self {
        self.error = Some(message);
        self
    }
}

/// Validate the raw request body and return the trimmed ticket.
pub fn parse_ticket(body: &[u8]) -> Result<String, ApiError> {
    let value: Value = serde_json::from_slice(body).map_err(|err| ApiError::BadRequest(format!("Request body is not valid JSON: {err}")))?;

    if !value.is_object() {
        return Err(ApiError::BadRequest("Request body must be a JSON object.".to_string()));
    }

    let request: PredictRequest = serde_json::from_value(value).map_err(|err| ApiError::BadRequest(format!("Invalid request: {err}")))?;

    [request.ticket, request.text]
        .into_iter()
        .flatten()
        .map(|ticket| ticket.trim().to_string())
        .find(|ticket| !ticket.is_empty())
        .ok_or_else(|| ApiError::BadRequest("`ticket` is required.".to_string()))
}

/// `POST /predict`: classify a ticket, then store it on a best-effort basis.
#[instrument(skip_all)]
pub async fn predict(State(runtime): State<Runtime>, body: Result<Bytes, BytesRejection>) -> Result<Json<PredictResponse>, ApiError> {
    let body = body.map_err(|rejection| ApiError::BadRequest(format!("Could not read request body: {}", rejection.body_text())))?;
    let ticket = parse_ticket(&body)?;

    info!("Classifying ticket ({} bytes) ...", ticket.len());

    // Run the classification on its own task so a panic turns into a 500.
    let options = runtime.config.generation_options();
    let llm = runtime.llm.clone();
    let task_ticket = ticket.clone();
    let classification = tokio::spawn(async move { classify_ticket(&task_ticket, options, &llm).await }.in_current_span())
        .await
        .map_err(|err| ApiError::Internal(format!("Classification task failed: {err}")))?
        .map_err(|err| ApiError::upstream(&err))?;

    // The response is fixed before storage is attempted.
    let row = TicketRow::new(&ticket, &classification.record);
    let response = PredictResponse::new(classification.record, classification.meta);

    if let Err(err) = handle_ticket_storage(row, runtime.db.clone()).await {
        error!("Ticket storage task failed: {}", err);
    }

    Ok(Json(response))
}

/// `GET /health`: liveness probe.
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Fallback for unsupported methods on known routes.
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

/// Fallback for unknown routes.
pub async fn not_found() -> ApiError {
    ApiError::NotFound
}
