//! Integration with the Gemini `generateContent` REST API.
//!
//! This module provides a thin wrapper around `reqwest` for sending a single
//! prompt to a Gemini model and returning its text along with the raw
//! response envelope (usage, safety ratings, finish reasons).

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use tracing::{info, instrument, warn};

use crate::base::{
    config::Config,
    types::{GenerationOptions, GenerationResponse, Res},
};

use super::{GenericLlmClient, LlmClient};

// Extra methods on `LlmClient` applied by the gemini implementation.

impl LlmClient {
    pub fn gemini(config: &Config) -> Res<Self> {
        let client = GeminiLlmClient::new(config)?;
        Ok(Self { inner: Arc::new(client) })
    }
}

// Specific implementations.

/// Gemini LLM client implementation.
#[derive(Clone)]
pub struct GeminiLlmClient {
    client: Client,
    url: String,
    api_key: String,
}

impl GeminiLlmClient {
    /// Create a new Gemini LLM client.
    #[instrument(name = "GeminiLlmClient::new", skip_all)]
    pub fn new(config: &Config) -> Res<Self> {
        let api_key = config.api_key().ok_or_else(|| anyhow::anyhow!("Gemini API key is not configured."))?.to_string();

        let client = Client::builder().timeout(Duration::from_secs(config.gemini_timeout_secs)).build()?;
        let url = format!("{}/models/{}:generateContent", config.gemini_endpoint.trim_end_matches('/'), config.gemini_model);

        info!("Gemini client targeting model `{}`.", config.gemini_model);

        Ok(Self { client, url, api_key })
    }

    /// Build the `generateContent` request body.
    fn build_request_body(prompt: &str, options: GenerationOptions) -> Value {
        json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt }]
            }],
            "generationConfig": {
                "temperature": options.temperature,
                "maxOutputTokens": options.max_output_tokens
            }
        })
    }
}

#[async_trait]
impl GenericLlmClient for GeminiLlmClient {
    #[instrument(name = "GeminiLlmClient::generate", skip_all)]
    async fn generate(&self, prompt: &str, options: GenerationOptions) -> Res<GenerationResponse> {
        let body = Self::build_request_body(prompt, options);

        let response = self.client.post(&self.url).header("x-goog-api-key", &self.api_key).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            warn!("Gemini call failed with status {status}.");
            return Err(anyhow::anyhow!("Gemini call failed with status {status}: {}", detail.trim()));
        }

        let envelope: Value = response.json().await?;
        let text = parse_gemini_text(&envelope)?;

        info!("Gemini returned {} characters.", text.len());

        Ok(GenerationResponse { text, envelope })
    }
}

/// Concatenate the text parts of the first candidate.
///
/// A response without any text (e.g., a blocked prompt) is an error.
pub fn parse_gemini_text(envelope: &Value) -> Res<String> {
    let parts = envelope.pointer("/candidates/0/content/parts").and_then(Value::as_array);

    let text = parts
        .map(|parts| parts.iter().filter_map(|part| part.get("text").and_then(Value::as_str)).collect::<String>())
        .filter(|text| !text.is_empty());

    match text {
        Some(text) => Ok(text),
        None => {
            let block_reason = envelope.pointer("/promptFeedback/blockReason").and_then(Value::as_str);
            let finish_reason = envelope.pointer("/candidates/0/finishReason").and_then(Value::as_str);

            match (block_reason, finish_reason) {
                (Some(reason), _) => Err(anyhow::anyhow!("Gemini blocked the prompt: {reason}")),
                (None, Some(reason)) => Err(anyhow::anyhow!("Gemini returned no text (finish reason: {reason})")),
                (None, None) => Err(anyhow::anyhow!("Gemini response missing text content")),
            }
        }
    }
}

// Tests.

#[cfg(test)]
mod tests {
    use axum::{
        Json, Router,
        http::{HeaderMap, StatusCode, Uri},
    };

    use super::*;
    use crate::base::config::ConfigInner;

    fn create_test_config(endpoint: &str) -> Config {
        Config {
            inner: Arc::new(ConfigInner {
                gemini_api_key: Some("test_key".to_string()),
                gemini_model: "gemini-test".to_string(),
                gemini_endpoint: endpoint.to_string(),
                gemini_timeout_secs: 5,
                ..Default::default()
            }),
        }
    }

    /// Serve `router` on an ephemeral port and return its base URL.
    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        format!("http://{addr}")
    }

    const OPTIONS: GenerationOptions = GenerationOptions { temperature: 0.0, max_output_tokens: 768 };

    #[test]
    fn test_parse_gemini_text_joins_parts() {
        let envelope = json!({"candidates": [{"content": {"parts": [{"text": "{\"a\":"}, {"text": " 1}"}]}}]});

        assert_eq!(parse_gemini_text(&envelope).unwrap(), "{\"a\": 1}");
    }

    #[test]
    fn test_parse_gemini_text_blocked() {
        let envelope = json!({"promptFeedback": {"blockReason": "SAFETY"}});

        let err = parse_gemini_text(&envelope).unwrap_err();

        assert!(err.to_string().contains("SAFETY"));
    }

    #[test]
    fn test_parse_gemini_text_no_text() {
        let envelope = json!({"candidates": [{"finishReason": "MAX_TOKENS", "content": {"parts": []}}]});

        let err = parse_gemini_text(&envelope).unwrap_err();

        assert!(err.to_string().contains("MAX_TOKENS"));
    }

    #[test]
    fn test_request_body_carries_options() {
        let body = GeminiLlmClient::build_request_body("hello", GenerationOptions { temperature: 0.0, max_output_tokens: 42 });

        assert_eq!(body["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(body["generationConfig"]["temperature"], 0.0);
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 42);
    }

    #[test]
    fn test_new_requires_api_key() {
        let config = Config {
            inner: Arc::new(ConfigInner { gemini_timeout_secs: 5, ..Default::default() }),
        };

        assert!(GeminiLlmClient::new(&config).is_err());
    }

    #[tokio::test]
    async fn test_generate_against_stub_server() {
        let router = Router::new().fallback(|uri: Uri, headers: HeaderMap, Json(body): Json<Value>| async move {
            assert_eq!(uri.path(), "/models/gemini-test:generateContent");
            assert_eq!(headers.get("x-goog-api-key").unwrap(), "test_key");
            assert_eq!(body["generationConfig"]["maxOutputTokens"], 768);

            Json(json!({
                "candidates": [{"content": {"parts": [{"text": "```json\n{\"label\": \"billing\"}\n```"}]}, "finishReason": "STOP"}],
                "usageMetadata": {"totalTokenCount": 10}
            }))
        });
        let endpoint = serve(router).await;

        let client = LlmClient::gemini(&create_test_config(&endpoint)).unwrap();
        let response = client.generate("prompt", OPTIONS).await.unwrap();

        assert_eq!(response.text, "```json\n{\"label\": \"billing\"}\n```");
        assert_eq!(response.envelope["usageMetadata"]["totalTokenCount"], 10);
    }

    #[tokio::test]
    async fn test_generate_error_status() {
        let router = Router::new().fallback(|| async { (StatusCode::TOO_MANY_REQUESTS, "quota exhausted") });
        let endpoint = serve(router).await;

        let client = LlmClient::gemini(&create_test_config(&endpoint)).unwrap();
        let err = client.generate("prompt", OPTIONS).await.unwrap_err();

        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("quota exhausted"));
    }

    #[tokio::test]
    async fn test_generate_unreachable_endpoint() {
        let client = LlmClient::gemini(&create_test_config("http://127.0.0.1:1")).unwrap();

        assert!(client.generate("prompt", OPTIONS).await.is_err());
    }
}
