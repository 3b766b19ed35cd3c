pub mod gemini;

use crate::base::types::{GenerationOptions, GenerationResponse, Res};
use async_trait::async_trait;
use std::ops::Deref;
use std::sync::Arc;

// Traits.

/// Generic LLM client trait that clients must implement.
///
/// This trait defines the single round-trip the classifier needs from a
/// text-generation model. Implementing this trait allows different LLM
/// providers (or test doubles) to be used with the ticket-classifier.
#[async_trait]
pub trait GenericLlmClient: Send + Sync + 'static {
    /// Generate text for the given prompt.
    ///
    /// Returns the model's text together with the full response envelope.
    /// Any transport, authentication, quota, or "no text" condition is an error.
    async fn generate(&self, prompt: &str, options: GenerationOptions) -> Res<GenerationResponse>;
}

// Structs.

/// LLM client for the application.
///
/// This is trivially cloneable and can be passed around without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct LlmClient {
    inner: Arc<dyn GenericLlmClient>,
}

impl Deref for LlmClient {
    type Target = dyn GenericLlmClient;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl LlmClient {
    pub fn new(inner: Arc<dyn GenericLlmClient>) -> Self {
        Self { inner }
    }
}
