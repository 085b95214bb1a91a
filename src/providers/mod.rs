/*!
 * Provider implementations for generative AI backends.
 *
 * This module contains client implementations for the supported backends:
 * - Gemini: Google Gemini API integration
 * - Ollama: Local LLM server
 * - Mock: Behavior-driven test double
 */

use async_trait::async_trait;
use bytes::Bytes;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// A provider-agnostic completion request.
///
/// Instructions travel in `system`, the payload text in `prompt`; the two
/// are never concatenated by callers, so providers are free to map them
/// onto their native request shape.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Model name to use for generation
    pub model: String,
    /// Payload text
    pub prompt: String,
    /// Instructions guiding the model
    pub system: Option<String>,
    /// Sampling temperature; providers apply their own default when unset
    pub temperature: Option<f32>,
    /// When set, the provider is asked for strict JSON matching this schema
    pub response_schema: Option<serde_json::Value>,
}

impl CompletionRequest {
    /// Create a new completion request
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            system: None,
            temperature: None,
            response_schema: None,
        }
    }

    /// Set the system instructions
    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Request strict JSON output matching the given schema
    pub fn response_schema(mut self, schema: serde_json::Value) -> Self {
        self.response_schema = Some(schema);
        self
    }
}

/// A completion response, reduced to what callers consume
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// Generated text
    pub text: String,
    /// Number of prompt tokens, when the backend reports it
    pub prompt_tokens: Option<u64>,
    /// Number of generated tokens, when the backend reports it
    pub completion_tokens: Option<u64>,
}

/// Common trait for all generative AI providers
///
/// This trait defines the interface that all provider implementations must
/// follow. It is object safe so the translation service can hold any
/// provider behind `Box<dyn Provider>` and tests can inject the mock.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// Short provider name for logs
    fn name(&self) -> &'static str;

    /// Complete a request using this provider
    ///
    /// # Arguments
    /// * `request` - The request to complete
    ///
    /// # Returns
    /// * `Result<CompletionResponse, ProviderError>` - The response from the provider or an error
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, ProviderError>;

    /// Generate an image for the given prompt
    ///
    /// Providers without an image model reject the call.
    async fn generate_image(&self, _prompt: &str) -> Result<Bytes, ProviderError> {
        Err(ProviderError::Unsupported(format!(
            "{} has no image model",
            self.name()
        )))
    }

    /// Test the connection to the provider
    ///
    /// # Returns
    /// * `Result<(), ProviderError>` - Ok if the connection is successful, or an error
    async fn test_connection(&self) -> Result<(), ProviderError>;
}

pub mod gemini;
pub mod mock;
pub mod ollama;
