use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use bytes::Bytes;
use log::{debug, error};
use parking_lot::Mutex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};

use crate::errors::ProviderError;
use crate::providers::{CompletionRequest, CompletionResponse, Provider};

/// Gemini client for the Google generative language API
pub struct Gemini {
    /// Base URL of the API
    base_url: String,
    /// API key, sent as the x-goog-api-key header
    api_key: String,
    /// Model used for image generation, when configured
    image_model: Option<String>,
    /// HTTP client for making requests
    client: Client,
    /// Optional rate limit in requests per minute
    rate_limit: Option<u32>,
    /// Completion time of the previous request, for pacing
    last_request: Mutex<Option<Instant>>,
}

/// generateContent request body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    /// Conversation contents; a single user turn for our use
    contents: Vec<Content>,
    /// Instructions guiding the model
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    /// Generation parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

/// A content block: an optional role and a list of parts
#[derive(Debug, Serialize, Deserialize, Default)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

impl Content {
    fn user(text: String) -> Self {
        Self {
            role: Some("user".to_string()),
            parts: vec![Part::text(text)],
        }
    }

    fn instruction(text: String) -> Self {
        Self {
            role: None,
            parts: vec![Part::text(text)],
        }
    }
}

/// A single content part, either text or inline binary data
#[derive(Debug, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    inline_data: Option<InlineData>,
}

impl Part {
    fn text(text: String) -> Self {
        Self {
            text: Some(text),
            inline_data: None,
        }
    }
}

/// Base64-encoded binary payload
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

/// Generation parameters
#[derive(Debug, Serialize, Default)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    /// "application/json" when a response schema is requested
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<serde_json::Value>,
}

/// generateContent response body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: Option<u64>,
    #[serde(default)]
    candidates_token_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

impl Gemini {
    /// Create a new Gemini client with default settings
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::new_with_config(
            "https://generativelanguage.googleapis.com",
            api_key,
            120,
            None,
            None,
        )
    }

    /// Create a new Gemini client with configuration
    pub fn new_with_config(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        timeout_secs: u64,
        rate_limit: Option<u32>,
        image_model: Option<String>,
    ) -> Self {
        let base_url = endpoint.into().trim_end_matches('/').to_string();

        Self {
            base_url,
            api_key: api_key.into(),
            image_model,
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .pool_idle_timeout(Duration::from_secs(90))
                .tcp_keepalive(Duration::from_secs(60))
                .build()
                .unwrap_or_default(),
            rate_limit,
            last_request: Mutex::new(None),
        }
    }

    /// Sleep long enough to honor the configured requests-per-minute limit
    async fn pace(&self) {
        let Some(rate) = self.rate_limit else { return };
        if rate == 0 {
            return;
        }

        let interval = Duration::from_millis(60_000 / rate as u64);
        let wait = {
            let last = self.last_request.lock();
            last.map(|t| interval.saturating_sub(t.elapsed()))
        };
        if let Some(wait) = wait {
            if !wait.is_zero() {
                debug!("Gemini rate pacing: waiting {}ms", wait.as_millis());
                tokio::time::sleep(wait).await;
            }
        }
        *self.last_request.lock() = Some(Instant::now());
    }

    async fn post_generate(
        &self,
        model: &str,
        body: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ProviderError> {
        self.pace().await;

        let url = format!("{}/v1beta/models/{}:generateContent", self.base_url, model);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(map_send_error)?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read error response".to_string());
            error!("Gemini API error ({}): {}", status, truncate(&message, 500));
            return Err(map_status_error(status.as_u16(), message));
        }

        response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))
    }
}

/// Concatenated text of the first candidate, or the block reason on refusal
fn extract_text(response: &GenerateContentResponse) -> Result<String, ProviderError> {
    match response.candidates.first() {
        Some(candidate) => {
            let text = candidate
                .content
                .iter()
                .flat_map(|c| c.parts.iter())
                .filter_map(|p| p.text.as_deref())
                .collect::<String>();
            Ok(text)
        }
        None => {
            let reason = response
                .prompt_feedback
                .as_ref()
                .and_then(|f| f.block_reason.as_deref())
                .unwrap_or("unknown");
            Err(ProviderError::ParseError(format!(
                "response contained no candidates (block reason: {})",
                reason
            )))
        }
    }
}

fn map_send_error(error: reqwest::Error) -> ProviderError {
    if error.is_timeout() {
        ProviderError::ConnectionError(format!("request timed out: {}", error))
    } else if error.is_connect() {
        ProviderError::ConnectionError(error.to_string())
    } else {
        ProviderError::RequestFailed(error.to_string())
    }
}

fn map_status_error(status_code: u16, message: String) -> ProviderError {
    match status_code {
        401 | 403 => ProviderError::AuthenticationError(truncate(&message, 500)),
        429 => ProviderError::RateLimitExceeded(truncate(&message, 500)),
        _ => ProviderError::ApiError {
            status_code,
            message: truncate(&message, 500),
        },
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        text.chars().take(max_chars).collect()
    } else {
        text.to_string()
    }
}

#[async_trait]
impl Provider for Gemini {
    fn name(&self) -> &'static str {
        "Gemini"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, ProviderError> {
        let body = GenerateContentRequest {
            contents: vec![Content::user(request.prompt)],
            system_instruction: request.system.map(Content::instruction),
            generation_config: build_generation_config(
                request.temperature,
                request.response_schema,
            ),
        };

        let response = self.post_generate(&request.model, &body).await?;
        let text = extract_text(&response)?;

        if let Some(candidate) = response.candidates.first() {
            if let Some(reason) = &candidate.finish_reason {
                if reason != "STOP" {
                    debug!("Gemini finish reason: {}", reason);
                }
            }
        }

        let usage = response.usage_metadata.as_ref();
        Ok(CompletionResponse {
            text,
            prompt_tokens: usage.and_then(|u| u.prompt_token_count),
            completion_tokens: usage.and_then(|u| u.candidates_token_count),
        })
    }

    async fn generate_image(&self, prompt: &str) -> Result<Bytes, ProviderError> {
        let model = self.image_model.clone().ok_or_else(|| {
            ProviderError::Unsupported("no image model configured".to_string())
        })?;

        let body = GenerateContentRequest {
            contents: vec![Content::user(prompt.to_string())],
            system_instruction: None,
            generation_config: None,
        };

        let response = self.post_generate(&model, &body).await?;

        let inline = response
            .candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .and_then(|c| c.parts.iter().find_map(|p| p.inline_data.as_ref()))
            .ok_or_else(|| {
                ProviderError::ParseError("response contained no inline image data".to_string())
            })?;

        let decoded = BASE64
            .decode(inline.data.as_bytes())
            .map_err(|e| ProviderError::ParseError(format!("invalid base64 image data: {}", e)))?;

        debug!(
            "Gemini image generated: {} bytes of {}",
            decoded.len(),
            inline.mime_type
        );
        Ok(Bytes::from(decoded))
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        let url = format!("{}/v1beta/models", self.base_url);

        let response = self
            .client
            .get(&url)
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await
            .map_err(map_send_error)?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read error response".to_string());
            return Err(map_status_error(status.as_u16(), message));
        }

        Ok(())
    }
}

fn build_generation_config(
    temperature: Option<f32>,
    response_schema: Option<serde_json::Value>,
) -> Option<GenerationConfig> {
    if temperature.is_none() && response_schema.is_none() {
        return None;
    }

    let response_mime_type = response_schema
        .as_ref()
        .map(|_| "application/json".to_string());
    Some(GenerationConfig {
        temperature,
        response_mime_type,
        response_schema,
    })
}

// Manual Debug to keep the API key out of logs
impl fmt::Debug for Gemini {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gemini")
            .field("base_url", &self.base_url)
            .field("image_model", &self.image_model)
            .field("rate_limit", &self.rate_limit)
            .finish_non_exhaustive()
    }
}
