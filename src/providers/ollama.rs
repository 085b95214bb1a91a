use async_trait::async_trait;
use log::{debug, error};
use parking_lot::Mutex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};

use crate::errors::ProviderError;
use crate::providers::{CompletionRequest, CompletionResponse, Provider};

/// Ollama client for interacting with a local Ollama server
pub struct Ollama {
    /// Base URL of the Ollama API
    base_url: String,
    /// HTTP client for making requests
    client: Client,
    /// Optional rate limit in requests per minute
    rate_limit: Option<u32>,
    /// Completion time of the previous request, for pacing
    last_request: Mutex<Option<Instant>>,
}

/// Generate request for the Ollama API
#[derive(Debug, Serialize)]
struct GenerationRequest {
    /// Model name to use for generation
    model: String,
    /// Prompt to generate from
    prompt: String,
    /// System message to guide the model
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    /// Additional model parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<GenerationOptions>,
    /// Format to return a response in ("json" for strict JSON)
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<String>,
    /// Whether to stream the response
    stream: bool,
}

/// Generation options for the Ollama API
#[derive(Debug, Serialize)]
struct GenerationOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// Generation response from the Ollama API
#[derive(Debug, Deserialize)]
struct GenerationResponse {
    /// Generated text
    #[serde(default)]
    response: String,
    /// Number of prompt tokens
    #[serde(default)]
    prompt_eval_count: Option<u64>,
    /// Number of generated tokens
    #[serde(default)]
    eval_count: Option<u64>,
}

impl Ollama {
    /// Create a new Ollama client with the specified host and port
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        let host = host.into();

        // Construct a proper URL with scheme and port
        let base_url = if host.starts_with("http://") || host.starts_with("https://") {
            let url_parts: Vec<&str> = host.split("://").collect();
            if url_parts.len() == 2 {
                let scheme = url_parts[0];
                let host_part = url_parts[1];

                if host_part.contains(':') {
                    // Already has a port, use as is
                    host
                } else {
                    format!("{}://{}:{}", scheme, host_part, port)
                }
            } else {
                // Malformed URL, fallback to safe default
                format!("http://localhost:{}", port)
            }
        } else {
            format!("http://{}:{}", host, port)
        };

        Self::from_url(base_url)
    }

    /// Create a new Ollama client from a complete URL
    pub fn from_url(url: impl Into<String>) -> Self {
        Self::from_url_with_config(url, 30, None)
    }

    /// Create a new Ollama client with configuration
    ///
    /// Ollama typically uses HTTP/1.1, so HTTP/2 is not forced.
    pub fn from_url_with_config(
        url: impl Into<String>,
        timeout_secs: u64,
        rate_limit: Option<u32>,
    ) -> Self {
        Self {
            base_url: url.into().trim_end_matches('/').to_string(),
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .http1_only()
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
                tokio::time::sleep(wait).await;
            }
        }
        *self.last_request.lock() = Some(Instant::now());
    }

    /// Get the Ollama API version
    pub async fn version(&self) -> Result<String, ProviderError> {
        let url = format!("{}/api/version", self.base_url);
        let response: serde_json::Value = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ProviderError::ConnectionError(format!("Failed to connect to Ollama: {}", e)))?
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(format!("Invalid version response: {}", e)))?;

        response["version"]
            .as_str()
            .map(String::from)
            .ok_or_else(|| ProviderError::ParseError("Invalid version format in response".to_string()))
    }
}

#[async_trait]
impl Provider for Ollama {
    fn name(&self) -> &'static str {
        "Ollama"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, ProviderError> {
        self.pace().await;

        let url = format!("{}/api/generate", self.base_url);

        let body = GenerationRequest {
            model: request.model,
            prompt: request.prompt,
            system: request.system,
            options: request
                .temperature
                .map(|t| GenerationOptions { temperature: Some(t) }),
            // Ollama has no schema support; "json" at least forces valid JSON
            format: request.response_schema.as_ref().map(|_| "json".to_string()),
            stream: false,
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::ConnectionError(format!("request timed out: {}", e))
                } else if e.is_connect() {
                    ProviderError::ConnectionError(e.to_string())
                } else {
                    ProviderError::RequestFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read error response".to_string());
            error!("Ollama API error ({}): {}", status, error_text);
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message: error_text,
            });
        }

        let response_text = response
            .text()
            .await
            .map_err(|e| ProviderError::RequestFailed(format!("Failed to read response: {}", e)))?;

        // A well-behaved server answers with a single JSON object when
        // stream is false; fall back to the last JSONL line otherwise.
        let parsed = serde_json::from_str::<GenerationResponse>(&response_text).or_else(|e| {
            debug!("Single-object parse failed ({}), trying JSONL fallback", e);
            response_text
                .lines()
                .rev()
                .find(|line| !line.trim().is_empty())
                .and_then(|line| serde_json::from_str::<GenerationResponse>(line).ok())
                .ok_or_else(|| {
                    ProviderError::ParseError(format!("Failed to parse Ollama response: {}", e))
                })
        })?;

        Ok(CompletionResponse {
            text: parsed.response,
            prompt_tokens: parsed.prompt_eval_count,
            completion_tokens: parsed.eval_count,
        })
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        let version = self.version().await?;
        debug!("Connected to Ollama version {}", version);
        Ok(())
    }
}

impl fmt::Debug for Ollama {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ollama")
            .field("base_url", &self.base_url)
            .field("rate_limit", &self.rate_limit)
            .finish_non_exhaustive()
    }
}
