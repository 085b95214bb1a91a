/*!
 * Mock provider implementations for testing.
 *
 * This module provides a provider that simulates backend behaviors
 * without network access:
 * - `MockProvider::working()` - Always succeeds, echoing the prompt
 * - `MockProvider::fail_after(n)` - Succeeds n times, then fails
 * - `MockProvider::failing()` - Always fails with an error
 */

use async_trait::async_trait;
use bytes::Bytes;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::errors::ProviderError;
use crate::providers::{CompletionRequest, CompletionResponse, Provider};

/// Behavior mode for the mock provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockBehavior {
    /// Always succeeds, echoing the request prompt
    Working,
    /// Always fails with an error
    Failing,
    /// Succeeds for the first `successes` requests, then fails
    FailAfter { successes: usize },
    /// Fails for the first `failures` requests, then succeeds
    FailFirst { failures: usize },
    /// Returns empty responses
    Empty,
    /// Simulates slow response (for timeout testing)
    Slow { delay_ms: u64 },
}

/// Mock provider with configurable behavior and a request counter
#[derive(Debug, Clone)]
pub struct MockProvider {
    behavior: MockBehavior,
    request_count: Arc<AtomicUsize>,
    custom_response: Option<fn(&CompletionRequest) -> String>,
}

impl MockProvider {
    /// Create a mock with the given behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            custom_response: None,
        }
    }

    /// Create a mock that echoes every prompt
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a mock that always fails
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock that serves `successes` requests, then fails
    pub fn fail_after(successes: usize) -> Self {
        Self::new(MockBehavior::FailAfter { successes })
    }

    /// Create a mock that fails `failures` requests, then succeeds
    pub fn fail_first(failures: usize) -> Self {
        Self::new(MockBehavior::FailFirst { failures })
    }

    /// Create a mock that returns empty responses
    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    /// Create a mock that responds after a delay
    pub fn slow(delay_ms: u64) -> Self {
        Self::new(MockBehavior::Slow { delay_ms })
    }

    /// Set a custom response generator
    pub fn with_custom_response(mut self, generator: fn(&CompletionRequest) -> String) -> Self {
        self.custom_response = Some(generator);
        self
    }

    /// Number of completion requests received so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    fn respond(&self, request: &CompletionRequest) -> CompletionResponse {
        let text = match self.custom_response {
            Some(generator) => generator(request),
            None => request.prompt.clone(),
        };
        CompletionResponse {
            prompt_tokens: Some(request.prompt.len() as u64),
            completion_tokens: Some((text.len() / 2) as u64),
            text,
        }
    }

    fn failure() -> ProviderError {
        ProviderError::ApiError {
            status_code: 500,
            message: "simulated provider failure".to_string(),
        }
    }
}

#[async_trait]
impl Provider for MockProvider {
    fn name(&self) -> &'static str {
        "Mock"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, ProviderError> {
        // Index of this request, starting at 0
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);

        match self.behavior {
            MockBehavior::Working => Ok(self.respond(&request)),

            MockBehavior::Failing => Err(Self::failure()),

            MockBehavior::FailAfter { successes } => {
                if count < successes {
                    Ok(self.respond(&request))
                } else {
                    Err(Self::failure())
                }
            }

            MockBehavior::FailFirst { failures } => {
                if count < failures {
                    Err(Self::failure())
                } else {
                    Ok(self.respond(&request))
                }
            }

            MockBehavior::Empty => Ok(CompletionResponse {
                text: String::new(),
                prompt_tokens: Some(request.prompt.len() as u64),
                completion_tokens: Some(0),
            }),

            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                Ok(self.respond(&request))
            }
        }
    }

    async fn generate_image(&self, _prompt: &str) -> Result<Bytes, ProviderError> {
        self.request_count.fetch_add(1, Ordering::SeqCst);
        match self.behavior {
            MockBehavior::Failing => Err(Self::failure()),
            // A PNG signature is enough for callers that just write bytes
            _ => Ok(Bytes::from_static(&[
                0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A,
            ])),
        }
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        match self.behavior {
            MockBehavior::Failing => Err(ProviderError::ConnectionError(
                "simulated connection failure".to_string(),
            )),
            _ => Ok(()),
        }
    }
}
