/*!
 * Tests for provider request types and the mock provider
 */

use creatorflow::errors::ProviderError;
use creatorflow::providers::gemini::Gemini;
use creatorflow::providers::mock::{MockBehavior, MockProvider};
use creatorflow::providers::ollama::Ollama;
use creatorflow::providers::{CompletionRequest, Provider};

/// Test the request builder composes all optional fields
#[test]
fn test_completion_request_builder_withAllFields_shouldSetThem() {
    let schema = serde_json::json!({ "type": "ARRAY" });
    let request = CompletionRequest::new("some-model", "payload text")
        .system("system instructions")
        .temperature(0.0)
        .response_schema(schema.clone());

    assert_eq!(request.model, "some-model");
    assert_eq!(request.prompt, "payload text");
    assert_eq!(request.system.as_deref(), Some("system instructions"));
    assert_eq!(request.temperature, Some(0.0));
    assert_eq!(request.response_schema, Some(schema));
}

/// Test a bare request leaves options unset
#[test]
fn test_completion_request_new_withNoOptions_shouldLeaveFieldsNone() {
    let request = CompletionRequest::new("m", "p");

    assert!(request.system.is_none());
    assert!(request.temperature.is_none());
    assert!(request.response_schema.is_none());
}

/// Test provider names
#[test]
fn test_provider_names_withEachImplementation_shouldMatch() {
    assert_eq!(MockProvider::working().name(), "Mock");
    assert_eq!(Gemini::new("test-key").name(), "Gemini");
    assert_eq!(Ollama::new("localhost", 11434).name(), "Ollama");
}

/// Test the working mock echoes the prompt and counts requests
#[tokio::test]
async fn test_mock_provider_withWorkingBehavior_shouldEchoPrompt() {
    let provider = MockProvider::working();

    let response = provider
        .complete(CompletionRequest::new("m", "echo me back"))
        .await
        .unwrap();

    assert_eq!(response.text, "echo me back");
    assert_eq!(response.prompt_tokens, Some(12));
    assert_eq!(provider.request_count(), 1);
}

/// Test the failing mock returns the simulated API error
#[tokio::test]
async fn test_mock_provider_withFailingBehavior_shouldReturnApiError() {
    let provider = MockProvider::failing();

    let error = provider
        .complete(CompletionRequest::new("m", "anything"))
        .await
        .unwrap_err();

    match error {
        ProviderError::ApiError { status_code, message } => {
            assert_eq!(status_code, 500);
            assert!(message.contains("simulated"));
        }
        other => panic!("Expected ApiError, got: {other}"),
    }
    assert!(provider.test_connection().await.is_err());
}

/// Test fail_after serves the configured number of successes first
#[tokio::test]
async fn test_mock_provider_withFailAfterTwo_shouldFailOnThirdRequest() {
    let provider = MockProvider::fail_after(2);

    for _ in 0..2 {
        assert!(provider
            .complete(CompletionRequest::new("m", "request"))
            .await
            .is_ok());
    }
    assert!(provider
        .complete(CompletionRequest::new("m", "request"))
        .await
        .is_err());
    assert_eq!(provider.request_count(), 3);
}

/// Test fail_first recovers after the configured number of failures
#[tokio::test]
async fn test_mock_provider_withFailFirstOne_shouldSucceedOnSecondRequest() {
    let provider = MockProvider::fail_first(1);

    assert!(provider
        .complete(CompletionRequest::new("m", "request"))
        .await
        .is_err());
    assert!(provider
        .complete(CompletionRequest::new("m", "request"))
        .await
        .is_ok());
}

/// Test the empty mock returns an empty body
#[tokio::test]
async fn test_mock_provider_withEmptyBehavior_shouldReturnEmptyText() {
    let provider = MockProvider::empty();

    let response = provider
        .complete(CompletionRequest::new("m", "request"))
        .await
        .unwrap();

    assert_eq!(response.text, "");
    assert_eq!(response.completion_tokens, Some(0));
}

/// Test custom responses override the echo
#[tokio::test]
async fn test_mock_provider_withCustomResponse_shouldUseGenerator() {
    let provider = MockProvider::working()
        .with_custom_response(|request| format!("custom: {}", request.model));

    let response = provider
        .complete(CompletionRequest::new("model-x", "ignored"))
        .await
        .unwrap();

    assert_eq!(response.text, "custom: model-x");
}

/// Test clones share the request counter
#[tokio::test]
async fn test_mock_provider_withClone_shouldShareRequestCounter() {
    let provider = MockProvider::new(MockBehavior::Working);
    let clone = provider.clone();

    clone
        .complete(CompletionRequest::new("m", "request"))
        .await
        .unwrap();

    assert_eq!(provider.request_count(), 1);
}

/// Test mock image generation returns PNG-signed bytes
#[tokio::test]
async fn test_mock_provider_generate_image_withWorkingBehavior_shouldReturnPngBytes() {
    let provider = MockProvider::working();

    let bytes = provider.generate_image("a thumbnail").await.unwrap();

    assert!(bytes.starts_with(&[0x89, 0x50, 0x4E, 0x47]));
    assert!(MockProvider::failing().generate_image("x").await.is_err());
}

/// Test providers without an image model reject the call
#[tokio::test]
async fn test_generate_image_withOllama_shouldBeUnsupported() {
    let provider = Ollama::new("localhost", 11434);

    let error = provider.generate_image("a thumbnail").await.unwrap_err();

    assert!(matches!(error, ProviderError::Unsupported(_)));
}
