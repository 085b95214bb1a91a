/*!
 * Tests for error types and their display formatting
 */

use creatorflow::errors::{AccountError, AppError, PipelineError, ProviderError};

/// Test provider error display messages
#[test]
fn test_provider_error_display_withEachVariant_shouldFormatMessage() {
    let api = ProviderError::ApiError {
        status_code: 429,
        message: "too many requests".to_string(),
    };
    assert_eq!(
        api.to_string(),
        "API responded with error: 429 - too many requests"
    );

    let request = ProviderError::RequestFailed("timeout".to_string());
    assert_eq!(request.to_string(), "API request failed: timeout");

    let unsupported = ProviderError::Unsupported("Ollama has no image model".to_string());
    assert!(unsupported.to_string().contains("no image model"));
}

/// Test pipeline errors carry position and total
#[test]
fn test_pipeline_error_accessors_withEachVariant_shouldExposeChunkAndTotal() {
    let failed = PipelineError::ChunkFailed {
        chunk: 3,
        total: 7,
        source: ProviderError::RequestFailed("boom".to_string()),
    };
    assert_eq!(failed.chunk(), 3);
    assert_eq!(failed.total(), 7);
    assert!(!failed.is_cancelled());

    let implausible = PipelineError::ImplausibleResult {
        chunk: 2,
        total: 5,
        length: 4,
        min: 10,
    };
    assert_eq!(implausible.chunk(), 2);
    assert_eq!(implausible.total(), 5);
    assert!(!implausible.is_cancelled());

    let cancelled = PipelineError::Cancelled { chunk: 4, total: 9 };
    assert_eq!(cancelled.chunk(), 4);
    assert_eq!(cancelled.total(), 9);
    assert!(cancelled.is_cancelled());
}

/// Test pipeline error messages name the failing chunk
#[test]
fn test_pipeline_error_display_withChunkFailure_shouldNamePosition() {
    let error = PipelineError::ChunkFailed {
        chunk: 3,
        total: 7,
        source: ProviderError::RequestFailed("boom".to_string()),
    };

    let message = error.to_string();
    assert!(message.contains("chunk 3 of 7"), "got: {message}");
}

/// Test the implausible-result message includes lengths
#[test]
fn test_pipeline_error_display_withImplausibleResult_shouldIncludeLengths() {
    let error = PipelineError::ImplausibleResult {
        chunk: 1,
        total: 2,
        length: 4,
        min: 10,
    };

    let message = error.to_string();
    assert!(message.contains("4 chars"), "got: {message}");
    assert!(message.contains("at least 10"), "got: {message}");
}

/// Test the chunk failure keeps its provider error as source
#[test]
fn test_pipeline_error_source_withChunkFailure_shouldExposeProviderError() {
    use std::error::Error;

    let error = PipelineError::ChunkFailed {
        chunk: 1,
        total: 1,
        source: ProviderError::RequestFailed("boom".to_string()),
    };

    let source = error.source().expect("chunk failure should carry a source");
    assert!(source.to_string().contains("boom"));
}

/// Test account error display messages
#[test]
fn test_account_error_display_withCommonVariants_shouldFormatMessage() {
    assert_eq!(
        AccountError::UserNotFound("alice".to_string()).to_string(),
        "User not found: alice"
    );
    assert_eq!(AccountError::InvalidPassword.to_string(), "Incorrect password");
    assert_eq!(AccountError::SessionExpired.to_string(), "Session expired");
    assert!(
        AccountError::WeakPassword(8)
            .to_string()
            .contains("minimum 8 characters")
    );
}

/// Test conversions into the application error
#[test]
fn test_app_error_from_withWrappedErrors_shouldSelectVariant() {
    let provider: AppError = ProviderError::RequestFailed("x".to_string()).into();
    assert!(matches!(provider, AppError::Provider(_)));

    let pipeline: AppError = PipelineError::Cancelled { chunk: 1, total: 1 }.into();
    assert!(matches!(pipeline, AppError::Pipeline(_)));

    let account: AppError = AccountError::InvalidPassword.into();
    assert!(matches!(account, AppError::Account(_)));

    let io: AppError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
    assert!(matches!(io, AppError::File(_)));
}
