/*!
 * Integration tests for the chunked translation pipeline.
 *
 * These drive whole documents through the pipeline against mock
 * providers and check ordering, progress, failure and cancellation
 * behavior end to end.
 */

use std::sync::Mutex;

use creatorflow::errors::PipelineError;
use creatorflow::providers::mock::MockProvider;
use creatorflow::subtitle_processor::SubtitleDocument;
use creatorflow::translation::{CancellationToken, ChunkPipeline, PipelineOptions};
use crate::common;

/// Pipeline with a low plausibility floor so short mock echoes pass
fn test_pipeline() -> ChunkPipeline {
    ChunkPipeline::new(PipelineOptions {
        min_plausible_chars: 1,
        retry_backoff_ms: 1,
        ..PipelineOptions::default()
    })
}

/// Test a full document round trip through the echoing mock
#[tokio::test]
async fn test_translate_document_withEchoMock_shouldReassembleInOrder() {
    let provider = MockProvider::working();
    let service = common::mock_service(provider.clone());
    let document = SubtitleDocument::parse(&common::synthetic_srt(5));

    let result = test_pipeline()
        .translate_document(&document, &service, "my", |_, _| {})
        .await
        .unwrap();

    // The echo mock returns each chunk verbatim, so reassembly must
    // reproduce the original document text
    assert_eq!(result, document.to_text());
    assert_eq!(provider.request_count(), 1, "5 entries fit in one chunk");
}

/// Test chunk batching and progress reporting for a 50-entry document
#[tokio::test]
async fn test_translate_document_withFiftyEntries_shouldReportTwoChunks() {
    let provider = MockProvider::working();
    let service = common::mock_service(provider.clone());
    let document = SubtitleDocument::parse(&common::synthetic_srt(50));

    let events = Mutex::new(Vec::new());
    let result = test_pipeline()
        .translate_document(&document, &service, "my", |current, total| {
            events.lock().unwrap().push((current, total));
        })
        .await
        .unwrap();

    assert_eq!(*events.lock().unwrap(), vec![(1, 2), (2, 2)]);
    assert_eq!(provider.request_count(), 2);
    assert_eq!(SubtitleDocument::parse(&result).len(), 50);
}

/// Test progress fires before submission, including for the chunk that fails
#[tokio::test]
async fn test_translate_document_withSecondChunkFailing_shouldReportProgressFirst() {
    // One success, then failures
    let provider = MockProvider::fail_after(1);
    let service = common::mock_service(provider.clone());
    let document = SubtitleDocument::parse(&common::synthetic_srt(50));

    let events = Mutex::new(Vec::new());
    let error = test_pipeline()
        .translate_document(&document, &service, "my", |current, total| {
            events.lock().unwrap().push((current, total));
        })
        .await
        .unwrap_err();

    // The failing chunk still announced itself before its request went out
    assert_eq!(*events.lock().unwrap(), vec![(1, 2), (2, 2)]);
    assert!(matches!(error, PipelineError::ChunkFailed { chunk: 2, total: 2, .. }));
}

/// Test fail-fast: nothing after the failing chunk is submitted
#[tokio::test]
async fn test_translate_document_withMidDocumentFailure_shouldNotSubmitLaterChunks() {
    let provider = MockProvider::fail_after(1);
    let service = common::mock_service(provider.clone());
    // 90 entries at 30 per chunk gives three chunks
    let document = SubtitleDocument::parse(&common::synthetic_srt(90));

    let error = test_pipeline()
        .translate_document(&document, &service, "my", |_, _| {})
        .await
        .unwrap_err();

    assert_eq!(error.chunk(), 2);
    assert_eq!(error.total(), 3);
    assert_eq!(
        provider.request_count(),
        2,
        "Chunk 3 must never be submitted after chunk 2 fails"
    );
}

/// Test cancellation between chunks is honored and distinct from failure
#[tokio::test]
async fn test_translate_document_withCancellationDuringRun_shouldStopAtNextBoundary() {
    let provider = MockProvider::working();
    let service = common::mock_service(provider.clone());
    let document = SubtitleDocument::parse(&common::synthetic_srt(90));

    let token = CancellationToken::new();
    let pipeline = test_pipeline().with_cancellation(token.clone());

    // Cancel while the first chunk is being announced; the boundary check
    // before chunk two is the first place the flag is observed
    let error = pipeline
        .translate_document(&document, &service, "my", move |current, _| {
            if current == 1 {
                token.cancel();
            }
        })
        .await
        .unwrap_err();

    assert!(error.is_cancelled());
    assert_eq!(error.chunk(), 2, "Cancellation lands before chunk two");
    assert_eq!(error.total(), 3);
    assert_eq!(provider.request_count(), 1, "Chunk one was already in flight");
}

/// Test an empty provider response is rejected as implausible
#[tokio::test]
async fn test_translate_document_withEmptyProviderResponse_shouldFailAsImplausible() {
    let provider = MockProvider::empty();
    let service = common::mock_service(provider);
    let document = SubtitleDocument::parse(&common::synthetic_srt(10));

    let error = ChunkPipeline::default()
        .translate_document(&document, &service, "my", |_, _| {})
        .await
        .unwrap_err();

    assert!(matches!(
        error,
        PipelineError::ImplausibleResult { chunk: 1, total: 1, length: 0, min: 10 }
    ));
}

/// Test every chunk succeeds after transient failures absorbed by retries
#[tokio::test]
async fn test_translate_document_withRetriesAcrossChunks_shouldCompleteDocument() {
    // The very first request fails, everything after succeeds
    let provider = MockProvider::fail_first(1);
    let service = common::mock_service(provider.clone());
    let document = SubtitleDocument::parse(&common::synthetic_srt(60));

    let pipeline = ChunkPipeline::new(PipelineOptions {
        min_plausible_chars: 1,
        retry_count: 1,
        retry_backoff_ms: 1,
        ..PipelineOptions::default()
    });

    let result = pipeline
        .translate_document(&document, &service, "my", |_, _| {})
        .await
        .unwrap();

    assert_eq!(SubtitleDocument::parse(&result).len(), 60);
    // Two chunks plus one retried failure
    assert_eq!(provider.request_count(), 3);
}

/// Test translated chunks land in the cache for later runs
#[tokio::test]
async fn test_translate_document_runTwice_shouldServeSecondRunFromCache() {
    let provider = MockProvider::working();
    let service = common::mock_service(provider.clone());
    let document = SubtitleDocument::parse(&common::synthetic_srt(50));
    let pipeline = test_pipeline();

    pipeline
        .translate_document(&document, &service, "my", |_, _| {})
        .await
        .unwrap();
    let after_first = provider.request_count();

    pipeline
        .translate_document(&document, &service, "my", |_, _| {})
        .await
        .unwrap();

    assert_eq!(after_first, 2);
    assert_eq!(provider.request_count(), 2, "Second run must be all cache hits");

    let (hits, _, _) = service.cache.stats();
    assert_eq!(hits, 2);
}
