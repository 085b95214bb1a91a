/*!
 * Sequential chunked translation driver.
 *
 * The pipeline batches a subtitle document into fixed-size chunks and
 * translates them strictly in order, one request at a time. Progress is
 * reported before each chunk is submitted, cancellation is honored at
 * chunk boundaries, and any chunk failure aborts the whole run with no
 * partial output.
 */

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};

use crate::app_config::PipelineConfig;
use crate::errors::PipelineError;
use crate::subtitle_processor::SubtitleDocument;
use crate::translation::TranslationService;

/// Options controlling chunking, plausibility, and retry behavior
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Maximum number of subtitle entries per chunk
    pub max_entries_per_chunk: usize,

    /// Minimum character count for a chunk result to be accepted
    pub min_plausible_chars: usize,

    /// Number of retry attempts per chunk; zero fails fast
    pub retry_count: u32,

    /// Base backoff in milliseconds, doubled per attempt
    pub retry_backoff_ms: u64,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            max_entries_per_chunk: 30,
            min_plausible_chars: 10,
            retry_count: 0,
            retry_backoff_ms: 1000,
        }
    }
}

impl From<&PipelineConfig> for PipelineOptions {
    fn from(config: &PipelineConfig) -> Self {
        Self {
            max_entries_per_chunk: config.max_entries_per_chunk,
            min_plausible_chars: config.min_plausible_chars,
            retry_count: config.retry_count,
            retry_backoff_ms: config.retry_backoff_ms,
        }
    }
}

/// Shared flag for cancelling a run between chunks.
///
/// Clones observe the same flag, so a token handed to a signal handler
/// stops the pipeline that holds the original.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a new, uncancelled token
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Sequential chunk translation driver
pub struct ChunkPipeline {
    options: PipelineOptions,
    cancel_token: CancellationToken,
}

impl ChunkPipeline {
    /// Create a pipeline with the given options
    pub fn new(options: PipelineOptions) -> Self {
        Self {
            options,
            cancel_token: CancellationToken::new(),
        }
    }

    /// Attach an externally held cancellation token
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel_token = token;
        self
    }

    /// Get a clone of the pipeline's cancellation token
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    /// Translate a whole document into the target language.
    ///
    /// `progress` is invoked with the one-based chunk number and the total
    /// chunk count immediately before each chunk is submitted. An empty
    /// document returns an empty string without any provider calls.
    pub async fn translate_document(
        &self,
        document: &SubtitleDocument,
        service: &TranslationService,
        target_language: &str,
        progress: impl Fn(usize, usize) + Send,
    ) -> Result<String, PipelineError> {
        let chunks = document.chunks(self.options.max_entries_per_chunk);
        if chunks.is_empty() {
            debug!("Empty document, nothing to translate");
            return Ok(String::new());
        }

        let total = chunks.len();
        info!(
            "Translating {} entries in {} chunks of up to {}",
            document.len(),
            total,
            self.options.max_entries_per_chunk
        );

        let mut translated: Vec<String> = Vec::with_capacity(total);
        for (index, chunk) in chunks.iter().enumerate() {
            let current = index + 1;

            if self.cancel_token.is_cancelled() {
                warn!("Translation cancelled before chunk {} of {}", current, total);
                return Err(PipelineError::Cancelled {
                    chunk: current,
                    total,
                });
            }

            progress(current, total);

            let block = chunk.join("\n\n");
            let result = self
                .translate_chunk(&block, service, target_language, current, total)
                .await?;
            translated.push(result);
        }

        Ok(translated.join("\n\n"))
    }

    /// Translate a single chunk, retrying up to the configured attempt count
    async fn translate_chunk(
        &self,
        block: &str,
        service: &TranslationService,
        target_language: &str,
        current: usize,
        total: usize,
    ) -> Result<String, PipelineError> {
        let mut attempt: u32 = 0;

        loop {
            let failure = match service.translate_block(block, target_language).await {
                Ok(text) => {
                    let trimmed = text.trim().to_string();
                    let length = trimmed.chars().count();
                    if length >= self.options.min_plausible_chars {
                        debug!("Chunk {} of {} translated ({} chars)", current, total, length);
                        return Ok(trimmed);
                    }

                    PipelineError::ImplausibleResult {
                        chunk: current,
                        total,
                        length,
                        min: self.options.min_plausible_chars,
                    }
                }
                Err(source) => PipelineError::ChunkFailed {
                    chunk: current,
                    total,
                    source,
                },
            };

            if attempt >= self.options.retry_count {
                return Err(failure);
            }

            attempt += 1;
            let backoff_ms = self
                .options
                .retry_backoff_ms
                .saturating_mul(1u64 << (attempt - 1).min(16));
            warn!(
                "{}; retrying in {}ms (attempt {} of {})",
                failure, backoff_ms, attempt, self.options.retry_count
            );
            tokio::time::sleep(Duration::from_millis(backoff_ms)).await;

            if self.cancel_token.is_cancelled() {
                return Err(PipelineError::Cancelled {
                    chunk: current,
                    total,
                });
            }
        }
    }
}

impl Default for ChunkPipeline {
    fn default() -> Self {
        Self::new(PipelineOptions::default())
    }
}
