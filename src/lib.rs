/*!
 * # creatorflow
 *
 * A Rust library and CLI for creator workflows built on generative AI
 * backends.
 *
 * ## Features
 *
 * - Chunked translation of SRT subtitle documents with strict sequential
 *   processing, progress reporting and fail-fast error handling
 * - Plain-text projection of SRT content (sequence numbers and timestamps
 *   stripped)
 * - Styled long-form rewrites (pure, insights, hooks, recap, music guide)
 * - Viral ideation bundles with optional thumbnail generation
 * - Multi-user account directory with salted password hashing and
 *   session tokens, backed by SQLite or an in-memory store
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `subtitle_processor`: Entry parsing, chunk batching and projection
 * - `translation`: AI-powered translation services:
 *   - `translation::pipeline`: Sequential chunk translation driver
 *   - `translation::core`: Provider-backed translation service
 *   - `translation::cache`: Caching mechanisms for translations
 *   - `translation::styles`: Editorial rewrite styles
 *   - `translation::ideation`: Content strategy bundles
 * - `accounts`: User directory, password hashing and session management
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `language_utils`: ISO language code utilities
 * - `providers`: Client implementations for generative AI backends:
 *   - `providers::gemini`: Google Gemini API client
 *   - `providers::ollama`: Ollama API client
 *   - `providers::mock`: Behavior-driven test double
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod accounts;
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod providers;
pub mod subtitle_processor;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use errors::{AccountError, AppError, PipelineError, ProviderError};
pub use subtitle_processor::{strip_srt_markup, SubtitleDocument};
pub use translation::pipeline::{CancellationToken, ChunkPipeline, PipelineOptions};
pub use translation::TranslationService;
