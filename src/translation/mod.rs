/*!
 * Translation service for subtitle and creator content using AI providers.
 *
 * This module contains the core functionality for translating subtitle
 * documents and rewriting creator content. It is split into several
 * submodules:
 *
 * - `core`: Core translation service definition and provider wiring
 * - `pipeline`: Sequential chunked translation driver with cancellation
 * - `cache`: Caching mechanisms for repeated requests
 * - `styles`: Rewrite style catalog and prompt construction
 * - `ideation`: Structured viral content idea generation
 */

// Re-export main types for easier usage
pub use self::core::TranslationService;
pub use self::ideation::ViralIdea;
pub use self::pipeline::{CancellationToken, ChunkPipeline, PipelineOptions};
pub use self::styles::RewriteStyle;

// Submodules
pub mod cache;
pub mod core;
pub mod ideation;
pub mod pipeline;
pub mod styles;
