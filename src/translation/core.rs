/*!
 * Core translation service implementation.
 *
 * This module contains the main TranslationService struct and its
 * implementation, which routes chunk translations, rewrites, ideation
 * bundles, and thumbnail generation to the configured AI provider.
 */

use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use bytes::Bytes;
use log::{debug, info};
use url::Url;

use super::cache::TranslationCache;
use super::ideation::{self, ViralIdea};
use super::styles::RewriteStyle;
use crate::app_config::{TranslationConfig, TranslationProvider as ConfigTranslationProvider};
use crate::errors::ProviderError;
use crate::providers::gemini::Gemini;
use crate::providers::ollama::Ollama;
use crate::providers::{CompletionRequest, Provider};

/// Validate an endpoint string as an absolute http(s) URL
fn validate_endpoint(endpoint: &str) -> Result<()> {
    if endpoint.is_empty() {
        return Err(anyhow!("Endpoint cannot be empty"));
    }

    let url = Url::parse(endpoint)
        .with_context(|| format!("Invalid endpoint URL: {}", endpoint))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(anyhow!("Endpoint must use http or https: {}", endpoint));
    }

    url.host_str()
        .ok_or_else(|| anyhow!("Invalid host in endpoint: {}", endpoint))?;

    Ok(())
}

/// Main translation service for subtitle and creator content
pub struct TranslationService {
    /// Provider implementation
    provider: Box<dyn Provider>,

    /// Configuration for the translation service
    pub config: TranslationConfig,

    /// Cache for storing and retrieving provider results
    pub cache: TranslationCache,
}

impl TranslationService {
    /// Create a new translation service from configuration
    pub fn from_config(config: &TranslationConfig) -> Result<Self> {
        let endpoint = config.get_endpoint();
        validate_endpoint(&endpoint)?;

        let provider: Box<dyn Provider> = match config.provider {
            ConfigTranslationProvider::Gemini => {
                let api_key = config.get_api_key();
                if api_key.is_empty() {
                    return Err(anyhow!(
                        "Gemini requires an API key; set it in the configuration file \
                         or the GEMINI_API_KEY environment variable"
                    ));
                }

                Box::new(Gemini::new_with_config(
                    endpoint,
                    api_key,
                    config.get_timeout_secs(),
                    config.get_rate_limit(),
                    config.get_image_model(),
                ))
            }
            ConfigTranslationProvider::Ollama => Box::new(Ollama::from_url_with_config(
                endpoint,
                config.get_timeout_secs(),
                config.get_rate_limit(),
            )),
        };

        Ok(Self {
            provider,
            config: config.clone(),
            cache: TranslationCache::new(config.common.cache_enabled),
        })
    }

    /// Create a service around an existing provider instance
    pub fn with_provider(provider: Box<dyn Provider>, config: TranslationConfig) -> Self {
        let cache = TranslationCache::new(config.common.cache_enabled);
        Self {
            provider,
            config,
            cache,
        }
    }

    /// Name of the active provider
    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Test the connection to the configured provider
    pub async fn test_connection(&self) -> Result<()> {
        info!(
            "Testing connection to {} with model {}",
            self.provider.name(),
            self.config.get_model()
        );

        self.provider
            .test_connection()
            .await
            .with_context(|| format!("Failed to connect to {}", self.provider.name()))?;

        info!("Successfully connected to {}", self.provider.name());
        Ok(())
    }

    /// Translate one block of SRT entries into the target language.
    ///
    /// The block is sent verbatim as the request body with a translation
    /// instruction as the system prompt, at temperature zero so repeated
    /// runs stay stable.
    pub async fn translate_block(
        &self,
        text: &str,
        target_language: &str,
    ) -> Result<String, ProviderError> {
        if text.trim().is_empty() {
            return Ok(String::new());
        }

        let model = self.config.get_model();
        if let Some(cached) = self.cache.get("chunk", &model, target_language, text) {
            return Ok(cached);
        }

        let system = format!(
            "Translate this SRT subtitle content to {}. Return only the raw translated \
             SRT content. Keep every sequence number and timestamp line exactly as it is. \
             Do not add commentary or code fences.",
            target_language
        );

        let request = CompletionRequest::new(&model, text)
            .system(system)
            .temperature(0.0);

        let start_time = Instant::now();
        let response = self.provider.complete(request).await?;
        debug!("Chunk response received in {:?}", start_time.elapsed());

        let translated = response.text.trim().to_string();
        if !translated.is_empty() {
            self.cache
                .store("chunk", &model, target_language, text, &translated);
        }

        Ok(translated)
    }

    /// Rewrite content in the given style, in the target language
    pub async fn rewrite(
        &self,
        text: &str,
        target_language: &str,
        style: RewriteStyle,
    ) -> Result<String, ProviderError> {
        if text.trim().is_empty() {
            return Ok(String::new());
        }

        let model = self.config.get_rewrite_model();
        let task = format!("rewrite:{}", style.as_str());
        if let Some(cached) = self.cache.get(&task, &model, target_language, text) {
            return Ok(cached);
        }

        let request = CompletionRequest::new(&model, text)
            .system(style.prompt(target_language))
            .temperature(self.config.common.temperature);

        let start_time = Instant::now();
        let response = self.provider.complete(request).await?;
        debug!(
            "{} rewrite response received in {:?}",
            style.display_name(),
            start_time.elapsed()
        );

        let rewritten = response.text.trim().to_string();
        if !rewritten.is_empty() {
            self.cache
                .store(&task, &model, target_language, text, &rewritten);
        }

        Ok(rewritten)
    }

    /// Generate a bundle of viral content ideas for a topic.
    ///
    /// The request carries a response schema so the provider returns a
    /// machine-readable JSON array of exactly `count` ideas.
    pub async fn ideation_bundle(
        &self,
        topic: &str,
        target_language: &str,
        count: usize,
    ) -> Result<Vec<ViralIdea>> {
        if topic.trim().is_empty() {
            return Err(anyhow!("Ideation topic cannot be empty"));
        }

        let model = self.config.get_model();
        let system = format!(
            "You are a short-form video strategist. Every idea must be immediately \
             filmable and optimized for viewer retention. Write every field in {}.",
            target_language
        );
        let prompt = format!(
            "Generate {} distinct short-video content strategies for the topic: \"{}\"",
            count, topic
        );

        let request = CompletionRequest::new(&model, prompt)
            .system(system)
            .temperature(self.config.common.temperature)
            .response_schema(ideation::bundle_schema(count));

        let start_time = Instant::now();
        let response = self.provider.complete(request).await?;
        debug!("Ideation response received in {:?}", start_time.elapsed());

        ideation::parse_bundle(&response.text)
    }

    /// Generate a thumbnail image for the given prompt
    pub async fn generate_thumbnail(&self, prompt: &str) -> Result<Bytes, ProviderError> {
        let start_time = Instant::now();
        let image = self.provider.generate_image(prompt).await?;
        debug!(
            "Thumbnail generated in {:?} ({} bytes)",
            start_time.elapsed(),
            image.len()
        );

        Ok(image)
    }
}
