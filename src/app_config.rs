use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Target language, as an ISO code or an English name
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Translation config
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Chunk pipeline config
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Override for the accounts database path
    #[serde(default)]
    pub database_path: Option<String>,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation provider type
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    // @provider: Google Gemini
    #[default]
    Gemini,
    // @provider: Ollama (local LLM)
    Ollama,
}

impl TranslationProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Gemini => "Gemini",
            Self::Ollama => "Ollama",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Gemini => "gemini".to_string(),
            Self::Ollama => "ollama".to_string(),
        }
    }
}

// Implement Display trait for TranslationProvider
impl std::fmt::Display for TranslationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

// Implement FromStr trait for TranslationProvider
impl std::str::FromStr for TranslationProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "gemini" => Ok(Self::Gemini),
            "ollama" => Ok(Self::Ollama),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Provider configuration wrapper
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    // @field: Provider type identifier
    #[serde(rename = "type")]
    pub provider_type: String,

    // @field: Model for chunk translation and ideation bundles
    #[serde(default = "String::new")]
    pub model: String,

    // @field: Model for styled long-form rewrites (falls back to model)
    #[serde(default)]
    pub rewrite_model: Option<String>,

    // @field: Model for thumbnail generation (providers without one reject the call)
    #[serde(default)]
    pub image_model: Option<String>,

    // @field: API key
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Service URL
    #[serde(default = "String::new")]
    pub endpoint: String,

    // @field: Timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    // @field: Rate limit (requests per minute)
    #[serde(default)]
    pub rate_limit: Option<u32>,
}

impl ProviderConfig {
    // @param provider_type: Provider enum
    // @returns: Provider config with defaults
    pub fn new(provider_type: TranslationProvider) -> Self {
        match provider_type {
            TranslationProvider::Gemini => Self {
                provider_type: "gemini".to_string(),
                model: default_gemini_model(),
                rewrite_model: Some(default_gemini_rewrite_model()),
                image_model: Some(default_gemini_image_model()),
                api_key: String::new(),
                endpoint: default_gemini_endpoint(),
                timeout_secs: default_gemini_timeout_secs(),
                rate_limit: default_gemini_rate_limit(),
            },
            TranslationProvider::Ollama => Self {
                provider_type: "ollama".to_string(),
                model: default_ollama_model(),
                rewrite_model: None,
                image_model: None,
                api_key: String::new(),
                endpoint: default_ollama_endpoint(),
                timeout_secs: default_timeout_secs(),
                rate_limit: default_ollama_rate_limit(),
            },
        }
    }
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Translation provider to use
    #[serde(default)]
    pub provider: TranslationProvider,

    /// Available translation providers
    #[serde(default)]
    pub available_providers: Vec<ProviderConfig>,

    /// Common translation settings
    #[serde(default)]
    pub common: TranslationCommonConfig,
}

/// Common translation settings applicable to all providers
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationCommonConfig {
    /// Temperature for styled rewrites and ideation (0.0 to 1.0).
    /// Chunk translation always runs at 0.0 for deterministic output.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Whether to keep an in-memory cache of completed chunk translations
    #[serde(default = "default_true")]
    pub cache_enabled: bool,
}

impl Default for TranslationCommonConfig {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            cache_enabled: true,
        }
    }
}

/// Chunk pipeline configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Maximum entries per translation chunk
    #[serde(default = "default_max_entries_per_chunk")]
    pub max_entries_per_chunk: usize,

    /// Minimum character count for a chunk response to be considered plausible
    #[serde(default = "default_min_plausible_chars")]
    pub min_plausible_chars: usize,

    /// Per-chunk retry count for failed requests. Zero keeps the
    /// fail-fast contract: the first failure aborts the whole operation.
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Backoff base for retries (in milliseconds), doubled on each attempt
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_entries_per_chunk: default_max_entries_per_chunk(),
            min_plausible_chars: default_min_plausible_chars(),
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_target_language() -> String {
    // Burmese, the product's primary audience
    "my".to_string()
}

fn default_max_entries_per_chunk() -> usize {
    30
}

fn default_min_plausible_chars() -> usize {
    10
}

fn default_retry_count() -> u32 {
    0 // Fail fast unless retries are explicitly enabled
}

fn default_retry_backoff_ms() -> u64 {
    1000 // 1 second base backoff time, doubled on each retry
}

fn default_temperature() -> f32 {
    0.3
}

fn default_true() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_gemini_timeout_secs() -> u64 {
    120 // Long-form rewrites can run well past the usual 30s
}

fn default_gemini_endpoint() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_ollama_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_gemini_model() -> String {
    "gemini-3-flash-preview".to_string()
}

fn default_gemini_rewrite_model() -> String {
    "gemini-3-pro-preview".to_string()
}

fn default_gemini_image_model() -> String {
    "gemini-2.5-flash-image".to_string()
}

fn default_ollama_model() -> String {
    "llama2".to_string()
}

fn default_gemini_rate_limit() -> Option<u32> {
    // Stay below the free-tier 15 requests per minute
    Some(12)
}

fn default_ollama_rate_limit() -> Option<u32> {
    None // No rate limit by default for local provider
}

/// Environment variable consulted when the Gemini API key is not configured
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        // Validate target language
        crate::language_utils::validate_language(&self.target_language)?;

        // Chunk size below 1 cannot batch anything
        if self.pipeline.max_entries_per_chunk == 0 {
            return Err(anyhow!("pipeline.max_entries_per_chunk must be at least 1"));
        }

        // Validate API key for hosted providers
        if self.translation.provider == TranslationProvider::Gemini {
            let api_key = self.translation.get_api_key();
            if api_key.is_empty() {
                return Err(anyhow!(
                    "Translation API key is required for the Gemini provider (set it in the config or via {})",
                    GEMINI_API_KEY_ENV
                ));
            }
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            target_language: default_target_language(),
            translation: TranslationConfig::default(),
            pipeline: PipelineConfig::default(),
            database_path: None,
            log_level: LogLevel::default(),
        }
    }
}

impl TranslationConfig {
    /// Get the active provider configuration from the available_providers array
    pub fn get_active_provider_config(&self) -> Option<&ProviderConfig> {
        let provider_str = self.provider.to_lowercase_string();
        self.available_providers
            .iter()
            .find(|p| p.provider_type == provider_str)
    }

    /// Get a specific provider configuration by type for testing
    pub fn get_provider_config(&self, provider_type: &TranslationProvider) -> Option<&ProviderConfig> {
        let provider_str = provider_type.to_lowercase_string();
        self.available_providers
            .iter()
            .find(|p| p.provider_type == provider_str)
    }

    /// Get the chunk translation model for the active provider
    pub fn get_model(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.model.is_empty() {
                return provider_config.model.clone();
            }
        }

        // Default fallback based on provider type
        match self.provider {
            TranslationProvider::Gemini => default_gemini_model(),
            TranslationProvider::Ollama => default_ollama_model(),
        }
    }

    /// Get the rewrite model for the active provider, falling back to the
    /// chunk translation model
    pub fn get_rewrite_model(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if let Some(model) = &provider_config.rewrite_model {
                if !model.is_empty() {
                    return model.clone();
                }
            }
        }

        match self.provider {
            TranslationProvider::Gemini => default_gemini_rewrite_model(),
            TranslationProvider::Ollama => self.get_model(),
        }
    }

    /// Get the image model for the active provider, when it has one
    pub fn get_image_model(&self) -> Option<String> {
        if let Some(provider_config) = self.get_active_provider_config() {
            if let Some(model) = &provider_config.image_model {
                if !model.is_empty() {
                    return Some(model.clone());
                }
            }
        }

        match self.provider {
            TranslationProvider::Gemini => Some(default_gemini_image_model()),
            TranslationProvider::Ollama => None,
        }
    }

    /// Get the API key for the active provider.
    /// Falls back to the GEMINI_API_KEY environment variable for Gemini.
    pub fn get_api_key(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.api_key.is_empty() {
                return provider_config.api_key.clone();
            }
        }

        if self.provider == TranslationProvider::Gemini {
            if let Ok(key) = std::env::var(GEMINI_API_KEY_ENV) {
                return key;
            }
        }

        // Ollama doesn't use API keys
        String::new()
    }

    /// Get the endpoint for the active provider
    pub fn get_endpoint(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.endpoint.is_empty() {
                return provider_config.endpoint.clone();
            }
        }

        match self.provider {
            TranslationProvider::Gemini => default_gemini_endpoint(),
            TranslationProvider::Ollama => default_ollama_endpoint(),
        }
    }

    /// Get the request timeout for the active provider
    pub fn get_timeout_secs(&self) -> u64 {
        if let Some(provider_config) = self.get_active_provider_config() {
            if provider_config.timeout_secs > 0 {
                return provider_config.timeout_secs;
            }
        }

        match self.provider {
            TranslationProvider::Gemini => default_gemini_timeout_secs(),
            TranslationProvider::Ollama => default_timeout_secs(),
        }
    }

    /// Get the rate limit for the active provider
    pub fn get_rate_limit(&self) -> Option<u32> {
        if let Some(provider_config) = self.get_active_provider_config() {
            return provider_config.rate_limit;
        }

        match self.provider {
            TranslationProvider::Gemini => default_gemini_rate_limit(),
            TranslationProvider::Ollama => default_ollama_rate_limit(),
        }
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        let mut config = Self {
            provider: TranslationProvider::default(),
            available_providers: Vec::new(),
            common: TranslationCommonConfig::default(),
        };

        // Add default providers
        config
            .available_providers
            .push(ProviderConfig::new(TranslationProvider::Gemini));
        config
            .available_providers
            .push(ProviderConfig::new(TranslationProvider::Ollama));

        config
    }
}
