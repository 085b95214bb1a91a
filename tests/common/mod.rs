/*!
 * Common test utilities for the creatorflow test suite
 */

use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use tempfile::TempDir;

use creatorflow::app_config::{Config, TranslationProvider};
use creatorflow::providers::mock::MockProvider;
use creatorflow::translation::TranslationService;

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &PathBuf, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Creates a sample subtitle file for testing
pub fn create_test_subtitle(dir: &PathBuf, filename: &str) -> Result<PathBuf> {
    create_test_file(dir, filename, sample_srt())
}

/// A three-entry SRT document used across tests
pub fn sample_srt() -> &'static str {
    r#"1
00:00:01,000 --> 00:00:04,000
This is a test subtitle.

2
00:00:05,000 --> 00:00:09,000
It contains multiple entries.

3
00:00:10,000 --> 00:00:14,000
For testing purposes.
"#
}

/// Builds an SRT document with `count` numbered entries
pub fn synthetic_srt(count: usize) -> String {
    let mut blocks = Vec::with_capacity(count);
    for i in 1..=count {
        blocks.push(format!(
            "{}\n00:00:{:02},000 --> 00:00:{:02},500\nSubtitle line number {}",
            i,
            i % 60,
            i % 60,
            i
        ));
    }
    blocks.join("\n\n")
}

/// Config suitable for tests: Ollama provider so no API key is needed
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.translation.provider = TranslationProvider::Ollama;
    config.target_language = "my".to_string();
    config
}

/// Service wired to a mock provider with the given behavior already applied
pub fn mock_service(provider: MockProvider) -> TranslationService {
    TranslationService::with_provider(Box::new(provider), test_config().translation)
}
