use anyhow::{Context, Result};
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Once;
use std::time::Duration;
use futures::future::join_all;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use crate::app_config::Config;
use crate::file_utils::{FileManager, FileType};
use crate::language_utils;
use crate::providers::mock::MockProvider;
use crate::subtitle_processor::{strip_srt_markup, SubtitleDocument};
use crate::translation::{
    CancellationToken, ChunkPipeline, PipelineOptions, RewriteStyle, TranslationService,
};

// @module: Application controller for creator workflows

/// Main application controller for translation, rewrites and ideation
pub struct Controller {
    // @field: App configuration
    pub config: Config,
    // @field: Provider-backed translation service
    service: TranslationService,
    // @field: Cancellation flag shared with signal handlers
    cancel_token: CancellationToken,
}

impl Controller {
    /// Create a new controller for test purposes with a mock provider
    pub fn new_for_test() -> Result<Self> {
        let config = Config::default();
        let service = TranslationService::with_provider(
            Box::new(MockProvider::working()),
            config.translation.clone(),
        );
        Ok(Self::with_service(config, service))
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        // Create translation service from config
        let service = TranslationService::from_config(&config.translation)?;
        Ok(Self::with_service(config, service))
    }

    /// Create a controller around an existing service instance
    pub fn with_service(config: Config, service: TranslationService) -> Self {
        Self {
            config,
            service,
            cancel_token: CancellationToken::new(),
        }
    }

    /// Check if the controller is properly initialized with configuration
    pub fn is_initialized(&self) -> bool {
        !self.config.target_language.is_empty()
    }

    /// Get a clone of the token that stops in-flight work between chunks
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    /// Run the translation workflow for a single subtitle file
    pub async fn run(
        &self,
        input_file: PathBuf,
        output_dir: PathBuf,
        force_overwrite: bool,
        plain_text: bool,
    ) -> Result<()> {
        let multi_progress = MultiProgress::new();
        self.run_with_progress(input_file, output_dir, &multi_progress, force_overwrite, plain_text)
            .await
    }

    /// Run the translation workflow with progress reporting
    async fn run_with_progress(
        &self,
        input_file: PathBuf,
        output_dir: PathBuf,
        multi_progress: &MultiProgress,
        force_overwrite: bool,
        plain_text: bool,
    ) -> Result<()> {
        // Check if the input file exists
        if !input_file.exists() {
            return Err(anyhow::anyhow!("Input file does not exist: {:?}", input_file));
        }

        // Ensure the output directory exists
        FileManager::ensure_dir(&output_dir)?;

        // Output files are tagged with the short language code: movie.srt -> movie.my.srt
        let lang_code = language_utils::short_code(&self.config.target_language)?;
        let output_path =
            FileManager::generate_output_path(&input_file, &output_dir, &lang_code, "srt");
        if output_path.exists() && !force_overwrite {
            // Skip if translation already exists and no force flag
            warn!("Skipping file, translation already exists (use -f to force overwrite)");
            return Ok(());
        }

        if FileManager::detect_file_type(&input_file)? != FileType::Subtitle {
            return Err(anyhow::anyhow!(
                "Not an SRT subtitle file: {:?}",
                input_file
            ));
        }

        // Parse the subtitle file into opaque entries
        let content = FileManager::read_to_string(&input_file)?;
        let document = SubtitleDocument::parse(&content);
        if document.is_empty() {
            warn!("No subtitle entries found in {:?}, nothing to translate", input_file);
            return Ok(());
        }

        // Fire a connection test in the background once per process; a
        // broken setup still fails on the first chunk with a clearer error
        static INIT_TEST: Once = Once::new();
        INIT_TEST.call_once(|| {
            let translation_config = self.config.translation.clone();
            tokio::spawn(async move {
                if let Ok(service) = TranslationService::from_config(&translation_config) {
                    let _ = service.test_connection().await;
                }
            });
        });

        // Translate the document chunk by chunk
        let (translated, translation_duration) = self
            .translate_document_with_progress(&document, multi_progress)
            .await?;

        // Save the translated subtitles; nothing is written on failure
        FileManager::write_to_file(&output_path, &format!("{}\n", translated))?;
        info!("Success: {}", output_path.display());

        // Optionally project the translation to plain text (no sequence
        // numbers, no timestamps) for scripts and descriptions
        if plain_text {
            let plain_path =
                FileManager::generate_output_path(&input_file, &output_dir, &lang_code, "txt");
            let plain = strip_srt_markup(&translated);
            FileManager::write_to_file(&plain_path, &format!("{}\n", plain))?;
            info!("Success: {}", plain_path.display());
        }

        info!(
            "Translation completed in {}.",
            Self::format_duration(translation_duration)
        );

        Ok(())
    }

    /// Internal method to translate a document with a progress bar from the provided MultiProgress
    async fn translate_document_with_progress(
        &self,
        document: &SubtitleDocument,
        multi_progress: &MultiProgress,
    ) -> Result<(String, Duration)> {
        // Start timing the translation process
        let translation_start_time = std::time::Instant::now();

        // Build the pipeline from config, sharing the controller's cancellation token
        let options = PipelineOptions::from(&self.config.pipeline);
        let total_chunks = document.chunks(options.max_entries_per_chunk).len() as u64;
        let pipeline = ChunkPipeline::new(options).with_cancellation(self.cancel_token.clone());

        // Create a progress bar for translation tracking
        let progress_bar = multi_progress.add(ProgressBar::new(total_chunks));
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} chunks ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result.progress_chars("█▓▒░"));

        // Log that we're starting translation with provider and model info
        info!(
            "🚀 creatorflow: {} - {}",
            self.config.translation.provider.display_name(),
            self.config.translation.get_model()
        );

        let target_language = language_utils::display_name(&self.config.target_language)?;
        info!("Translating to {}, please wait…", target_language);
        progress_bar.set_message("Translating");

        // Progress fires before each chunk is submitted, so the bar shows
        // completed chunks while the current one is in flight
        let pb = progress_bar.clone();
        let result = pipeline
            .translate_document(document, &self.service, &target_language, move |current, total| {
                pb.set_position((current - 1) as u64);
                pb.set_message(format!("chunk {}/{}", current, total));
            })
            .await;

        // Finish and clear the progress bar instead of just finishing it
        // This ensures only the folder progress bar remains visible when processing multiple files
        progress_bar.finish_and_clear();

        let translated = result?;

        // Log cache effectiveness when repeated runs actually hit it
        let (hits, _misses, hit_rate) = self.service.cache.stats();
        if hits > 0 {
            info!("Cache: {} hits ({:.0}% hit rate)", hits, hit_rate * 100.0);
        }

        let translation_elapsed = translation_start_time.elapsed();
        Ok((translated, translation_elapsed))
    }

    /// Run the workflow in folder mode, processing all subtitle files in a directory
    /// Files that already have translated subtitles will be skipped
    pub async fn run_folder(
        &self,
        input_dir: PathBuf,
        force_overwrite: bool,
        plain_text: bool,
    ) -> Result<()> {
        // Start timing the process
        let start_time = std::time::Instant::now();

        // Check if the input directory exists
        if !input_dir.exists() {
            return Err(anyhow::anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let lang_code = language_utils::short_code(&self.config.target_language)?;
        let lang_tag = format!(".{}", lang_code);

        // Find all subtitle files in the directory (recursive), leaving out
        // files this tool produced earlier so outputs never feed back in
        let subtitle_files: Vec<PathBuf> = FileManager::find_files(&input_dir, "srt")?
            .into_iter()
            .filter(|path| {
                path.file_stem()
                    .map(|stem| !stem.to_string_lossy().ends_with(&lang_tag))
                    .unwrap_or(true)
            })
            .collect();

        // If no subtitle files found, return error
        if subtitle_files.is_empty() {
            return Err(anyhow::anyhow!(
                "No subtitle files found in directory: {:?}",
                input_dir
            ));
        }

        // Create multi-progress instance for multiple file processing
        let multi_progress = MultiProgress::new();

        // Create a progress bar for folder processing
        let folder_pb = multi_progress.add(ProgressBar::new(subtitle_files.len() as u64));
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        folder_pb.set_style(template_result.progress_chars("█▓▒░"));
        folder_pb.set_message("Processing files");

        // Track success and failure counts
        let mut success_count = 0;
        let mut error_count = 0;
        let mut skip_count = 0;

        // Process each subtitle file
        for subtitle_file in subtitle_files.iter() {
            // Get the file name for display
            let file_name = subtitle_file
                .file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string());

            // Update the folder progress bar to show current file
            folder_pb.set_message(format!("Processing: {}", file_name));

            // Outputs land next to their inputs
            let output_dir = match subtitle_file.parent() {
                Some(parent) => parent.to_path_buf(),
                None => input_dir.clone(),
            };

            // Check if translation already exists
            let output_path =
                FileManager::generate_output_path(subtitle_file, &output_dir, &lang_code, "srt");
            if output_path.exists() && !force_overwrite {
                // Skip if translation already exists and no force flag
                warn!("Skipping file, translation already exists (use -f to force overwrite)");
                skip_count += 1;
                folder_pb.inc(1);
                continue;
            }

            // Run the translation for this file
            match self
                .run_with_progress(
                    subtitle_file.clone(),
                    output_dir,
                    &multi_progress,
                    force_overwrite,
                    plain_text,
                )
                .await
            {
                Ok(_) => {
                    success_count += 1;
                }
                Err(_) if self.cancel_token.is_cancelled() => {
                    warn!("Cancelled while processing {}, stopping folder run", file_name);
                    break;
                }
                Err(e) => {
                    error!("Error processing file {}: {}", file_name, e);
                    error_count += 1;
                }
            }

            // Update the folder progress bar
            folder_pb.inc(1);
        }

        // Finish the folder progress bar
        folder_pb.finish_with_message("Folder processing complete");

        // Give summary results - important for batch operations
        let duration = start_time.elapsed();
        info!(
            "Folder processing completed: {} processed, {} skipped, {} errors - Duration: {}",
            success_count,
            skip_count,
            error_count,
            Self::format_duration(duration)
        );

        Ok(())
    }

    /// Rewrite a transcript file in the given editorial style
    pub async fn run_rewrite(
        &self,
        input_file: PathBuf,
        output_dir: PathBuf,
        style: RewriteStyle,
        force_overwrite: bool,
    ) -> Result<()> {
        let start_time = std::time::Instant::now();

        if !input_file.exists() {
            return Err(anyhow::anyhow!("Input file does not exist: {:?}", input_file));
        }

        FileManager::ensure_dir(&output_dir)?;

        // Tag rewrites with both the style and the language: movie.recap.my.txt
        let lang_code = language_utils::short_code(&self.config.target_language)?;
        let tag = format!("{}.{}", style.as_str(), lang_code);
        let extension = if style.emits_json() { "json" } else { "txt" };
        let output_path =
            FileManager::generate_output_path(&input_file, &output_dir, &tag, extension);
        if output_path.exists() && !force_overwrite {
            warn!("Skipping file, rewrite already exists (use -f to force overwrite)");
            return Ok(());
        }

        // Rewrites run on plain transcript text, so SRT inputs are projected first
        let content = FileManager::read_to_string(&input_file)?;
        let source = if FileManager::detect_file_type(&input_file)? == FileType::Subtitle {
            strip_srt_markup(&content)
        } else {
            content
        };
        if source.trim().is_empty() {
            return Err(anyhow::anyhow!("Input file is empty: {:?}", input_file));
        }

        info!(
            "🚀 creatorflow: {} - {}",
            self.config.translation.provider.display_name(),
            self.config.translation.get_rewrite_model()
        );

        let target_language = language_utils::display_name(&self.config.target_language)?;
        info!(
            "Rewriting as {} in {}, please wait…",
            style.display_name(),
            target_language
        );

        let rewritten = self
            .service
            .rewrite(&source, &target_language, style)
            .await
            .with_context(|| format!("{} rewrite failed", style.display_name()))?;
        if rewritten.trim().is_empty() {
            return Err(anyhow::anyhow!("Provider returned an empty rewrite"));
        }

        FileManager::write_to_file(&output_path, &format!("{}\n", rewritten))?;
        info!("Success: {}", output_path.display());
        info!(
            "Rewrite completed in {}.",
            Self::format_duration(start_time.elapsed())
        );

        Ok(())
    }

    /// Generate an ideation bundle for a topic, with optional thumbnails.
    ///
    /// The bundle is printed to stdout as pretty JSON unless an output file
    /// is given. Thumbnail generation is best-effort per idea; a failed
    /// image never discards the bundle itself.
    pub async fn run_ideation(
        &self,
        topic: &str,
        count: usize,
        output_file: Option<PathBuf>,
        thumbnail_dir: Option<PathBuf>,
    ) -> Result<()> {
        let start_time = std::time::Instant::now();

        if topic.trim().is_empty() {
            return Err(anyhow::anyhow!("Ideation topic cannot be empty"));
        }
        if count == 0 {
            return Err(anyhow::anyhow!("Idea count must be at least 1"));
        }

        info!(
            "🚀 creatorflow: {} - {}",
            self.config.translation.provider.display_name(),
            self.config.translation.get_model()
        );

        let target_language = language_utils::display_name(&self.config.target_language)?;
        info!(
            "Generating {} ideas for \"{}\" in {}, please wait…",
            count, topic, target_language
        );

        let ideas = self
            .service
            .ideation_bundle(topic, &target_language, count)
            .await?;

        let json = serde_json::to_string_pretty(&ideas)?;
        match &output_file {
            Some(path) => {
                FileManager::write_to_file(path, &format!("{}\n", json))?;
                info!("Success: {}", path.display());
            }
            None => println!("{}", json),
        }

        if let Some(dir) = thumbnail_dir {
            self.generate_thumbnails(&ideas, &dir).await?;
        }

        info!(
            "Ideation completed in {}.",
            Self::format_duration(start_time.elapsed())
        );

        Ok(())
    }

    /// Generate one thumbnail per idea, concurrently
    async fn generate_thumbnails(
        &self,
        ideas: &[crate::translation::ViralIdea],
        output_dir: &Path,
    ) -> Result<()> {
        FileManager::ensure_dir(output_dir)?;
        info!("Generating {} thumbnails…", ideas.len());

        let tasks = ideas.iter().enumerate().map(|(index, idea)| async move {
            let image = self
                .service
                .generate_thumbnail(&idea.thumb_prompt_with_text)
                .await;
            (index, image)
        });

        let mut generated = 0;
        for (index, result) in join_all(tasks).await {
            match result {
                Ok(image) => {
                    let path = output_dir.join(format!("idea-{:02}.png", index + 1));
                    FileManager::write_bytes(&path, &image)?;
                    info!("Thumbnail: {}", path.display());
                    generated += 1;
                }
                Err(e) => warn!("Thumbnail {} failed: {}", index + 1, e),
            }
        }

        info!("Generated {} of {} thumbnails", generated, ideas.len());
        Ok(())
    }

    // Format duration in a human-readable format (HH:MM:SS)
    fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
