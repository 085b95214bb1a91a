// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::too_many_arguments)]
// Add other lints specific to this module that you want to allow but not auto-fix

use anyhow::{Result, anyhow, Context};
use log::{warn, info, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::{Path, PathBuf};
use std::io::Write;
use std::fs::File;
use std::io::BufReader;
use clap::{Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use crate::accounts::{AccountRepository, DatabaseConnection, SessionManager, UserRole};
use crate::app_config::{Config, LogLevel, TranslationProvider};
use crate::app_controller::Controller;
use crate::translation::RewriteStyle;

mod accounts;
mod app_config;
mod translation;
mod subtitle_processor;
mod file_utils;
mod app_controller;
mod language_utils;
mod providers;
mod errors;

/// CLI Wrapper for TranslationProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationProvider {
    Gemini,
    Ollama,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::Gemini => TranslationProvider::Gemini,
            CliTranslationProvider::Ollama => TranslationProvider::Ollama,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

/// CLI Wrapper for RewriteStyle to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliRewriteStyle {
    Pure,
    Insights,
    Hooks,
    Recap,
    MusicGuide,
}

impl From<CliRewriteStyle> for RewriteStyle {
    fn from(cli_style: CliRewriteStyle) -> Self {
        match cli_style {
            CliRewriteStyle::Pure => RewriteStyle::Pure,
            CliRewriteStyle::Insights => RewriteStyle::Insights,
            CliRewriteStyle::Hooks => RewriteStyle::Hooks,
            CliRewriteStyle::Recap => RewriteStyle::Recap,
            CliRewriteStyle::MusicGuide => RewriteStyle::MusicGuide,
        }
    }
}

/// CLI Wrapper for UserRole to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliUserRole {
    Member,
    Admin,
}

impl From<CliUserRole> for UserRole {
    fn from(cli_role: CliUserRole) -> Self {
        match cli_role {
            CliUserRole::Member => UserRole::Member,
            CliUserRole::Admin => UserRole::Admin,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate SRT subtitles chunk by chunk (default command)
    Translate(TranslateArgs),

    /// Rewrite a transcript in an editorial style
    Rewrite(RewriteArgs),

    /// Generate viral video ideas with optional thumbnails
    Hooks(HooksArgs),

    /// Manage the shared account directory
    Users(UsersArgs),

    /// Generate shell completions for creatorflow
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct TranslateArgs {
    /// Input subtitle file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Translation provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Model name to use for translation
    #[arg(short, long)]
    model: Option<String>,

    /// Target language code or name (e.g., 'my', 'th', 'Spanish')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Also write a plain-text transcript next to the translated SRT
    #[arg(long)]
    plain_text: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

#[derive(Parser, Debug)]
struct RewriteArgs {
    /// Input transcript or subtitle file to rewrite
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Rewrite style to apply
    #[arg(short, long, value_enum, default_value = "pure")]
    style: CliRewriteStyle,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Translation provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Model name to use for the rewrite
    #[arg(short, long)]
    model: Option<String>,

    /// Target language code or name (e.g., 'my', 'th', 'Spanish')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

#[derive(Parser, Debug)]
struct HooksArgs {
    /// Topic to generate content ideas for
    #[arg(value_name = "TOPIC")]
    topic: String,

    /// Number of ideas to generate
    #[arg(short = 'n', long, default_value_t = 5)]
    count: usize,

    /// Write the idea bundle to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Generate one thumbnail per idea into this directory
    #[arg(long, num_args = 0..=1, default_missing_value = "thumbnails")]
    thumbnails: Option<PathBuf>,

    /// Translation provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Model name to use for ideation
    #[arg(short, long)]
    model: Option<String>,

    /// Target language code or name (e.g., 'my', 'th', 'Spanish')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

#[derive(Parser, Debug)]
struct UsersArgs {
    #[command(subcommand)]
    action: UsersAction,

    /// Account database path (overrides the configured one)
    #[arg(long)]
    database: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

#[derive(Subcommand, Debug)]
enum UsersAction {
    /// Seed an empty account directory with its first admin
    Init {
        /// Username for the first admin account
        #[arg(long, default_value = "admin")]
        username: String,

        /// Password for the first admin account
        #[arg(long)]
        password: String,
    },

    /// Create a new account
    Add {
        /// Username for the new account
        username: String,

        /// Password for the new account
        #[arg(long)]
        password: String,

        /// Role for the new account
        #[arg(long, value_enum, default_value = "member")]
        role: CliUserRole,
    },

    /// Delete an account
    Remove {
        /// Username of the account to delete
        username: String,
    },

    /// List all accounts
    List,

    /// Replace an account's password
    Passwd {
        /// Username of the account to update
        username: String,

        /// New password
        #[arg(long)]
        password: String,
    },

    /// Verify credentials and print a session token
    Login {
        /// Username to log in as
        username: String,

        /// Password for the account
        #[arg(long)]
        password: String,

        /// Session lifetime in days
        #[arg(long, default_value_t = 30)]
        ttl_days: i64,
    },

    /// Invalidate a session token
    Logout {
        /// Session token to revoke
        token: String,
    },

    /// List sessions, dropping expired ones first
    Sessions,
}

/// creatorflow - AI workflows for video creators
///
/// Translates SRT subtitles in ordered chunks, rewrites transcripts in
/// editorial styles, and generates viral content ideas using AI providers
/// (Gemini, Ollama).
#[derive(Parser, Debug)]
#[command(name = "creatorflow")]
#[command(author = "creatorflow contributors")]
#[command(version = "0.9.0")]
#[command(about = "AI-powered subtitle translation and creator content tool")]
#[command(long_about = "creatorflow translates SRT subtitles chunk by chunk and reworks creator content using AI providers.

EXAMPLES:
    creatorflow movie.srt                         # Translate using default config
    creatorflow -f movie.srt                      # Force overwrite existing files
    creatorflow -p ollama -m llama2 movie.srt     # Use specific provider and model
    creatorflow -t th movie.srt                   # Translate to Thai
    creatorflow --plain-text movie.srt            # Also write a plain-text transcript
    creatorflow /subs/                            # Process entire directory
    creatorflow rewrite -s recap movie.srt        # Retell the transcript as a story
    creatorflow hooks \"passive income myths\"      # Generate five video ideas
    creatorflow users init --password <pw>        # Seed the account directory
    creatorflow completions bash                  # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically. The Gemini API key can be set in the config
    file or via the GEMINI_API_KEY environment variable.

SUPPORTED PROVIDERS:
    gemini - Google Gemini API (default, requires API key)
    ollama - Local Ollama server (default: llama2)")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input subtitle file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Translation provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Model name to use for translation
    #[arg(short, long)]
    model: Option<String>,

    /// Target language code or name (e.g., 'my', 'th', 'Spanish')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Also write a plain-text transcript next to the translated SRT
    #[arg(long)]
    plain_text: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");

            let mut stderr = std::io::stderr();
            let _ = match record.level() {
                Level::Error => {
                    let emoji = Self::get_emoji_for_level(record.level());
                    writeln!(
                        stderr,
                        "\x1B[1;31m{} {} {}\x1B[0m",
                        now, emoji, record.args()
                    )
                },
                Level::Warn => {
                    let emoji = Self::get_emoji_for_level(record.level());
                    writeln!(
                        stderr,
                        "\x1B[1;33m{} {} {}\x1B[0m",
                        now, emoji, record.args()
                    )
                },
                Level::Info => {
                    let emoji = Self::get_emoji_for_level(record.level());
                    writeln!(
                        stderr,
                        "\x1B[1;32m{} {} {}\x1B[0m",
                        now, emoji, record.args()
                    )
                },
                Level::Debug => {
                    let emoji = Self::get_emoji_for_level(record.level());
                    writeln!(
                        stderr,
                        "\x1B[1;36m{} {} {}\x1B[0m",
                        now, emoji, record.args()
                    )
                },
                Level::Trace => {
                    let emoji = Self::get_emoji_for_level(record.level());
                    writeln!(
                        stderr,
                        "\x1B[1;35m{} {} {}\x1B[0m",
                        now, emoji, record.args()
                    )
                },
            };
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    // Handle subcommands
    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "creatorflow", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Translate(args)) => run_translate(args).await,
        Some(Commands::Rewrite(args)) => run_rewrite(args).await,
        Some(Commands::Hooks(args)) => run_hooks(args).await,
        Some(Commands::Users(args)) => run_users(args).await,
        None => {
            // Default behavior - use top-level args for backwards compatibility
            let input_path = cli.input_path.ok_or_else(|| {
                anyhow!("INPUT_PATH is required when no subcommand is specified")
            })?;

            let translate_args = TranslateArgs {
                input_path,
                force_overwrite: cli.force_overwrite,
                provider: cli.provider,
                model: cli.model,
                target_language: cli.target_language,
                plain_text: cli.plain_text,
                config_path: cli.config_path,
                log_level: cli.log_level,
            };
            run_translate(translate_args).await
        }
    }
}

/// Map a config log level to the log crate's filter
fn level_filter(level: &LogLevel) -> LevelFilter {
    match level {
        LogLevel::Error => LevelFilter::Error,
        LogLevel::Warn => LevelFilter::Warn,
        LogLevel::Info => LevelFilter::Info,
        LogLevel::Debug => LevelFilter::Debug,
        LogLevel::Trace => LevelFilter::Trace,
    }
}

/// Load the configuration file, creating a default one when it is missing
fn load_or_create_config(config_path: &str, log_level: Option<&CliLogLevel>) -> Result<Config> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = log_level {
        log::set_max_level(level_filter(&cmd_log_level.clone().into()));
    }

    let mut config = if Path::new(config_path).exists() {
        // Load existing configuration
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?;

        config
    } else {
        // Create default configuration if not exists
        warn!("Config file not found at '{}', creating default config.", config_path);

        let config = Config::default();

        // Save default config
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;

        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        config
    };

    // Update log level in config if specified via command line
    if let Some(cmd_log_level) = log_level {
        config.log_level = cmd_log_level.clone().into();
    } else {
        // Otherwise the config decides the level
        log::set_max_level(level_filter(&config.log_level));
    }

    Ok(config)
}

/// Apply provider, model and language overrides from the command line
fn apply_translation_overrides(
    config: &mut Config,
    provider: Option<&CliTranslationProvider>,
    model: Option<&String>,
    target_language: Option<&String>,
) {
    if let Some(provider) = provider {
        config.translation.provider = provider.clone().into();
    }

    if let Some(model) = model {
        // Find the provider config and update the model
        let provider_str = config.translation.provider.to_lowercase_string();
        if let Some(provider_config) = config.translation.available_providers.iter_mut()
            .find(|p| p.provider_type == provider_str) {
            provider_config.model = model.clone();
        }
    }

    if let Some(target_lang) = target_language {
        config.target_language = target_lang.clone();
    }
}

async fn run_translate(options: TranslateArgs) -> Result<()> {
    let mut config = load_or_create_config(&options.config_path, options.log_level.as_ref())?;
    apply_translation_overrides(
        &mut config,
        options.provider.as_ref(),
        options.model.as_ref(),
        options.target_language.as_ref(),
    );

    // Validate the configuration after loading and overriding
    config.validate()
        .context("Configuration validation failed")?;

    // Create controller
    let controller = Controller::with_config(config)?;

    // A first Ctrl-C stops after the current chunk; translated files stay
    // untouched for any run that did not complete
    let cancel_token = controller.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, stopping after the current chunk");
            cancel_token.cancel();
        }
    });

    // Run the controller with the input file(s) and output directory
    if options.input_path.is_file() {
        // Process a single file
        controller.run(
            options.input_path.clone(),
            options.input_path.parent().unwrap_or(Path::new(".")).to_path_buf(),
            options.force_overwrite,
            options.plain_text,
        ).await?;
    } else if options.input_path.is_dir() {
        // Process a directory
        controller.run_folder(
            options.input_path.clone(),
            options.force_overwrite,
            options.plain_text,
        ).await?;
    } else {
        return Err(anyhow!("Input path does not exist: {:?}", options.input_path));
    }

    Ok(())
}

async fn run_rewrite(options: RewriteArgs) -> Result<()> {
    let mut config = load_or_create_config(&options.config_path, options.log_level.as_ref())?;
    apply_translation_overrides(
        &mut config,
        options.provider.as_ref(),
        None,
        options.target_language.as_ref(),
    );

    // The model flag targets the rewrite model, not the chunk model
    if let Some(model) = &options.model {
        let provider_str = config.translation.provider.to_lowercase_string();
        if let Some(provider_config) = config.translation.available_providers.iter_mut()
            .find(|p| p.provider_type == provider_str) {
            provider_config.rewrite_model = Some(model.clone());
        }
    }

    config.validate()
        .context("Configuration validation failed")?;

    let controller = Controller::with_config(config)?;
    let output_dir = options.input_path.parent().unwrap_or(Path::new(".")).to_path_buf();

    controller.run_rewrite(
        options.input_path.clone(),
        output_dir,
        options.style.into(),
        options.force_overwrite,
    ).await
}

async fn run_hooks(options: HooksArgs) -> Result<()> {
    let mut config = load_or_create_config(&options.config_path, options.log_level.as_ref())?;
    apply_translation_overrides(
        &mut config,
        options.provider.as_ref(),
        options.model.as_ref(),
        options.target_language.as_ref(),
    );

    config.validate()
        .context("Configuration validation failed")?;

    let controller = Controller::with_config(config)?;

    controller.run_ideation(
        &options.topic,
        options.count,
        options.output,
        options.thumbnails,
    ).await
}

async fn run_users(options: UsersArgs) -> Result<()> {
    if let Some(cmd_log_level) = &options.log_level {
        log::set_max_level(level_filter(&cmd_log_level.clone().into()));
    }

    let db_path = resolve_database_path(options.database, &options.config_path)?;
    let db = DatabaseConnection::new(&db_path)?;
    let repository = AccountRepository::new(db.clone());

    match options.action {
        UsersAction::Init { username, password } => {
            let admin = repository.ensure_admin(&username, &password).await?;
            info!("Initialized account directory with admin '{}'", admin.username);
        }
        UsersAction::Add { username, password, role } => {
            repository.create_user(&username, &password, role.into()).await?;
        }
        UsersAction::Remove { username } => {
            repository.delete_user(&username).await?;
        }
        UsersAction::List => {
            let users = repository.list_users().await?;
            if users.is_empty() {
                warn!("No accounts yet, run 'creatorflow users init' first");
                return Ok(());
            }

            for user in &users {
                println!("{:<32} {:<6} created {}", user.username, user.role.to_string(), user.created_at);
            }
            info!("{}", db.stats()?);
        }
        UsersAction::Passwd { username, password } => {
            repository.update_password(&username, &password).await?;
        }
        UsersAction::Login { username, password, ttl_days } => {
            let user = repository.verify_credentials(&username, &password).await?;
            let sessions = SessionManager::with_ttl(db.clone(), chrono::Duration::days(ttl_days));
            let session = sessions.create_session(user.id).await?;

            info!("Session for '{}' expires {}", user.username, session.expires_at);
            // The token itself goes to stdout so scripts can capture it
            println!("{}", session.token);
        }
        UsersAction::Logout { token } => {
            let sessions = SessionManager::new(db.clone());
            sessions.logout(&token).await?;
        }
        UsersAction::Sessions => {
            let sessions = SessionManager::new(db.clone());
            let pruned = sessions.prune_expired().await?;
            if pruned > 0 {
                info!("Pruned {} expired session(s)", pruned);
            }

            let records = sessions.list_all().await?;
            if records.is_empty() {
                info!("No active sessions");
                return Ok(());
            }

            for session in &records {
                let user = repository.get_user_by_id(session.user_id).await?;
                println!(
                    "{}…  {:<32} expires {}",
                    session.token_prefix(),
                    user.username,
                    session.expires_at
                );
            }
        }
    }

    Ok(())
}

/// Pick the account database path: CLI flag, then config override, then
/// the platform data directory
fn resolve_database_path(database: Option<PathBuf>, config_path: &str) -> Result<PathBuf> {
    if let Some(path) = database {
        return Ok(path);
    }

    if Path::new(config_path).exists() {
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;
        let config: Config = serde_json::from_reader(BufReader::new(file))
            .context(format!("Failed to parse config file: {}", config_path))?;

        if let Some(path) = config.database_path {
            return Ok(PathBuf::from(path));
        }
    }

    DatabaseConnection::default_database_path()
}
