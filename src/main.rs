// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use l2t::app_config::{self, Config, TranslationProvider};
use l2t::app_controller::{Controller, RunOptions, RunOutcome};
use l2t::language_utils;

/// CLI Wrapper for TranslationProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationProvider {
    #[value(alias = "hf")]
    Huggingface,
    #[value(alias = "nllb-serve")]
    Nllbserve,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::Huggingface => TranslationProvider::HuggingFace,
            CliTranslationProvider::Nllbserve => TranslationProvider::NllbServe,
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

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate shell completions for l2t
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// l2t - translate text and documents with NLLB-200
///
/// Translates literal text, text files, PDFs, or stdin into any of the
/// 200 languages of Meta's NLLB-200 model.
#[derive(Parser, Debug)]
#[command(name = "l2t")]
#[command(version)]
#[command(about = "Translate text and documents with NLLB-200")]
#[command(args_conflicts_with_subcommands = true)]
#[command(long_about = "l2t translates text, text files and PDFs with an NLLB-200 model served by
Hugging Face or a self-hosted nllb-serve instance.

EXAMPLES:
    l2t \"Hello world\" -l fra_Latn              # Translate text, print the result
    l2t notes.txt -l de                         # Writes notes.deu-Latn.txt
    l2t report.pdf -l es -o report.es.txt       # Translate a PDF to an explicit file
    cat notes.txt | l2t - -l ja                 # Translate stdin
    l2t --list-languages                        # Show every supported language code
    l2t completions bash > l2t.bash             # Generate bash completions

CONFIGURATION:
    Configuration is read from conf.json in the current directory, or from the
    user configuration directory (l2t/conf.json). A default file is created
    when none exists. Command line options and L2T_* environment variables
    override the file.

SUPPORTED PROVIDERS:
    nllbserve   - Self-hosted nllb-serve (default: http://localhost:6060)
    huggingface - Hugging Face Inference API (requires API key)")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Text to translate, a file path, or '-' for stdin
    #[arg(value_name = "INPUT")]
    input: Option<String>,

    /// Target language code (e.g. 'fra_Latn', 'fr', 'fra')
    #[arg(short = 'l', long = "lang", env = "L2T_TARGET_LANG")]
    target_language: Option<String>,

    /// Source language code, detected by the model when omitted
    #[arg(short = 's', long = "source-lang", env = "L2T_SOURCE_LANG")]
    source_language: Option<String>,

    /// Output file (default: <input>.<lang>.<ext>, or the console for text input)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Preferred text encoding of the input file
    #[arg(short, long)]
    encoding: Option<String>,

    /// Chunk size in characters (1-1000). Shorter inputs go to the model in one
    /// call; longer pieces are split, since NLLB output is capped at about 512 tokens
    #[arg(short, long, env = "L2T_CHUNK_SIZE")]
    chunk_size: Option<usize>,

    /// Group consecutive short lines into one segment
    #[arg(long)]
    group_lines: bool,

    /// List supported languages and exit
    #[arg(long)]
    list_languages: bool,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force: bool,

    /// Translation provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Model name to use for translation
    #[arg(short, long, env = "L2T_MODEL")]
    model: Option<String>,

    /// Provider endpoint URL
    #[arg(long, env = "L2T_ENDPOINT")]
    endpoint: Option<String>,

    /// API key for the provider
    #[arg(long, env = "L2T_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Configuration file path
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Set logging level
    #[arg(long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Shorthand for --log-level debug
    #[arg(long, conflicts_with = "log_level")]
    debug: bool,

    /// Also write log lines to this file
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

// Optional plain-text copy of every log line
static LOG_FILE: OnceCell<Mutex<File>> = OnceCell::new();

// @struct: Custom logger implementation
struct CustomLogger;

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger))?;
        log::set_max_level(level);
        Ok(())
    }

    // @attaches: File sink for log lines
    fn attach_file(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open log file: {}", path.display()))?;

        if LOG_FILE.set(Mutex::new(file)).is_err() {
            warn!("Log file already attached, ignoring {}", path.display());
        }
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

    // @returns: ANSI color for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        if metadata.level() > log::max_level() {
            return false;
        }
        // Dependencies only get through at info and above
        metadata.target().starts_with("l2t") || metadata.level() <= Level::Info
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let now = chrono::Local::now().format("%H:%M:%S.%3f");
        let emoji = Self::get_emoji_for_level(record.level());

        let mut stderr = std::io::stderr();
        let _ = writeln!(
            stderr,
            "{}{} {} {}\x1B[0m",
            Self::get_color_for_level(record.level()), now, emoji, record.args()
        );

        if let Some(file) = LOG_FILE.get() {
            let _ = writeln!(
                file.lock(),
                "{} [{}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
        if let Some(file) = LOG_FILE.get() {
            let _ = file.lock().flush();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Info until the configuration says otherwise
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Some(Commands::Completions { shell }) = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "l2t", &mut std::io::stdout());
        return Ok(());
    }

    if cli.list_languages {
        print_supported_languages();
        return Ok(());
    }

    run_translate(cli).await
}

fn print_supported_languages() {
    println!("Supported languages:");
    for (code, name) in language_utils::get_supported_languages() {
        println!("  {:<10} {}", code, name);
    }
}

fn cli_log_level(options: &CommandLineOptions) -> Option<app_config::LogLevel> {
    if options.debug {
        Some(app_config::LogLevel::Debug)
    } else {
        options.log_level.clone().map(Into::into)
    }
}

/// Apply command line overrides on top of the loaded configuration
fn apply_overrides(config: &mut Config, options: &CommandLineOptions) {
    if let Some(target_language) = &options.target_language {
        config.target_language = target_language.clone();
    }
    if let Some(source_language) = &options.source_language {
        config.source_language = Some(source_language.clone());
    }
    if let Some(chunk_size) = options.chunk_size {
        config.chunk_size = chunk_size;
    }
    if let Some(encoding) = &options.encoding {
        config.encoding = encoding.clone();
    }
    if options.group_lines {
        config.segmentation.group_short_lines = true;
    }
    if let Some(log_level) = cli_log_level(options) {
        config.log_level = log_level;
    }
    if let Some(log_file) = &options.log_file {
        config.log_file = Some(log_file.clone());
    }

    if let Some(provider) = &options.provider {
        config.translation.provider = provider.clone().into();
    }
    let provider_config = config.translation.active_provider_config_mut();
    if let Some(model) = &options.model {
        provider_config.model = model.clone();
    }
    if let Some(endpoint) = &options.endpoint {
        provider_config.endpoint = endpoint.clone();
    }
    if let Some(api_key) = &options.api_key {
        provider_config.api_key = api_key.clone();
    }
}

async fn run_translate(options: CommandLineOptions) -> Result<()> {
    // Apply the command line level before the config is read
    if let Some(level) = cli_log_level(&options) {
        log::set_max_level(level.to_level_filter());
    }

    let config_path = options.config.clone().unwrap_or_else(Config::default_path);
    let mut config = Config::load_or_create(&config_path)?;
    apply_overrides(&mut config, &options);

    config.validate()
        .context("Configuration validation failed")?;

    log::set_max_level(config.log_level.to_level_filter());
    if let Some(log_file) = &config.log_file {
        CustomLogger::attach_file(log_file)?;
    }

    let input = options.input
        .clone()
        .ok_or_else(|| anyhow!("INPUT is required (text, a file path, or '-' for stdin)"))?;

    let controller = Controller::with_config(config)?;

    let cancel = controller.cancellation_flag();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            return;
        }
        warn!("Interrupt received, stopping translation (press Ctrl-C again to quit now)");
        cancel.cancel();

        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Second interrupt, exiting");
            log::logger().flush();
            std::process::exit(130);
        }
    });

    let outcome = controller.run(RunOptions {
        input,
        output: options.output.clone(),
        force_overwrite: options.force,
    }).await?;

    if let RunOutcome::Interrupted = outcome {
        info!("Translation cancelled by user");
        log::logger().flush();
        // A pending stdin read cannot be cancelled and would block runtime shutdown
        std::process::exit(0);
    }

    log::logger().flush();
    Ok(())
}
