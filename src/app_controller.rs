use anyhow::{anyhow, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::app_config::Config;
use crate::errors::{AppError, TranslationError};
use crate::file_utils::{FileManager, InputSource};
use crate::language_utils;
use crate::translation::chunked::TranslationMode;
use crate::translation::{
    truncate_text, CancellationFlag, ChunkedTranslator, DocumentTranslation, LogEntry,
    SegmentationPolicy, Segmenter, TranslationService,
};

// @module: Application controller for document translation

/// Characters of the translation shown on the console when no file is written
pub const CONSOLE_PREVIEW_CHARS: usize = 500;

/// Name of the failure report written next to the output file
pub const ISSUES_LOG_FILE_NAME: &str = "l2t.issues.log";

/// Options of a single run
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Literal text, a file path, or `-` for stdin
    pub input: String,
    /// Explicit output file
    pub output: Option<PathBuf>,
    /// Replace an existing output file
    pub force_overwrite: bool,
}

/// Where the translated document goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    File(PathBuf),
    Console,
}

/// How a run ended
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// Translation written to a file
    Written { path: PathBuf, failed_segments: usize },
    /// Translation previewed on the console
    Printed { preview: String, failed_segments: usize },
    /// Cancelled before completion; nothing was written
    Interrupted,
}

/// Main application controller for document translation
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Translation service built from the configuration
    service: TranslationService,
    // @field: Flag raised by the interrupt handler
    cancel: CancellationFlag,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        let service = TranslationService::new(&config.translation);
        Ok(Self::with_service(config, service))
    }

    /// Create a controller around an existing translation service
    pub fn with_service(config: Config, service: TranslationService) -> Self {
        Self {
            config,
            service,
            cancel: CancellationFlag::new(),
        }
    }

    /// Flag that stops the run before the next segment when raised
    pub fn cancellation_flag(&self) -> CancellationFlag {
        self.cancel.clone()
    }

    /// Run the main workflow: load, translate, write
    pub async fn run(&self, options: RunOptions) -> Result<RunOutcome> {
        let start_time = Instant::now();

        let target_language = self.service
            .resolve_language(&self.config.target_language)
            .map_err(|e| AppError::Validation(e.to_string()))?;
        let source_language = self.config.source_language
            .as_deref()
            .map(|code| self.service.resolve_language(code))
            .transpose()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let source = InputSource::resolve(&options.input).map_err(AppError::from)?;
        let loaded = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => None,
            result = FileManager::load_input(&source, &self.config.encoding, self.config.max_file_size_mb) => {
                Some(result.map_err(AppError::from)?)
            }
        };
        let Some(text) = loaded else {
            info!("Interrupted while reading input, nothing written");
            return Ok(RunOutcome::Interrupted);
        };

        if text.trim().is_empty() {
            return Err(AppError::Translation(TranslationError::EmptyInput).into());
        }

        // Refuse to clobber before spending any model time
        let target = resolve_output_target(options.output.as_deref(), &source, &target_language);
        if let OutputTarget::File(path) = &target {
            if path.exists() && !options.force_overwrite {
                return Err(anyhow!(
                    "Output file already exists: {} (use -f to force overwrite)",
                    path.display()
                ));
            }
        }

        info!(
            "🚀 Translating {} characters to {} ({}) with {} - {}",
            text.chars().count(),
            language_utils::get_language_name(&target_language).unwrap_or_else(|_| target_language.clone()),
            target_language,
            self.config.translation.provider.display_name(),
            self.config.translation.get_model()
        );

        let document = self.translate_with_progress(&text, source_language.as_deref(), &target_language).await?;

        for entry in &document.issues {
            warn!("{}", entry.message);
        }

        if document.interrupted {
            info!(
                "Translation interrupted after {} of {} segments, nothing written",
                document.outcomes.len(),
                document.total_segments
            );
            return Ok(RunOutcome::Interrupted);
        }

        let translated = document.assemble();
        let failed_segments = document.failed_count();

        let outcome = match target {
            OutputTarget::File(path) => {
                FileManager::write_to_file(&path, &translated)
                    .with_context(|| format!("Failed to write translation to {}", path.display()))?;
                info!("Success: {}", path.display());

                if failed_segments > 0 {
                    let log_path = path.parent().unwrap_or(Path::new("")).join(ISSUES_LOG_FILE_NAME);
                    let context = format!("{} -> {}", options.input, path.display());
                    if let Err(e) = self.write_logs_to_file(&document.issues, &log_path, &context) {
                        warn!("Failed to write logs to file: {}", e);
                    } else {
                        info!("Logs written to {}", log_path.display());
                    }
                }

                RunOutcome::Written { path, failed_segments }
            }
            OutputTarget::Console => {
                let preview = truncate_text(&translated, CONSOLE_PREVIEW_CHARS);
                println!("\n=== TRANSLATION ===\n{}\n===================", preview);
                RunOutcome::Printed { preview, failed_segments }
            }
        };

        self.log_summary(&document);
        info!("Translation completed in {}.", format_duration(start_time.elapsed()));

        Ok(outcome)
    }

    /// Translate the document, drawing a progress bar over the segments
    async fn translate_with_progress(
        &self,
        text: &str,
        source_language: Option<&str>,
        target_language: &str,
    ) -> Result<DocumentTranslation> {
        let translator = ChunkedTranslator::new(
            self.service.clone(),
            Segmenter::new(SegmentationPolicy::from_config(&self.config)),
        )
        .with_cancellation(self.cancel.clone());

        if translator.is_direct(text) {
            return Ok(translator.translate(text, source_language, target_language, |_, _| {}).await?);
        }

        // Fail fast when the backend is down
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {}
            result = self.service.test_connection() => {
                result.with_context(|| format!("{} backend is not reachable", self.service.provider_name()))?;
            }
        }

        let segments = translator.segments(text);
        let progress_bar = ProgressBar::new(segments.len() as u64);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} segments ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result.progress_chars("█▓▒░"));

        let bar = progress_bar.clone();
        let document = translator
            .translate_segments(&segments, source_language, target_language, move |completed, total| {
                bar.set_length(total as u64);
                bar.set_position(completed as u64);
            })
            .await;

        progress_bar.finish_and_clear();
        Ok(document)
    }

    fn log_summary(&self, document: &DocumentTranslation) {
        if document.mode == TranslationMode::Direct {
            return;
        }

        let stats = self.service.cache().stats();
        info!(
            "Translated {} segments ({} blank, {} failed, {} cache hits)",
            document.translated_count(),
            document.blank_count(),
            document.failed_count(),
            stats.hits
        );
    }

    /// Write captured translation issues to a log file
    pub fn write_logs_to_file(&self, logs: &[LogEntry], file_path: &Path, translation_context: &str) -> Result<()> {
        let mut log_content = String::new();

        // Add header
        log_content.push_str(&format!("Translation Log - {}\n", chrono::Local::now().format("%Y-%m-%d %H:%M:%S")));
        log_content.push_str(&format!("Context: {}\n\n", translation_context));

        // Add each log entry
        for entry in logs {
            log_content.push_str(&format!("[{}] {}\n", entry.level, entry.message));
        }

        FileManager::write_to_file(file_path, &log_content)?;

        Ok(())
    }
}

/// Decide where the translation of `source` is written
///
/// An explicit path always wins. File inputs get `<stem>.<lang-tag>.<ext>` next
/// to the input; text and stdin inputs are previewed on the console.
pub fn resolve_output_target(explicit: Option<&Path>, source: &InputSource, target_language: &str) -> OutputTarget {
    if let Some(path) = explicit {
        return OutputTarget::File(path.to_path_buf());
    }

    match source.path() {
        Some(input_file) => {
            let output_dir = input_file.parent().unwrap_or(Path::new(""));
            OutputTarget::File(FileManager::generate_output_path(
                input_file,
                output_dir,
                &language_utils::file_language_tag(target_language),
                &FileManager::output_extension(input_file),
            ))
        }
        None => OutputTarget::Console,
    }
}

/// Format a duration into a human-readable string
pub fn format_duration(duration: Duration) -> String {
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
