/*!
 * Segment-by-segment document translation.
 *
 * This module drives the translation of a whole document: short inputs go to
 * the model in a single call, longer ones are segmented and translated one
 * segment at a time. A failing segment is replaced by a visible error marker
 * and the loop moves on; progress is reported through a callback. Raising the
 * cancellation flag stops the run, dropping any request in flight.
 */

use log::debug;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Notify;

use crate::errors::TranslationError;
use super::core::TranslationService;
use super::segmenter::{self, Segment, Segmenter};
use super::truncate_text;

/// Characters of the failed segment shown inside its error marker
pub const ERROR_MARKER_PREVIEW_CHARS: usize = 50;

/// Placeholder written in place of a segment that could not be translated
pub fn error_marker(segment_text: &str) -> String {
    format!("[ERROR: {}]", truncate_text(segment_text, ERROR_MARKER_PREVIEW_CHARS))
}

/// Log entry for capturing translation process logs
///
/// Collected while a progress bar owns the terminal and replayed afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub level: String,
    pub message: String,
}

impl LogEntry {
    pub fn warn(message: impl Into<String>) -> Self {
        Self { level: "WARN".to_string(), message: message.into() }
    }
}

/// Cooperative cancellation shared between the signal handler and the loop
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag {
    cancelled: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        self.notify.notify_waiters();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Resolves once `cancel` has been called
    pub async fn cancelled(&self) {
        loop {
            let notified = self.notify.notified();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }
}

/// What happened to one segment
#[derive(Debug, Clone, PartialEq)]
pub enum SegmentOutcome {
    /// Blank line, passed through
    Blank,
    /// Translated text
    Translated(String),
    /// Translation failed; the marker stands in for the text
    Failed { marker: String, error: String },
}

impl SegmentOutcome {
    /// Text written to the output for this segment
    pub fn text(&self) -> &str {
        match self {
            Self::Blank => "",
            Self::Translated(text) => text,
            Self::Failed { marker, .. } => marker,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// How a document was sent to the model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslationMode {
    /// Whole input in one call
    Direct,
    /// Segment by segment
    Segmented,
}

/// Result of translating a document
#[derive(Debug, Clone)]
pub struct DocumentTranslation {
    pub mode: TranslationMode,
    /// One outcome per processed segment, in document order
    pub outcomes: Vec<SegmentOutcome>,
    /// Number of segments in the document
    pub total_segments: usize,
    /// Set when cancellation stopped the loop early
    pub interrupted: bool,
    pub elapsed: Duration,
    /// Failures captured during the run
    pub issues: Vec<LogEntry>,
}

impl DocumentTranslation {
    pub fn translated_count(&self) -> usize {
        self.outcomes.iter().filter(|o| matches!(o, SegmentOutcome::Translated(_))).count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failed()).count()
    }

    pub fn blank_count(&self) -> usize {
        self.outcomes.iter().filter(|o| matches!(o, SegmentOutcome::Blank)).count()
    }

    /// Join segment outputs with newlines
    pub fn assemble(&self) -> String {
        let texts: Vec<&str> = self.outcomes.iter().map(SegmentOutcome::text).collect();
        segmenter::reassemble(&texts)
    }
}

/// Number of completed segments between two progress reports
pub fn progress_step(total: usize) -> usize {
    (total / 100).max(1)
}

/// Whether completing segment `completed` of `total` triggers a progress report
pub fn should_report_progress(completed: usize, total: usize) -> bool {
    completed == total || completed % progress_step(total) == 0
}

/// Translates whole documents, segment by segment when they are long
#[derive(Debug, Clone)]
pub struct ChunkedTranslator {
    service: TranslationService,
    segmenter: Segmenter,
    cancel: CancellationFlag,
}

impl ChunkedTranslator {
    pub fn new(service: TranslationService, segmenter: Segmenter) -> Self {
        Self {
            service,
            segmenter,
            cancel: CancellationFlag::new(),
        }
    }

    /// Use an externally controlled cancellation flag
    pub fn with_cancellation(mut self, cancel: CancellationFlag) -> Self {
        self.cancel = cancel;
        self
    }

    /// Whether `text` is small enough for a single model call
    pub fn is_direct(&self, text: &str) -> bool {
        text.chars().count() <= self.segmenter.policy().max_chars
    }

    /// Segments the document would be cut into
    pub fn segments(&self, text: &str) -> Vec<Segment> {
        self.segmenter.segment(text)
    }

    /// Translate a document
    ///
    /// Short inputs are translated in one call and a failure is returned as an
    /// error. Longer inputs go through the segment loop, where failures are
    /// recorded per segment and never abort the run.
    pub async fn translate(
        &self,
        text: &str,
        source_language: Option<&str>,
        target_language: &str,
        progress_callback: impl FnMut(usize, usize),
    ) -> Result<DocumentTranslation, TranslationError> {
        if text.trim().is_empty() {
            return Err(TranslationError::EmptyInput);
        }

        if self.is_direct(text) {
            let start = Instant::now();
            let translated = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => None,
                result = self.service.translate_text(text, source_language, target_language) => Some(result?),
            };
            return Ok(DocumentTranslation {
                mode: TranslationMode::Direct,
                interrupted: translated.is_none(),
                outcomes: translated.map(SegmentOutcome::Translated).into_iter().collect(),
                total_segments: 1,
                elapsed: start.elapsed(),
                issues: Vec::new(),
            });
        }

        let segments = self.segmenter.segment(text);
        Ok(self.translate_segments(&segments, source_language, target_language, progress_callback).await)
    }

    /// Translate pre-cut segments in order
    pub async fn translate_segments(
        &self,
        segments: &[Segment],
        source_language: Option<&str>,
        target_language: &str,
        mut progress_callback: impl FnMut(usize, usize),
    ) -> DocumentTranslation {
        let start = Instant::now();
        let total = segments.len();
        let mut outcomes = Vec::with_capacity(total);
        let mut issues = Vec::new();
        let mut interrupted = false;

        progress_callback(0, total);

        for segment in segments {
            if self.cancel.is_cancelled() {
                interrupted = true;
                break;
            }

            let outcome = if segment.is_blank() {
                SegmentOutcome::Blank
            } else {
                let result = tokio::select! {
                    biased;
                    _ = self.cancel.cancelled() => {
                        interrupted = true;
                        break;
                    }
                    result = self.translate_segment(&segment.text, source_language, target_language) => result,
                };

                match result {
                    Ok(translated) => SegmentOutcome::Translated(translated),
                    Err(e) => {
                        let message = format!(
                            "Segment {} failed ('{}'): {}",
                            segment.index + 1,
                            truncate_text(&segment.text, 30),
                            e
                        );
                        debug!("{}", message);
                        issues.push(LogEntry::warn(message));
                        SegmentOutcome::Failed {
                            marker: error_marker(&segment.text),
                            error: e.to_string(),
                        }
                    }
                }
            };

            outcomes.push(outcome);

            let completed = outcomes.len();
            if should_report_progress(completed, total) {
                progress_callback(completed, total);
            }
        }

        DocumentTranslation {
            mode: TranslationMode::Segmented,
            outcomes,
            total_segments: total,
            interrupted,
            elapsed: start.elapsed(),
            issues,
        }
    }

    /// Translate one segment, splitting it when it exceeds the chunk size
    async fn translate_segment(
        &self,
        text: &str,
        source_language: Option<&str>,
        target_language: &str,
    ) -> Result<String, TranslationError> {
        let pieces = self.segmenter.split_for_model(text);
        let mut translated = Vec::with_capacity(pieces.len());

        for piece in &pieces {
            translated.push(self.service.translate_text(piece, source_language, target_language).await?);
        }

        Ok(translated.join(" "))
    }
}
