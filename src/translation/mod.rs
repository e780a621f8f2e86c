/*!
 * Document translation on top of an NLLB backend.
 *
 * This module contains the functionality between a loaded document and the
 * translation provider. It is split into several submodules:
 *
 * - `core`: Translation service, requests, retries and language resolution
 * - `cache`: Caching of segment translations within a run
 * - `segmenter`: Cutting documents into segments and long segments into model-sized pieces
 * - `chunked`: The segment-by-segment translation loop with error isolation and progress
 */

// Re-export main types for easier usage
pub use self::chunked::{CancellationFlag, ChunkedTranslator, DocumentTranslation, LogEntry, SegmentOutcome};
pub use self::core::{TranslationRequest, TranslationResult, TranslationService};
pub use self::segmenter::{Segment, SegmentationPolicy, Segmenter};

// Submodules
pub mod cache;
pub mod chunked;
pub mod core;
pub mod segmenter;

/// Truncate text to at most `max_chars` characters, appending `...` when cut
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => format!("{}...", &text[..byte_index]),
        None => text.to_string(),
    }
}
