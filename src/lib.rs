/*!
 * # l2t - Language to Translate
 *
 * A Rust library and command line tool for translating text and documents
 * with Meta's NLLB-200 model.
 *
 * ## Features
 *
 * - Translate literal text, text files in any common encoding, PDFs or stdin
 * - Reach the model through:
 *   - the Hugging Face Inference API
 *   - a self-hosted nllb-serve instance
 * - Segment-by-segment translation of long documents with per-segment error
 *   isolation, visible error markers and progress reporting
 * - Blank lines and line order preserved in the output
 * - NLLB, ISO 639-1 and ISO 639-2/3 language codes
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `file_utils`: Input loading (text, PDF, stdin) and output files
 * - `translation`: Document translation:
 *   - `translation::core`: Translation service, retries and language resolution
 *   - `translation::segmenter`: Cutting documents into segments
 *   - `translation::chunked`: The segment translation loop
 *   - `translation::cache`: Caching of segment translations
 * - `app_controller`: Main application controller
 * - `language_utils`: NLLB language catalog and code normalization
 * - `providers`: Clients for the services hosting the model:
 *   - `providers::huggingface`: Hugging Face Inference API client
 *   - `providers::nllb_serve`: nllb-serve client
 *   - `providers::mock`: In-process provider for tests
 * - `errors`: Custom error types for the application
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod file_utils;
pub mod translation;
pub mod app_controller;
pub mod language_utils;
pub mod providers;
pub mod errors;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Controller, RunOptions, RunOutcome};
pub use file_utils::InputSource;
pub use translation::{ChunkedTranslator, TranslationService};
pub use language_utils::{get_language_name, language_codes_match, normalize_language_code};
pub use errors::{AppError, InputError, ProviderError, TranslationError};
