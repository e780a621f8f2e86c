/*!
 * Error types for the l2t application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when talking to a translation backend
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

impl ProviderError {
    /// Whether retrying the same request may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::ConnectionError(_) | Self::RateLimitExceeded(_) | Self::RequestFailed(_) => true,
            Self::ApiError { status_code, .. } => *status_code >= 500,
            Self::ParseError(_) | Self::AuthenticationError(_) => false,
        }
    }
}

/// Errors raised while loading the document to translate
#[derive(Error, Debug)]
pub enum InputError {
    /// The input looked like a path but nothing exists there
    #[error("Input file not found: {0}")]
    NotFound(PathBuf),

    /// The input path exists but is not a regular file
    #[error("Input is not a file: {0}")]
    NotAFile(PathBuf),

    /// The file exists but could not be read
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file exceeds the configured size limit
    #[error("File {path} is {size_mb:.1} MB, above the {limit_mb} MB limit")]
    TooLarge {
        path: PathBuf,
        size_mb: f64,
        limit_mb: u64,
    },

    /// The configured encoding label is unknown
    #[error("Unknown text encoding: {0}")]
    UnknownEncoding(String),

    /// Text extraction from a PDF failed
    #[error("Failed to extract text from PDF {path}: {message}")]
    Pdf { path: PathBuf, message: String },
}

/// Errors that can occur during translation
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Error from the provider API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The language code is not part of the model's catalog
    #[error("Unsupported language code: {0}")]
    UnsupportedLanguage(String),

    /// Nothing to translate
    #[error("Input text is empty")]
    EmptyInput,
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error while loading the input document
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Invalid configuration or arguments
    #[error("Validation error: {0}")]
    Validation(String),
}
