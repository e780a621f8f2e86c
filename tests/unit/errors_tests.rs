/*!
 * Tests for error types and conversions
 */

use std::path::PathBuf;
use l2t::errors::{AppError, InputError, ProviderError, TranslationError};

#[test]
fn test_providerError_requestFailed_shouldDisplayCorrectly() {
    let error = ProviderError::RequestFailed("Connection reset".to_string());
    let display = format!("{}", error);
    assert!(display.contains("API request failed"));
    assert!(display.contains("Connection reset"));
}

#[test]
fn test_providerError_apiError_shouldDisplayStatusAndMessage() {
    let error = ProviderError::ApiError {
        status_code: 503,
        message: "Model is loading".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("503"));
    assert!(display.contains("Model is loading"));
}

/// Transient failures are retried, client errors are not
#[test]
fn test_providerError_isRetryable_shouldSeparateTransientFailures() {
    assert!(ProviderError::ConnectionError("refused".to_string()).is_retryable());
    assert!(ProviderError::RateLimitExceeded("slow down".to_string()).is_retryable());
    assert!(ProviderError::RequestFailed("reset".to_string()).is_retryable());
    assert!(ProviderError::ApiError { status_code: 503, message: String::new() }.is_retryable());

    assert!(!ProviderError::ApiError { status_code: 400, message: String::new() }.is_retryable());
    assert!(!ProviderError::AuthenticationError("bad token".to_string()).is_retryable());
    assert!(!ProviderError::ParseError("garbage".to_string()).is_retryable());
}

#[test]
fn test_inputError_tooLarge_shouldDisplaySizeAndLimit() {
    let error = InputError::TooLarge {
        path: PathBuf::from("big.txt"),
        size_mb: 12.5,
        limit_mb: 10,
    };
    let display = format!("{}", error);
    assert!(display.contains("big.txt"));
    assert!(display.contains("12.5"));
    assert!(display.contains("10 MB"));
}

#[test]
fn test_inputError_notFound_shouldDisplayPath() {
    let error = InputError::NotFound(PathBuf::from("missing/doc.txt"));
    assert!(format!("{}", error).contains("missing/doc.txt"));
}

#[test]
fn test_translationError_fromProviderError_shouldWrap() {
    let error: TranslationError = ProviderError::ParseError("bad body".to_string()).into();
    assert!(matches!(error, TranslationError::Provider(ProviderError::ParseError(_))));
    assert!(format!("{}", error).contains("bad body"));
}

#[test]
fn test_appError_conversions_shouldKeepMessages() {
    let app_error: AppError = TranslationError::UnsupportedLanguage("xx_Fake".to_string()).into();
    assert!(matches!(app_error, AppError::Translation(_)));
    assert!(format!("{}", app_error).contains("xx_Fake"));

    let app_error: AppError = InputError::UnknownEncoding("klingon".to_string()).into();
    assert!(matches!(app_error, AppError::Input(_)));
    assert!(format!("{}", app_error).contains("klingon"));
}
