/*!
 * Core translation service implementation.
 *
 * This module contains the TranslationService, the single entry point the rest
 * of the application uses to reach the model: it resolves language codes,
 * rejects empty requests, retries transient backend failures and caches results.
 */

use log::debug;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::app_config::{TranslationCommonConfig, TranslationConfig};
use crate::errors::{ProviderError, TranslationError};
use crate::language_utils;
use crate::providers::{self, Provider};
use super::cache::TranslationCache;
use super::truncate_text;

/// A unit of work for the model
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationRequest {
    /// Text to translate, never blank
    pub text: String,
    /// Target language code
    pub target_language: String,
    /// Source language code, None lets the backend decide
    pub source_language: Option<String>,
}

impl TranslationRequest {
    /// Create a request, rejecting blank text
    pub fn new(
        text: impl Into<String>,
        target_language: impl Into<String>,
        source_language: Option<String>,
    ) -> Result<Self, TranslationError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(TranslationError::EmptyInput);
        }

        Ok(Self {
            text,
            target_language: target_language.into(),
            source_language,
        })
    }
}

/// Outcome of a successful request
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationResult {
    pub original: String,
    pub translated: String,
    /// Canonical source code, when one was given
    pub source_language: Option<String>,
    /// Canonical target code
    pub target_language: String,
    pub processing_time: Duration,
}

/// Retry settings for transient backend failures
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Additional attempts after the first one
    pub retry_count: u32,
    /// Base delay, doubled on each retry
    pub backoff_ms: u64,
}

impl RetryPolicy {
    /// Delay before retry number `attempt` (1-based)
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 1u64 << attempt.saturating_sub(1).min(16);
        Duration::from_millis(self.backoff_ms.saturating_mul(factor))
    }
}

impl From<&TranslationCommonConfig> for RetryPolicy {
    fn from(common: &TranslationCommonConfig) -> Self {
        Self {
            retry_count: common.retry_count,
            backoff_ms: common.retry_backoff_ms,
        }
    }
}

/// Main translation service
#[derive(Debug, Clone)]
pub struct TranslationService {
    /// Provider implementation
    provider: Arc<dyn Provider>,

    /// Retry settings
    retry: RetryPolicy,

    /// Translation cache for storing and retrieving translations
    cache: TranslationCache,
}

impl TranslationService {
    /// Create a new translation service with the given configuration
    pub fn new(config: &TranslationConfig) -> Self {
        Self::with_provider(providers::create_provider(config), &config.common)
    }

    /// Create a service around an existing provider
    pub fn with_provider(provider: Arc<dyn Provider>, common: &TranslationCommonConfig) -> Self {
        Self {
            provider,
            retry: RetryPolicy::from(common),
            cache: TranslationCache::new(common.cache_enabled),
        }
    }

    /// Name of the backend
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// The segment cache
    pub fn cache(&self) -> &TranslationCache {
        &self.cache
    }

    /// Check whether the model supports a language code
    pub fn is_language_supported(&self, code: &str) -> bool {
        language_utils::is_language_supported(code)
    }

    /// All supported languages keyed by code
    pub fn get_supported_languages(&self) -> BTreeMap<String, String> {
        language_utils::get_supported_languages()
    }

    /// Resolve a user-supplied language code to its canonical NLLB code
    pub fn resolve_language(&self, code: &str) -> Result<String, TranslationError> {
        language_utils::normalize_language_code(code)
            .map_err(|_| TranslationError::UnsupportedLanguage(code.to_string()))
    }

    /// Test the connection to the translation provider
    pub async fn test_connection(&self) -> Result<(), TranslationError> {
        self.provider.test_connection().await?;
        Ok(())
    }

    /// Translate a request
    pub async fn translate(&self, request: &TranslationRequest) -> Result<TranslationResult, TranslationError> {
        let start = Instant::now();

        let target_language = self.resolve_language(&request.target_language)?;
        let source_language = request.source_language
            .as_deref()
            .map(|code| self.resolve_language(code))
            .transpose()?;

        let translated = self.translate_text(
            &request.text,
            source_language.as_deref(),
            &target_language,
        ).await?;

        Ok(TranslationResult {
            original: request.text.clone(),
            translated,
            source_language,
            target_language,
            processing_time: start.elapsed(),
        })
    }

    /// Translate text whose language codes are already canonical
    pub async fn translate_text(
        &self,
        text: &str,
        source_language: Option<&str>,
        target_language: &str,
    ) -> Result<String, TranslationError> {
        if text.trim().is_empty() {
            return Err(TranslationError::EmptyInput);
        }

        if let Some(cached) = self.cache.get(text, source_language, target_language) {
            return Ok(cached);
        }

        let translated = self.translate_with_retry(text, source_language, target_language).await?;
        self.cache.store(text, source_language, target_language, &translated);

        Ok(translated)
    }

    async fn translate_with_retry(
        &self,
        text: &str,
        source_language: Option<&str>,
        target_language: &str,
    ) -> Result<String, TranslationError> {
        let mut attempt = 0;

        loop {
            let result = self.provider
                .translate(text, source_language, target_language)
                .await
                .and_then(|translated| {
                    if translated.trim().is_empty() {
                        Err(ProviderError::ParseError("Backend returned an empty translation".to_string()))
                    } else {
                        Ok(translated)
                    }
                });

            match result {
                Ok(translated) => return Ok(translated),
                Err(e) if e.is_retryable() && attempt < self.retry.retry_count => {
                    attempt += 1;
                    let delay = self.retry.backoff(attempt);
                    debug!(
                        "{} failed on '{}' ({}), retry {}/{} in {:?}",
                        self.provider.name(),
                        truncate_text(text, 30),
                        e,
                        attempt,
                        self.retry.retry_count,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}
