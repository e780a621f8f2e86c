/*!
 * Provider implementations for NLLB translation backends.
 *
 * This module contains client implementations for the services that host the model:
 * - Hugging Face: hosted Inference API
 * - nllb-serve: self-hosted REST server
 * - Mock: in-process provider used by tests
 */

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use crate::app_config::{TranslationConfig, TranslationProvider};
use crate::errors::ProviderError;

/// Common trait for all translation backends
///
/// The model is opaque: a provider takes text plus language codes and hands back
/// the translated text, or an error.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Translate `text` into `target_language`
    ///
    /// # Arguments
    /// * `text` - The text to translate
    /// * `source_language` - NLLB source code, or None to let the backend decide
    /// * `target_language` - NLLB target code
    async fn translate(
        &self,
        text: &str,
        source_language: Option<&str>,
        target_language: &str,
    ) -> Result<String, ProviderError>;

    /// Test the connection to the provider
    async fn test_connection(&self) -> Result<(), ProviderError>;
}

/// Build the provider selected in the configuration
pub fn create_provider(config: &TranslationConfig) -> Arc<dyn Provider> {
    match config.provider {
        TranslationProvider::HuggingFace => Arc::new(huggingface::HuggingFace::new(
            config.get_endpoint(),
            config.get_model(),
            config.get_api_key(),
            config.common.max_length,
            config.get_timeout_secs(),
        )),
        TranslationProvider::NllbServe => Arc::new(nllb_serve::NllbServe::new(
            config.get_endpoint(),
            config.get_timeout_secs(),
        )),
    }
}

/// HTTP client shared by the network providers
pub(crate) fn build_http_client(timeout_secs: u64) -> Client {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .pool_idle_timeout(Duration::from_secs(90))
        .tcp_keepalive(Duration::from_secs(60))
        .build()
        .unwrap_or_default()
}

/// Map a non-success HTTP status to a provider error
pub(crate) fn error_for_status(status: StatusCode, body: String) -> ProviderError {
    match status.as_u16() {
        401 | 403 => ProviderError::AuthenticationError(body),
        429 => ProviderError::RateLimitExceeded(body),
        status_code => ProviderError::ApiError { status_code, message: body },
    }
}

/// Map a transport-level reqwest failure to a provider error
pub(crate) fn error_for_transport(error: reqwest::Error) -> ProviderError {
    if error.is_connect() || error.is_timeout() {
        ProviderError::ConnectionError(error.to_string())
    } else {
        ProviderError::RequestFailed(error.to_string())
    }
}

pub mod huggingface;
pub mod mock;
pub mod nllb_serve;
