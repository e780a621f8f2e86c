use async_trait::async_trait;
use log::debug;
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};

use crate::errors::ProviderError;
use super::{build_http_client, error_for_status, error_for_transport, Provider};

/// Client for NLLB models hosted on the Hugging Face Inference API
pub struct HuggingFace {
    /// HTTP client for API requests
    client: Client,
    /// API base URL
    endpoint: String,
    /// Model repository, e.g. facebook/nllb-200-distilled-600M
    model: String,
    /// Access token
    api_key: String,
    /// Maximum generated length in tokens
    max_length: u32,
}

impl std::fmt::Debug for HuggingFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HuggingFace")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("api_key", &if self.api_key.is_empty() { "" } else { "***" })
            .field("max_length", &self.max_length)
            .finish()
    }
}

/// Inference request body
#[derive(Debug, Serialize)]
pub struct HuggingFaceRequest<'a> {
    /// Text to translate
    inputs: &'a str,
    /// Generation parameters
    parameters: HuggingFaceParameters<'a>,
    /// Inference options
    options: HuggingFaceOptions,
}

#[derive(Debug, Serialize)]
struct HuggingFaceParameters<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    src_lang: Option<&'a str>,
    tgt_lang: &'a str,
    max_length: u32,
}

#[derive(Debug, Serialize)]
struct HuggingFaceOptions {
    /// Block until a cold model is loaded instead of answering 503
    wait_for_model: bool,
}

/// One translated input
#[derive(Debug, Deserialize)]
pub struct HuggingFaceTranslation {
    pub translation_text: String,
}

#[derive(Debug, Deserialize)]
struct HuggingFaceErrorBody {
    error: String,
}

impl<'a> HuggingFaceRequest<'a> {
    pub fn new(text: &'a str, source_language: Option<&'a str>, target_language: &'a str, max_length: u32) -> Self {
        Self {
            inputs: text,
            parameters: HuggingFaceParameters {
                src_lang: source_language,
                tgt_lang: target_language,
                max_length,
            },
            options: HuggingFaceOptions { wait_for_model: true },
        }
    }
}

impl HuggingFace {
    /// Create a new Hugging Face client
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
        max_length: u32,
        timeout_secs: u64,
    ) -> Self {
        Self {
            client: build_http_client(timeout_secs),
            endpoint: endpoint.into(),
            model: model.into(),
            api_key: api_key.into(),
            max_length,
        }
    }

    fn model_url(&self) -> String {
        format!("{}/models/{}", self.endpoint.trim_end_matches('/'), self.model)
    }

    /// Extract the translated text from a response body
    ///
    /// The API answers `[{"translation_text": "..."}]` on success and
    /// `{"error": "..."}` when the model could not run.
    pub fn parse_response(body: &str) -> Result<String, ProviderError> {
        if let Ok(translations) = serde_json::from_str::<Vec<HuggingFaceTranslation>>(body) {
            return translations
                .into_iter()
                .next()
                .map(|t| t.translation_text)
                .ok_or_else(|| ProviderError::ParseError("Empty translation list".to_string()));
        }

        if let Ok(error_body) = serde_json::from_str::<HuggingFaceErrorBody>(body) {
            return Err(ProviderError::ParseError(format!("Model returned an error: {}", error_body.error)));
        }

        Err(ProviderError::ParseError(format!(
            "Unexpected response: {}",
            body.chars().take(200).collect::<String>()
        )))
    }
}

#[async_trait]
impl Provider for HuggingFace {
    fn name(&self) -> &str {
        "Hugging Face"
    }

    async fn translate(
        &self,
        text: &str,
        source_language: Option<&str>,
        target_language: &str,
    ) -> Result<String, ProviderError> {
        let request = HuggingFaceRequest::new(text, source_language, target_language, self.max_length);

        let mut builder = self.client.post(self.model_url())
            .header(header::CONTENT_TYPE, "application/json")
            .json(&request);
        if !self.api_key.is_empty() {
            builder = builder.bearer_auth(&self.api_key);
        }

        let response = builder.send().await.map_err(error_for_transport)?;
        let status = response.status();
        let body = response.text().await.map_err(error_for_transport)?;

        if !status.is_success() {
            debug!("Hugging Face API error ({}): {}", status, body);
            return Err(error_for_status(status, body));
        }

        Self::parse_response(&body)
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        self.translate("Hello", Some("eng_Latn"), "fra_Latn").await?;
        Ok(())
    }
}
