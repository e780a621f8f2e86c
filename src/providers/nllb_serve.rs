use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::Deserialize;

use crate::errors::ProviderError;
use super::{build_http_client, error_for_status, error_for_transport, Provider};

/// Client for a self-hosted nllb-serve instance
#[derive(Debug)]
pub struct NllbServe {
    /// HTTP client for making requests
    client: Client,
    /// Base URL of the server
    base_url: String,
}

/// Translate response from nllb-serve
#[derive(Debug, Deserialize)]
pub struct NllbServeResponse {
    /// One translation per `source` field sent
    pub translation: Vec<String>,
    /// Server-side processing time in seconds
    #[serde(default)]
    pub time_taken: Option<f64>,
}

impl NllbServe {
    /// Create a new nllb-serve client
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            client: build_http_client(timeout_secs),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Form fields of a translate request
    pub fn form_fields<'a>(
        text: &'a str,
        source_language: Option<&'a str>,
        target_language: &'a str,
    ) -> Vec<(&'static str, &'a str)> {
        let mut fields = vec![("source", text), ("tgt_lang", target_language)];
        if let Some(source) = source_language {
            fields.push(("src_lang", source));
        }
        fields
    }

    /// Extract the translated text from a response body
    pub fn parse_response(body: &str) -> Result<String, ProviderError> {
        let response: NllbServeResponse = serde_json::from_str(body)
            .map_err(|e| ProviderError::ParseError(format!("Invalid nllb-serve response: {}", e)))?;

        if let Some(secs) = response.time_taken {
            debug!("nllb-serve answered in {:.3}s", secs);
        }

        response.translation
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::ParseError("Empty translation list".to_string()))
    }
}

#[async_trait]
impl Provider for NllbServe {
    fn name(&self) -> &str {
        "nllb-serve"
    }

    async fn translate(
        &self,
        text: &str,
        source_language: Option<&str>,
        target_language: &str,
    ) -> Result<String, ProviderError> {
        let url = format!("{}/translate", self.base_url);
        let fields = Self::form_fields(text, source_language, target_language);

        let response = self.client.post(&url)
            .form(&fields)
            .send()
            .await
            .map_err(error_for_transport)?;

        let status = response.status();
        let body = response.text().await.map_err(error_for_transport)?;

        if !status.is_success() {
            return Err(error_for_status(status, body));
        }

        Self::parse_response(&body)
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        let response = self.client.get(&self.base_url)
            .send()
            .await
            .map_err(error_for_transport)?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(error_for_status(status, body))
        }
    }
}
