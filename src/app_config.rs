use anyhow::{anyhow, Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use url::Url;

use crate::language_utils;

// Application configuration module
// This module handles the application configuration including loading,
// validating and saving configuration settings.

/// Smallest accepted chunk size in characters
pub const MIN_CHUNK_SIZE: usize = 1;

/// Largest accepted chunk size in characters; longer pieces overrun the model's output length
pub const MAX_CHUNK_SIZE: usize = 1000;

/// File name of the configuration file
pub const CONFIG_FILE_NAME: &str = "conf.json";

/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Source language code, detected by the model when absent
    #[serde(default)]
    pub source_language: Option<String>,

    /// Target language code (NLLB code, e.g. fra_Latn)
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Inputs up to this many characters are translated in one call
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Preferred encoding label for text files
    #[serde(default = "default_encoding")]
    pub encoding: String,

    /// Largest input file accepted, in megabytes
    #[serde(default = "default_max_file_size_mb")]
    pub max_file_size_mb: u64,

    /// Segmentation policy
    #[serde(default)]
    pub segmentation: SegmentationConfig,

    /// Translation config
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Optional file receiving a copy of every log line
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

/// Translation provider type
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    // @provider: self-hosted nllb-serve
    #[default]
    NllbServe,
    // @provider: Hugging Face Inference API
    HuggingFace,
}

impl TranslationProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::HuggingFace => "Hugging Face",
            Self::NllbServe => "nllb-serve",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::HuggingFace => "huggingface".to_string(),
            Self::NllbServe => "nllbserve".to_string(),
        }
    }
}

impl std::fmt::Display for TranslationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for TranslationProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "huggingface" | "hf" => Ok(Self::HuggingFace),
            "nllbserve" | "nllb-serve" => Ok(Self::NllbServe),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Provider configuration wrapper
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    // @field: Provider type identifier
    #[serde(rename = "type")]
    pub provider_type: String,

    // @field: Model name
    #[serde(default = "String::new")]
    pub model: String,

    // @field: API key
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Service URL
    #[serde(default = "String::new")]
    pub endpoint: String,

    // @field: Timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ProviderConfig {
    // @param provider_type: Provider enum
    // @returns: Provider config with defaults
    pub fn new(provider_type: TranslationProvider) -> Self {
        match provider_type {
            TranslationProvider::HuggingFace => Self {
                provider_type: "huggingface".to_string(),
                model: default_model(),
                api_key: String::new(),
                endpoint: default_huggingface_endpoint(),
                timeout_secs: default_timeout_secs(),
            },
            TranslationProvider::NllbServe => Self {
                provider_type: "nllbserve".to_string(),
                model: default_model(),
                api_key: String::new(),
                endpoint: default_nllb_serve_endpoint(),
                timeout_secs: default_timeout_secs(),
            },
        }
    }
}

/// How documents are cut into segments
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SegmentationConfig {
    /// Merge consecutive short lines into one segment
    #[serde(default)]
    pub group_short_lines: bool,

    /// Number of lines a group aims for
    #[serde(default = "default_min_lines")]
    pub min_lines: usize,

    /// Lines shorter than this are candidates for grouping
    #[serde(default = "default_short_line_chars")]
    pub short_line_chars: usize,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            group_short_lines: false,
            min_lines: default_min_lines(),
            short_line_chars: default_short_line_chars(),
        }
    }
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Translation provider to use
    #[serde(default)]
    pub provider: TranslationProvider,

    /// Available translation providers
    #[serde(default)]
    pub available_providers: Vec<ProviderConfig>,

    /// Common translation settings
    #[serde(default)]
    pub common: TranslationCommonConfig,
}

/// Common translation settings applicable to all providers
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationCommonConfig {
    /// Retry count for failed requests
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Backoff multiplier for retries (in milliseconds)
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Maximum generated length in tokens, forwarded to the model
    #[serde(default = "default_max_length")]
    pub max_length: u32,

    /// Reuse translations of identical segments within a run
    #[serde(default = "default_true")]
    pub cache_enabled: bool,
}

impl Default for TranslationCommonConfig {
    fn default() -> Self {
        Self {
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
            max_length: default_max_length(),
            cache_enabled: default_true(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_target_language() -> String {
    "fra_Latn".to_string()
}

fn default_chunk_size() -> usize {
    500
}

fn default_encoding() -> String {
    "utf-8".to_string()
}

fn default_max_file_size_mb() -> u64 {
    10
}

fn default_min_lines() -> usize {
    3
}

fn default_short_line_chars() -> usize {
    40
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_retry_count() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    1000 // 1 second base backoff time, doubled on each retry
}

fn default_max_length() -> u32 {
    512
}

fn default_true() -> bool {
    true
}

fn default_model() -> String {
    "facebook/nllb-200-distilled-600M".to_string()
}

fn default_huggingface_endpoint() -> String {
    "https://api-inference.huggingface.co".to_string()
}

fn default_nllb_serve_endpoint() -> String {
    "http://localhost:6060".to_string()
}

impl Config {
    /// Load the configuration from `path`, writing a default one when the file is missing
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if path.exists() {
            let file = File::open(path)
                .with_context(|| format!("Failed to open config file: {}", path.display()))?;
            let reader = BufReader::new(file);
            let config: Config = serde_json::from_reader(reader)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            return Ok(config);
        }

        warn!("Config file not found at '{}', creating default config.", path.display());

        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }
        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write default config to file: {}", path.display()))?;

        Ok(config)
    }

    /// Config file used when none is given: `./conf.json` if present,
    /// otherwise `<user config dir>/l2t/conf.json`
    pub fn default_path() -> PathBuf {
        let local = PathBuf::from(CONFIG_FILE_NAME);
        if local.exists() {
            return local;
        }

        dirs::config_dir()
            .map(|dir| dir.join("l2t").join(CONFIG_FILE_NAME))
            .unwrap_or(local)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        language_utils::normalize_language_code(&self.target_language)
            .context("Invalid target language")?;

        if let Some(source) = &self.source_language {
            language_utils::normalize_language_code(source)
                .context("Invalid source language")?;
        }

        if !(MIN_CHUNK_SIZE..=MAX_CHUNK_SIZE).contains(&self.chunk_size) {
            return Err(anyhow!(
                "Chunk size must be between {} and {} characters, got {}",
                MIN_CHUNK_SIZE, MAX_CHUNK_SIZE, self.chunk_size
            ));
        }

        if encoding_rs::Encoding::for_label(self.encoding.trim().as_bytes()).is_none() {
            return Err(anyhow!("Unknown text encoding: {}", self.encoding));
        }

        if self.max_file_size_mb == 0 {
            return Err(anyhow!("Maximum file size must be at least 1 MB"));
        }

        if self.segmentation.group_short_lines && self.segmentation.min_lines < 2 {
            return Err(anyhow!("Line grouping needs min_lines of at least 2"));
        }

        let endpoint = self.translation.get_endpoint();
        Url::parse(&endpoint)
            .with_context(|| format!("Invalid endpoint URL: {}", endpoint))?;

        if self.translation.provider == TranslationProvider::HuggingFace
            && self.translation.get_api_key().is_empty()
        {
            return Err(anyhow!("Translation API key is required for the Hugging Face provider"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: None,
            target_language: default_target_language(),
            chunk_size: default_chunk_size(),
            encoding: default_encoding(),
            max_file_size_mb: default_max_file_size_mb(),
            segmentation: SegmentationConfig::default(),
            translation: TranslationConfig::default(),
            log_level: LogLevel::default(),
            log_file: None,
        }
    }
}

impl TranslationConfig {
    /// Get the active provider configuration from the available_providers array
    pub fn get_active_provider_config(&self) -> Option<&ProviderConfig> {
        self.get_provider_config(&self.provider)
    }

    /// Get a specific provider configuration by type
    pub fn get_provider_config(&self, provider_type: &TranslationProvider) -> Option<&ProviderConfig> {
        let provider_str = provider_type.to_lowercase_string();
        self.available_providers.iter()
            .find(|p| p.provider_type == provider_str)
    }

    /// Mutable access to the active provider configuration, inserting defaults when missing
    pub fn active_provider_config_mut(&mut self) -> &mut ProviderConfig {
        let provider_str = self.provider.to_lowercase_string();
        let position = self.available_providers.iter()
            .position(|p| p.provider_type == provider_str);

        let index = match position {
            Some(index) => index,
            None => {
                self.available_providers.push(ProviderConfig::new(self.provider.clone()));
                self.available_providers.len() - 1
            }
        };

        &mut self.available_providers[index]
    }

    /// Get the model for the active provider
    pub fn get_model(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.model.is_empty() {
                return provider_config.model.clone();
            }
        }

        default_model()
    }

    /// Get the API key for the active provider
    pub fn get_api_key(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.api_key.is_empty() {
                return provider_config.api_key.clone();
            }
        }

        String::new()
    }

    /// Get the endpoint for the active provider
    pub fn get_endpoint(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.endpoint.is_empty() {
                return provider_config.endpoint.clone();
            }
        }

        match self.provider {
            TranslationProvider::HuggingFace => default_huggingface_endpoint(),
            TranslationProvider::NllbServe => default_nllb_serve_endpoint(),
        }
    }

    /// Get the request timeout for the active provider
    pub fn get_timeout_secs(&self) -> u64 {
        self.get_active_provider_config()
            .map(|p| p.timeout_secs)
            .filter(|secs| *secs > 0)
            .unwrap_or_else(default_timeout_secs)
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            provider: TranslationProvider::default(),
            available_providers: vec![
                ProviderConfig::new(TranslationProvider::HuggingFace),
                ProviderConfig::new(TranslationProvider::NllbServe),
            ],
            common: TranslationCommonConfig::default(),
        }
    }
}
