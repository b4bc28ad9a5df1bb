use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::Path;

use crate::batching::BatchLimits;
use crate::errors::ConfigError;
use crate::providers::TextFormat;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Source language code (ISO), or "auto" for service-side detection
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Target language codes used in template mode
    #[serde(default)]
    pub target_languages: Vec<String>,

    /// Directory holding the extracted templates (.pot)
    #[serde(default = "default_pot_dir")]
    pub pot_dir: String,

    /// Directory holding the per-locale catalogs
    #[serde(default = "default_locale_dir")]
    pub locale_dir: String,

    /// Write changed catalogs back to disk
    #[serde(default)]
    pub auto_save: bool,

    /// Also write the compiled .mo next to each saved catalog
    #[serde(default)]
    pub compile: bool,

    /// Translation service config
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    // @field: Service URL, empty for the public endpoint
    #[serde(default = "String::new")]
    pub endpoint: String,

    // @field: API key, empty to fall back to GOOGLE_API_KEY
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Soft minimum chars per request
    #[serde(default = "default_min_chars_per_request")]
    pub min_chars_per_request: usize,

    // @field: Hard maximum chars per request
    #[serde(default = "default_max_chars_per_request")]
    pub max_chars_per_request: usize,

    // @field: Timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    // @field: Format hint sent with every request
    #[serde(default)]
    pub format: TextFormat,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_key: String::new(),
            min_chars_per_request: default_min_chars_per_request(),
            max_chars_per_request: default_max_chars_per_request(),
            timeout_secs: default_timeout_secs(),
            format: TextFormat::default(),
        }
    }
}

impl TranslationConfig {
    /// Validated batch limits from the configured thresholds
    pub fn batch_limits(&self) -> Result<BatchLimits, ConfigError> {
        BatchLimits::new(self.min_chars_per_request, self.max_chars_per_request)
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

fn default_source_language() -> String {
    "auto".to_string()
}

fn default_pot_dir() -> String {
    "pot".to_string()
}

fn default_locale_dir() -> String {
    "locale".to_string()
}

fn default_min_chars_per_request() -> usize {
    // The service's documented recommended request size
    5000
}

fn default_max_chars_per_request() -> usize {
    // The service's documented maximum request size
    30000
}

fn default_timeout_secs() -> u64 {
    30
}

impl Config {
    /// Load a config file, or build the default when the file is absent
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to open config file: {}", path.display()))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Serialize the config to pretty JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize config to JSON")
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        // Validate languages; "auto" is only meaningful as a source
        if self.source_language != "auto" {
            crate::language_utils::validate_language_code(&self.source_language)
                .map_err(|_| ConfigError::UnsupportedLanguage(self.source_language.clone()))?;
        }
        for target in &self.target_languages {
            crate::language_utils::validate_language_code(target)
                .map_err(|_| ConfigError::UnsupportedLanguage(target.clone()))?;
        }

        // Validate batching thresholds before anything is sent
        self.translation.batch_limits()?;

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: default_source_language(),
            target_languages: Vec::new(),
            pot_dir: default_pot_dir(),
            locale_dir: default_locale_dir(),
            auto_save: false,
            compile: false,
            translation: TranslationConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
