/*!
 * Backend implementations for remote translation services.
 *
 * This module defines the narrow interface the dispatcher talks to and the
 * client for the Google Cloud Translation API. The trait is object safe so
 * the service can hold any backend behind a `dyn` pointer, which is also how
 * tests substitute a scripted mock.
 */

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::errors::ProviderError;

/// Format hint forwarded with every request
///
/// Catalog strings are plain text by default; HTML is accepted for projects
/// that keep markup inside their messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextFormat {
    /// Translate as plain text
    #[default]
    Text,
    /// Translate as HTML, preserving tags
    Html,
}

impl TextFormat {
    /// Wire value expected by the translation API
    pub fn as_str(&self) -> &'static str {
        match self {
            TextFormat::Text => "text",
            TextFormat::Html => "html",
        }
    }
}

/// One request batch as the backend sees it
///
/// Borrows the planned slice of texts together with the shared metadata. A
/// `source_language` of `None` asks the service to detect the language.
#[derive(Debug, Clone)]
pub struct BatchRequest<'a> {
    /// The untranslated texts, in submission order
    pub texts: Vec<&'a str>,

    /// Source language code, or None for service-side detection
    pub source_language: Option<&'a str>,

    /// Target language code
    pub target_language: &'a str,

    /// Format hint for the texts
    pub format: TextFormat,
}

/// One translated string paired with the languages that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatedText {
    /// The translated text
    pub text: String,

    /// Source language: the requested code, or the detected one when the
    /// request left detection to the service
    pub source_language: Option<String>,

    /// Target language code
    pub target_language: String,
}

/// Common trait for translation backends
///
/// A backend receives one planned batch at a time and must return exactly one
/// translation per submitted text, in submission order. Retry, timeout and
/// rate-limit policies live behind this trait, not in front of it.
#[async_trait]
pub trait TranslationBackend: Send + Sync + Debug {
    /// Translate one batch of texts
    ///
    /// # Arguments
    /// * `request` - The batch to translate
    ///
    /// # Returns
    /// * `Result<Vec<TranslatedText>, ProviderError>` - One result per input text, in order
    async fn translate(&self, request: BatchRequest<'_>) -> Result<Vec<TranslatedText>, ProviderError>;

    /// Test the connection to the backend
    ///
    /// # Returns
    /// * `Result<(), ProviderError>` - Ok if the service is reachable, or an error
    async fn test_connection(&self) -> Result<(), ProviderError>;
}

pub mod google;
