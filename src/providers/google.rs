use std::time::Duration;
use async_trait::async_trait;
use serde::{Serialize, Deserialize};
use reqwest::Client;
use url::Url;
use log::error;

use crate::errors::ProviderError;
use crate::providers::{BatchRequest, TranslatedText, TranslationBackend};

/// Default public endpoint for the Cloud Translation API
const DEFAULT_ENDPOINT: &str = "https://translation.googleapis.com";

/// Environment variable consulted when the config carries no API key
const API_KEY_ENV: &str = "GOOGLE_API_KEY";

/// Client for the Google Cloud Translation v2 REST API
///
/// Credentials are a constructor-time precondition: building the client
/// without an API key (from config or `GOOGLE_API_KEY`) fails immediately,
/// so a misconfigured run stops before any catalog is touched.
#[derive(Debug)]
pub struct GoogleTranslate {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// API endpoint URL, overridable for testing or regional endpoints
    endpoint: String,
}

/// Request body for the v2 translate call
#[derive(Debug, Serialize)]
struct TranslateBody<'a> {
    /// Texts to translate, one result comes back per item
    q: &'a [&'a str],

    /// Target language code
    target: &'a str,

    /// Source language code; omitted entirely for service-side detection
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<&'a str>,

    /// "text" or "html"
    format: &'a str,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    data: TranslationList,
}

#[derive(Debug, Deserialize)]
struct TranslationList {
    translations: Vec<TranslationItem>,
}

/// One translation in the API response
#[derive(Debug, Deserialize)]
struct TranslationItem {
    #[serde(rename = "translatedText")]
    translated_text: String,

    /// Present when the request left source detection to the service
    #[serde(rename = "detectedSourceLanguage")]
    detected_source_language: Option<String>,
}

impl GoogleTranslate {
    /// Create a new client
    ///
    /// An empty `api_key` falls back to the `GOOGLE_API_KEY` environment
    /// variable; an empty `endpoint` falls back to the public API.
    pub fn new(api_key: impl Into<String>, endpoint: impl Into<String>, timeout_secs: u64) -> Result<Self, ProviderError> {
        let mut api_key = api_key.into();
        if api_key.is_empty() {
            api_key = std::env::var(API_KEY_ENV).unwrap_or_default();
        }
        if api_key.is_empty() {
            return Err(ProviderError::AuthenticationError(format!(
                "no API key configured and {} is not set", API_KEY_ENV
            )));
        }

        let endpoint = {
            let endpoint = endpoint.into();
            if endpoint.is_empty() { DEFAULT_ENDPOINT.to_string() } else { endpoint }
        };
        Url::parse(&endpoint)
            .map_err(|e| ProviderError::RequestFailed(format!("invalid endpoint {}: {}", endpoint, e)))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ProviderError::ConnectionError(e.to_string()))?;

        Ok(GoogleTranslate { client, api_key, endpoint })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.endpoint.trim_end_matches('/'), path)
    }
}

#[async_trait]
impl TranslationBackend for GoogleTranslate {
    async fn translate(&self, request: BatchRequest<'_>) -> Result<Vec<TranslatedText>, ProviderError> {
        let body = TranslateBody {
            q: &request.texts,
            target: request.target_language,
            source: request.source_language,
            format: request.format.as_str(),
        };

        let response = self.client
            .post(self.api_url("/language/translate/v2"))
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::ConnectionError(e.to_string()))?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(ProviderError::RateLimitExceeded(
                "translation API returned 429".to_string(),
            ));
        }
        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(ProviderError::AuthenticationError(format!(
                "translation API rejected the API key ({})", status
            )));
        }
        if !status.is_success() {
            let message = response.text().await
                .unwrap_or_else(|_| "failed to read error response".to_string());
            error!("Translation API error ({}): {}", status, message);
            return Err(ProviderError::ApiError { status_code: status.as_u16(), message });
        }

        let decoded = response.json::<TranslateResponse>().await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        let results = decoded.data.translations
            .into_iter()
            .map(|item| TranslatedText {
                text: item.translated_text,
                source_language: request.source_language
                    .map(str::to_string)
                    .or(item.detected_source_language),
                target_language: request.target_language.to_string(),
            })
            .collect();

        Ok(results)
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        // The languages listing is the cheapest authenticated call.
        let response = self.client
            .get(self.api_url("/language/translate/v2/languages"))
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| ProviderError::ConnectionError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await
                .unwrap_or_else(|_| "failed to read error response".to_string());
            return Err(ProviderError::ApiError { status_code: status.as_u16(), message });
        }
        Ok(())
    }
}
