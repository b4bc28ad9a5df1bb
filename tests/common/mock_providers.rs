/*!
 * Mock backend for testing translation behavior without external API calls.
 *
 * The mock records every request it receives and pops one scripted outcome
 * per call (defaulting to success), so tests can drive failures on a chosen
 * batch and inspect exactly what would have gone over the wire.
 */

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use potranslate::errors::ProviderError;
use potranslate::providers::{BatchRequest, TranslatedText, TranslationBackend};

/// One request as the backend saw it
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Texts submitted in this batch
    pub texts: Vec<String>,
    /// Source language, None when detection was requested
    pub source_language: Option<String>,
    /// Target language
    pub target_language: String,
}

/// Scripted outcome for one translate call
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockOutcome {
    /// Return one translation per text, in order
    Succeed,
    /// Fail with a request error
    Fail,
    /// Return one translation fewer than requested (malformed response)
    ShortResponse,
}

/// Mock backend with scripted outcomes and request recording
///
/// Clones share their state, so a test can hand one clone to the service
/// and keep another to inspect the recorded requests afterwards.
#[derive(Debug, Clone, Default)]
pub struct MockBackend {
    outcomes: Arc<Mutex<VecDeque<MockOutcome>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockBackend {
    /// A backend that succeeds on every call
    pub fn working() -> Self {
        Self::default()
    }

    /// A backend that follows the given outcomes, then keeps succeeding
    pub fn with_outcomes(outcomes: impl IntoIterator<Item = MockOutcome>) -> Self {
        MockBackend {
            outcomes: Arc::new(Mutex::new(outcomes.into_iter().collect())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Requests received so far, in call order
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// The deterministic translation the mock produces for a text
    pub fn translated(target: &str, text: &str) -> String {
        format!("[{}] {}", target, text)
    }
}

#[async_trait]
impl TranslationBackend for MockBackend {
    async fn translate(&self, request: BatchRequest<'_>) -> Result<Vec<TranslatedText>, ProviderError> {
        self.requests.lock().unwrap().push(RecordedRequest {
            texts: request.texts.iter().map(|t| t.to_string()).collect(),
            source_language: request.source_language.map(str::to_string),
            target_language: request.target_language.to_string(),
        });

        let outcome = self.outcomes.lock().unwrap()
            .pop_front()
            .unwrap_or(MockOutcome::Succeed);

        match outcome {
            MockOutcome::Fail => Err(ProviderError::RequestFailed("scripted failure".to_string())),
            MockOutcome::Succeed | MockOutcome::ShortResponse => {
                let mut results: Vec<TranslatedText> = request.texts.iter()
                    .map(|text| TranslatedText {
                        text: Self::translated(request.target_language, text),
                        source_language: request.source_language.map(str::to_string),
                        target_language: request.target_language.to_string(),
                    })
                    .collect();
                if outcome == MockOutcome::ShortResponse {
                    results.pop();
                }
                Ok(results)
            }
        }
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        Ok(())
    }
}
