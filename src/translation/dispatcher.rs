/*!
 * Sequential dispatch of planned batches.
 *
 * Batches go out one at a time, in plan order, each awaited to completion
 * before the next is issued. Catalogs are translated interactively or in
 * small jobs, so there is no concurrent dispatch and no retry here; a backend
 * that wants retries implements them behind the `TranslationBackend` trait.
 */

use log::debug;
use thiserror::Error;

use crate::batching::{BatchSpan, TranslationUnit};
use crate::errors::ProviderError;
use crate::providers::{BatchRequest, TextFormat, TranslatedText, TranslationBackend};

/// Shared metadata stamped on every batch of one dispatch run
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Source language code, or None to let the service detect it
    pub source_language: Option<String>,

    /// Target language code
    pub target_language: String,

    /// Format hint for the texts
    pub format: TextFormat,
}

impl RequestContext {
    /// Build a context, mapping the conventional `"auto"` (or empty) source
    /// to service-side detection
    pub fn new(source_language: &str, target_language: &str, format: TextFormat) -> Self {
        let source_language = match source_language {
            "" | "auto" => None,
            code => Some(code.to_string()),
        };
        RequestContext {
            source_language,
            target_language: target_language.to_string(),
            format,
        }
    }
}

/// A batch failed while earlier batches had already completed
///
/// Identifies the failing batch and carries the results of everything that
/// completed before it, so the caller can keep partial progress instead of
/// discarding paid-for translations.
#[derive(Error, Debug)]
#[error("translation request for batch {batch_index} ({unit_count} units, {char_count} chars) failed: {source}")]
pub struct DispatchError {
    /// Zero-based index of the failing batch in the plan
    pub batch_index: usize,

    /// Number of units in the failing batch
    pub unit_count: usize,

    /// Character count of the failing batch
    pub char_count: usize,

    /// Results of every batch completed before the failure, in input order
    pub completed: Vec<TranslatedText>,

    /// The underlying backend error
    #[source]
    pub source: ProviderError,
}

/// Send every planned batch through `backend`, in order
///
/// On success the output has exactly one `TranslatedText` per input unit and
/// position i of the output corresponds to position i of `units`, regardless
/// of how the plan split the work. A batch is atomic: a response whose length
/// differs from the batch size counts as a failed batch, and the failure
/// carries everything completed before it.
pub async fn dispatch(
    units: &[TranslationUnit],
    plan: &[BatchSpan],
    context: &RequestContext,
    backend: &dyn TranslationBackend,
) -> Result<Vec<TranslatedText>, DispatchError> {
    let mut results: Vec<TranslatedText> = Vec::with_capacity(units.len());

    for (batch_index, span) in plan.iter().enumerate() {
        let texts: Vec<&str> = units[span.range.clone()]
            .iter()
            .map(|unit| unit.text.as_str())
            .collect();

        debug!(
            "Dispatching batch {}/{} ({} units, {} chars)",
            batch_index + 1, plan.len(), texts.len(), span.char_count
        );

        let expected = texts.len();
        let request = BatchRequest {
            texts,
            source_language: context.source_language.as_deref(),
            target_language: &context.target_language,
            format: context.format,
        };

        let outcome = backend.translate(request).await.and_then(|translated| {
            if translated.len() == expected {
                Ok(translated)
            } else {
                Err(ProviderError::ParseError(format!(
                    "expected {} translations, got {}", expected, translated.len()
                )))
            }
        });

        match outcome {
            Ok(mut translated) => results.append(&mut translated),
            Err(source) => {
                return Err(DispatchError {
                    batch_index,
                    unit_count: span.unit_count(),
                    char_count: span.char_count,
                    completed: results,
                    source,
                });
            }
        }
    }

    Ok(results)
}
