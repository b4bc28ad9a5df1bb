/*!
 * Core translation service implementation.
 *
 * This module contains the TranslationService struct, which ties the batch
 * planner and dispatcher to a backend and exposes the catalog-level
 * translate-and-merge operation.
 */

use anyhow::{Result, anyhow};
use log::{info, warn};

use crate::app_config::TranslationConfig;
use crate::batching::{plan_batches, BatchLimits, TranslationUnit};
use crate::catalog::Catalog;
use crate::errors::ProviderError;
use crate::providers::google::GoogleTranslate;
use crate::providers::{TextFormat, TranslatedText, TranslationBackend};
use super::dispatcher::{dispatch, DispatchError, RequestContext};

/// Result of translating one catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogOutcome {
    /// Number of entries that received a translation
    pub translated: usize,

    /// Whether the catalog changed and should be written back
    pub updated: bool,
}

/// Translation service backed by a remote translation API
///
/// Holds the validated batch limits and the backend; each translate call is
/// otherwise stateless, so one service can be reused across catalogs and
/// target languages.
pub struct TranslationService {
    /// The backend receiving planned batches
    backend: Box<dyn TranslationBackend>,

    /// Validated character limits per request
    limits: BatchLimits,

    /// Format hint forwarded with every request
    format: TextFormat,
}

impl TranslationService {
    /// Create a service from the translation configuration
    pub fn new(config: &TranslationConfig) -> Result<Self> {
        let limits = BatchLimits::new(config.min_chars_per_request, config.max_chars_per_request)?;
        let backend = GoogleTranslate::new(
            config.api_key.clone(),
            config.endpoint.clone(),
            config.timeout_secs,
        )?;
        Ok(TranslationService {
            backend: Box::new(backend),
            limits,
            format: config.format,
        })
    }

    /// Create a service around an existing backend, used by tests
    pub fn with_backend(backend: Box<dyn TranslationBackend>, limits: BatchLimits, format: TextFormat) -> Self {
        TranslationService { backend, limits, format }
    }

    /// Batch limits this service plans with
    pub fn limits(&self) -> BatchLimits {
        self.limits
    }

    /// Check that the backend is reachable
    pub async fn test_connection(&self) -> Result<(), ProviderError> {
        self.backend.test_connection().await
    }

    /// Translate an ordered list of texts
    ///
    /// Plans the batches, dispatches them in order and returns one result per
    /// input text, in input order. A `source` of `"auto"` (or empty) is
    /// omitted from the requests so the service detects the language. On a
    /// batch failure the error carries the results of the completed batches.
    pub async fn translate_texts(
        &self,
        texts: &[String],
        source: &str,
        target: &str,
    ) -> Result<Vec<TranslatedText>, DispatchError> {
        let units: Vec<TranslationUnit> = texts.iter().map(|t| TranslationUnit::new(t.clone())).collect();
        let plan = plan_batches(&units, self.limits);
        let context = RequestContext::new(source, target, self.format);
        dispatch(&units, &plan, &context, self.backend.as_ref()).await
    }

    /// Translate every untranslated entry of a catalog in place
    ///
    /// Collects the untranslated entries, translates them and writes each
    /// result back into its entry. On full success the catalog header is
    /// stamped (Language, PO-Revision-Date, translator fields). On a batch
    /// failure the completed prefix is still applied before the error is
    /// returned, so partial progress survives; the header is left alone.
    pub async fn translate_catalog(
        &self,
        catalog: &mut Catalog,
        source: &str,
        target: &str,
    ) -> Result<CatalogOutcome> {
        let indices = catalog.untranslated_indices();
        if indices.is_empty() {
            return Ok(CatalogOutcome { translated: 0, updated: false });
        }

        let texts: Vec<String> = indices.iter().map(|&i| catalog.entries[i].msgid.clone()).collect();
        info!(
            "Translating {} entries from {} to {}",
            texts.len(),
            if source.is_empty() || source == "auto" { "detected language" } else { source },
            target
        );

        match self.translate_texts(&texts, source, target).await {
            Ok(results) => {
                for (&index, result) in indices.iter().zip(&results) {
                    catalog.entries[index].msgstr = result.text.clone();
                }
                catalog.stamp_translation(target);
                Ok(CatalogOutcome { translated: results.len(), updated: true })
            }
            Err(error) => {
                let recovered = error.completed.len();
                for (&index, result) in indices.iter().zip(&error.completed) {
                    catalog.entries[index].msgstr = result.text.clone();
                }
                if recovered > 0 {
                    warn!(
                        "Keeping {} of {} translations recovered before the failure",
                        recovered, texts.len()
                    );
                }
                Err(anyhow!(error).context(format!(
                    "translation stopped after {} of {} entries", recovered, texts.len()
                )))
            }
        }
    }
}
